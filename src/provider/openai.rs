//! OpenAI Chat Completions API provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::types::{ChatMessage, CompletionSettings};

use super::http::{bearer_headers, build_client, shared_client, status_to_error, DEFAULT_TIMEOUT};
use super::CompletionService;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Completion service backed by `POST {base_url}/chat/completions`.
///
/// Works against OpenAI itself and any server speaking the same API.
pub struct OpenAiCompletionService {
    api_key: String,
    base_url: String,
    settings: CompletionSettings,
    client: reqwest::Client,
}

impl OpenAiCompletionService {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            settings: CompletionSettings::default(),
            client: shared_client().clone(),
        }
    }

    /// Build a service from config. Fails when the config does not validate
    /// or no API key is configured.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RegistryError::Authentication("Missing OPENAI_API_KEY".into()))?;
        let service = Self::new(api_key, config.base_url.clone())
            .with_settings(config.completion_settings());
        match config.timeout_secs {
            Some(secs) if Duration::from_secs(secs) != DEFAULT_TIMEOUT => {
                service.with_timeout(Duration::from_secs(secs))
            }
            _ => Ok(service),
        }
    }

    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a dedicated HTTP client with the given request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RegistryError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body(&self, model: &str, messages: &[ChatMessage]) -> serde_json::Value {
        let messages = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role,
                    "content": m.content,
                })
            })
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(temp) = self.settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
            if let Some(max) = self.settings.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }
        }

        body
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, RegistryError> {
        let body = self.build_request_body(model, messages);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model, turns = messages.len(), "OpenAI complete");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: OpenAiChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::api(200, "No choices in OpenAI response"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_includes_settings_only_when_set() {
        let service = OpenAiCompletionService::new("k", None);
        let body = service.build_request_body("gpt-3.5-turbo", &[ChatMessage::user("hi")]);
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert!(body.get("temperature").is_none());

        let service = service.with_settings(CompletionSettings::builder().max_tokens(64).build());
        let body = service.build_request_body("gpt-4", &[]);
        assert_eq!(body["max_tokens"], 64);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let service = OpenAiCompletionService::new("k", Some("http://localhost:8080/v1/".into()));
        assert_eq!(service.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let mut config = RegistryConfig::default().with_api_key("k");
        config.temperature = Some(3.5);
        assert!(matches!(
            OpenAiCompletionService::from_config(&config),
            Err(RegistryError::Configuration(_))
        ));

        let config = RegistryConfig::default()
            .with_api_key("k")
            .with_default_model("  ");
        assert!(matches!(
            OpenAiCompletionService::from_config(&config),
            Err(RegistryError::Configuration(_))
        ));

        let mut config = RegistryConfig::default().with_api_key("k");
        config.timeout_secs = Some(0);
        assert!(matches!(
            OpenAiCompletionService::from_config(&config),
            Err(RegistryError::Configuration(_))
        ));
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = RegistryConfig::default();
        assert!(matches!(
            OpenAiCompletionService::from_config(&config),
            Err(RegistryError::Authentication(_))
        ));
    }
}
