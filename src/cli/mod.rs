//! CLI entry point for the agent registry.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::agent::{AgentKey, AgentRegistry};
use crate::error::{RegistryError, Result};

pub const SHELL_HELP: &str = "\
Commands:
  create <task> | <prompt>   start an agent and print its first reply
  message <key> <text>       send a message to an agent
  list                       list agents as `key: task`
  delete <key>               remove an agent
  help                       show this help
  quit                       exit";

/// Agent registry CLI
#[derive(Parser, Debug)]
#[command(name = "agent-registry", version, about = "Manage conversational agents")]
pub struct Cli {
    /// Config file (TOML). Defaults to the platform config directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model for newly created agents (overrides config)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive shell over one registry
    Shell,
}

/// One line typed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Create { task: String, prompt: String },
    Message { key: AgentKey, text: String },
    List,
    Delete { key: AgentKey },
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse a shell line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "create" => {
                let (task, prompt) = rest.split_once('|').ok_or_else(|| {
                    RegistryError::invalid_argument("usage: create <task> | <prompt>")
                })?;
                Self::Create {
                    task: task.trim().to_string(),
                    prompt: prompt.trim().to_string(),
                }
            }
            "message" | "msg" => {
                let (key, text) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    RegistryError::invalid_argument("usage: message <key> <text>")
                })?;
                Self::Message {
                    key: key.parse()?,
                    text: text.trim().to_string(),
                }
            }
            "list" | "ls" => Self::List,
            "delete" | "rm" => Self::Delete { key: rest.parse()? },
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(RegistryError::invalid_argument(format!(
                    "unknown command '{other}' (try `help`)"
                )))
            }
        };
        Ok(Some(command))
    }
}

/// Run one shell command against the registry and render its output.
pub async fn execute(
    registry: &mut AgentRegistry,
    command: ShellCommand,
    model: &str,
) -> Result<String> {
    match command {
        ShellCommand::Create { task, prompt } => {
            let (key, reply) = registry.create_agent(&task, &prompt, model).await?;
            Ok(format!("Agent {key} created.\n{reply}"))
        }
        ShellCommand::Message { key, text } => registry.message_agent(key, &text).await,
        ShellCommand::List => {
            let agents = registry.list_agents();
            if agents.is_empty() {
                return Ok("No agents.".to_string());
            }
            let mut out = String::new();
            for (key, task) in agents {
                let _ = writeln!(out, "{key}: {task}");
            }
            Ok(out.trim_end().to_string())
        }
        ShellCommand::Delete { key } => Ok(if registry.delete_agent(key) {
            format!("Agent {key} deleted.")
        } else {
            format!("No agent {key}.")
        }),
        ShellCommand::Help => Ok(SHELL_HELP.to_string()),
        ShellCommand::Quit => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::provider::CompletionService;
    use crate::types::ChatMessage;

    struct Fixed;

    #[async_trait]
    impl CompletionService for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _model: &str, _messages: &[ChatMessage]) -> Result<String> {
            Ok("ok".to_string())
        }
    }

    #[test]
    fn parse_shell_subcommand_with_global_flags() {
        let cli = Cli::try_parse_from(["agent-registry", "shell", "--model", "gpt-4", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Shell));
        assert_eq!(cli.model.as_deref(), Some("gpt-4"));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_create_splits_on_pipe() {
        let cmd = ShellCommand::parse("create translate English to French | Translate 'Hello'")
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Create {
                task: "translate English to French".into(),
                prompt: "Translate 'Hello'".into(),
            }
        );
    }

    #[test]
    fn parse_message_and_delete_keys() {
        assert_eq!(
            ShellCommand::parse("message 3 Good morning").unwrap(),
            Some(ShellCommand::Message {
                key: AgentKey(3),
                text: "Good morning".into(),
            })
        );
        assert_eq!(
            ShellCommand::parse("rm 0").unwrap(),
            Some(ShellCommand::Delete { key: AgentKey(0) })
        );
        assert!(ShellCommand::parse("delete abc").is_err());
    }

    #[test]
    fn parse_blank_and_unknown_lines() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert!(ShellCommand::parse("frobnicate").is_err());
        assert!(ShellCommand::parse("create no pipe here").is_err());
    }

    #[tokio::test]
    async fn execute_walks_agent_lifecycle() {
        let mut registry = AgentRegistry::new(Arc::new(Fixed));
        let create = ShellCommand::Create {
            task: "t".into(),
            prompt: "p".into(),
        };
        let out = execute(&mut registry, create, "m").await.unwrap();
        assert_eq!(out, "Agent 0 created.\nok");

        let out = execute(&mut registry, ShellCommand::List, "m").await.unwrap();
        assert_eq!(out, "0: t");

        let delete = ShellCommand::Delete { key: AgentKey(0) };
        let out = execute(&mut registry, delete.clone(), "m").await.unwrap();
        assert_eq!(out, "Agent 0 deleted.");
        let out = execute(&mut registry, delete, "m").await.unwrap();
        assert_eq!(out, "No agent 0.");

        let missing = ShellCommand::Message {
            key: AgentKey(0),
            text: "x".into(),
        };
        let err = execute(&mut registry, missing, "m").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
