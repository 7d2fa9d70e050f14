//! Agent registry CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use agent_registry::agent::AgentRegistry;
use agent_registry::cli::{self, Cli, Commands, ShellCommand, SHELL_HELP};
use agent_registry::config::RegistryConfig;
use agent_registry::provider::OpenAiCompletionService;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Shell => run_shell(cli.config, cli.model).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run_shell(
    config_path: Option<std::path::PathBuf>,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RegistryConfig::resolve(config_path.as_deref())?;
    if let Some(model) = model {
        config = config.with_default_model(model);
    }
    config.validate()?;

    let service = OpenAiCompletionService::from_config(&config)?;
    let mut registry = AgentRegistry::new(Arc::new(service));

    println!("{SHELL_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match cli::execute(&mut registry, command, &config.default_model).await {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
