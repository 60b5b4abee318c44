//! Research Chat: search-grounded answers from a local language model
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::{Parser, Subcommand};
use research_chat::{
    config::{self, Settings},
    conversation::{ConversationStep, OllamaClient},
    extract::Extractor,
    network::HttpClient,
    search::Orchestrator,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Answers questions with a local language model grounded in live web search.
///
/// Settings are also read from RESEARCH_CHAT_* environment variables
/// (SETTINGS_PATH, DEBUG, PORT, BIND_ADDRESS, LLM_BASE_URL, LLM_MODEL,
/// SEARCH_MODE). RUST_LOG overrides the log filter.
#[derive(Debug, Parser)]
#[command(name = "research-chat", version, about)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run; serves the chat API when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the chat API.
    Serve,

    /// Answer one question on stdout and exit.
    Ask {
        /// The question; words are joined with spaces.
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
}

fn init_logging(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_step(settings: &Settings) -> Result<ConversationStep> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let orchestrator = Orchestrator::from_settings(settings, &client);
    let llm = OllamaClient::new(&settings.llm)?;
    info!(
        "Using model {} at {}",
        settings.llm.model, settings.llm.base_url
    );

    Ok(ConversationStep::new(
        orchestrator,
        Extractor::new(settings.extractor.clone()),
        Arc::new(llm),
        &settings.llm,
    ))
}

async fn serve(settings: Settings) -> Result<()> {
    let step = build_step(&settings)?;
    let state = AppState::new(settings.clone(), step);
    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;
    init_logging(&settings);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Research Chat v{}", research_chat::VERSION);
            info!(
                "Loaded configuration for instance: {}",
                settings.general.instance_name
            );
            serve(settings).await
        }
        Command::Ask { question } => {
            let step = build_step(&settings)?;
            let reply = step.handle_user_message(&question.join(" "), &[]).await;
            println!("{}", reply);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_serves() {
        let cli = Cli::try_parse_from(["research-chat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_ask_keeps_words() {
        let cli =
            Cli::try_parse_from(["research-chat", "-c", "my.yml", "ask", "what", "is", "rust?"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.yml")));
        match cli.command {
            Some(Command::Ask { question }) => assert_eq!(question.join(" "), "what is rust?"),
            other => panic!("expected ask, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_args() {
        assert!(Cli::try_parse_from(["research-chat", "--config"]).is_err());
        assert!(Cli::try_parse_from(["research-chat", "ask"]).is_err());
        assert!(Cli::try_parse_from(["research-chat", "--bogus"]).is_err());

        let err = Cli::try_parse_from(["research-chat", "-V"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}
