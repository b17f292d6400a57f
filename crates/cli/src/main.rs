use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docent_api::{WebhookClient, answer_for};
use docent_content::ContentStore;
use docent_util::{ConfigOverrides, DocentConfig, LOG_PATH_ENV};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Browse product documentation in the terminal and ask the assistant about it.
#[derive(Debug, Parser)]
#[command(name = "docent", version, about)]
struct Cli {
    /// Content document (.json, .yaml or .yml) instead of the built-in one
    #[arg(long, value_name = "PATH")]
    content: Option<String>,

    /// Chat webhook endpoint
    #[arg(long, value_name = "URL")]
    webhook_url: Option<String>,

    /// Topic to open at startup
    #[arg(long, value_name = "ID")]
    topic: Option<String>,

    /// Color theme (dracula or nord)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every topic as one markdown document
    Export,
    /// Send a single question to the assistant and print the answer
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none())?;

    let config = DocentConfig::resolve(ConfigOverrides {
        content_path: cli.content,
        webhook_url: cli.webhook_url,
        theme: cli.theme,
        initial_topic: cli.topic,
    })
    .context("invalid configuration")?;

    match cli.command {
        // No subcommand => TUI
        None => {
            let store = load_store(&config)?;
            docent_tui::run(Arc::new(store), config).await
        }
        Some(Command::Export) => {
            let store = load_store(&config)?;
            println!("{}", store.markdown_digest());
            Ok(())
        }
        Some(Command::Ask { question }) => {
            let client = WebhookClient::new(config.webhook_url, config.chat_timeout)?;
            let reply = answer_for(&client, &question.join(" ")).await;
            println!("{reply}");
            Ok(())
        }
    }
}

/// Logs go to `DOCENT_LOG_PATH` when set. Otherwise the TUI discards them
/// (it owns the terminal) and subcommands write to stderr.
fn init_tracing(tui_mode: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let log_path = std::env::var_os(LOG_PATH_ENV).filter(|path| !path.is_empty());
    let _ = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.to_string_lossy()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None if tui_mode => builder.with_writer(std::io::sink).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    Ok(())
}

fn load_store(config: &DocentConfig) -> Result<ContentStore> {
    let store = match &config.content_path {
        Some(path) => ContentStore::from_path(path).with_context(|| format!("loading content from {}", path.display()))?,
        None => ContentStore::embedded().context("loading the built-in documentation")?,
    };
    info!(title = %store.title, topics = store.len(), "content loaded");
    Ok(store)
}
