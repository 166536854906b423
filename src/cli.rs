//! Command-line interface parsing and startup.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, Settings};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "kaiwa")]
#[command(about = "A terminal chat client with multiple independent sessions")]
#[command(
    long_about = "Kaiwa is a full-screen terminal chat client for OpenAI-compatible APIs. \
It keeps any number of independent chat sessions in memory, each with its own \
conversation history, and lets you switch between them from a sidebar.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your API key. If unset, kaiwa asks for one at startup;\n\
                    the key is held in memory only and never written to disk.\n\n\
Controls:\n\
  Ctrl+N            Start a new session\n\
  Up/Down + Enter   Pick a session on the home view\n\
  Enter             Send the message (Alt+Enter inserts a new line)\n\
  Up/Down/Mouse     Scroll through the conversation\n\
  Esc               Return to the home view\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    /// Model to use for chat
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(short = 'b', long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append a plain-text transcript of the conversation to this file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<String>,

    /// Seconds to wait for a provider reply before giving up
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    let config = Config::load()?;
    let settings = Settings::resolve(
        &config,
        args.model.as_deref(),
        args.base_url.as_deref(),
        args.timeout_secs,
    );

    run_chat(settings, args.log).await
}

/// Diagnostics are opt-in: without `RUST_LOG` nothing is emitted, so the
/// subscriber is only installed when the user asked for output they can
/// redirect away from the TUI.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_parsed() {
        let args = Args::parse_from([
            "kaiwa",
            "-m",
            "test-model",
            "-b",
            "http://localhost:8080/v1",
            "-l",
            "chat.log",
            "--timeout-secs",
            "15",
        ]);

        assert_eq!(args.model.as_deref(), Some("test-model"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(args.log.as_deref(), Some("chat.log"));
        assert_eq!(args.timeout_secs, Some(15));
    }

    #[test]
    fn all_flags_are_optional() {
        let args = Args::parse_from(["kaiwa"]);
        assert!(args.model.is_none());
        assert!(args.base_url.is_none());
        assert!(args.log.is_none());
        assert!(args.timeout_secs.is_none());
    }
}
