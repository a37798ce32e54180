use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use melon_core::provider::{AiBackend, ChatMessage};
use tracing::debug;

use super::{spinner, ProviderOpts};
use crate::summary::print_reply;

#[derive(Args)]
pub struct ChatArgs {
    /// Question for the assistant
    pub message: String,

    #[command(flatten)]
    pub provider: ProviderOpts,

    /// JSON file holding the conversation so far; updated after each reply
    #[arg(long)]
    pub history: Option<PathBuf>,
}

pub fn run(args: &ChatArgs) -> Result<()> {
    let config = args.provider.load_config()?;
    let backend = args.provider.backend(&config)?;

    let mut history = match args.history {
        Some(ref path) if path.exists() => load_history(path)?,
        _ => Vec::new(),
    };
    debug!(turns = history.len(), "Loaded chat history");

    let pb = spinner(&format!("Asking {}", backend.name()))?;
    let reply = backend.get_response(&args.message, &history);
    pb.finish_and_clear();
    let reply = reply.with_context(|| format!("{} did not answer", backend.name()))?;

    print_reply(backend.name(), &reply);

    if let Some(ref path) = args.history {
        history.push(ChatMessage::user(args.message.as_str()));
        history.push(ChatMessage::assistant(reply));
        save_history(path, &history)?;
    }
    Ok(())
}

fn load_history(path: &Path) -> Result<Vec<ChatMessage>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history {}", path.display()))?;
    serde_json::from_str(&contents).context("Invalid chat history")
}

fn save_history(path: &Path, history: &[ChatMessage]) -> Result<()> {
    let json = serde_json::to_string_pretty(history)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write history {}", path.display()))
}
