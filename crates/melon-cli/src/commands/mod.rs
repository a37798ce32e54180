pub mod analyze;
pub mod chat;
pub mod config;
pub mod features;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use melon_core::config::{AppConfig, ProviderKind};
use melon_core::provider::Backend;

#[derive(Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    Gemini,
    OpenRouter,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Gemini => ProviderKind::Gemini,
            ProviderArg::OpenRouter => ProviderKind::OpenRouter,
        }
    }
}

/// Options shared by every command that talks to a provider.
#[derive(Args)]
pub struct ProviderOpts {
    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured default provider
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
}

impl ProviderOpts {
    pub fn load_config(&self) -> Result<AppConfig> {
        match self.config {
            Some(ref path) => load_config(path),
            None => Ok(AppConfig::default()),
        }
    }

    pub fn backend(&self, config: &AppConfig) -> Result<Backend> {
        let kind = self
            .provider
            .map(ProviderKind::from)
            .unwrap_or(config.ai.default_provider);
        Backend::for_provider(kind, &config.ai)
            .with_context(|| format!("Failed to set up {} provider", kind))
    }
}

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load(path).with_context(|| format!("Failed to read config {}", path.display()))
}

/// Spinner shown while a provider call is in flight.
pub fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
