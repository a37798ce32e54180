use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::error::{MelonError, Result};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Which remote provider answers analysis and chat requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenRouter,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "Gemini"),
            Self::OpenRouter => write!(f, "OpenRouter"),
        }
    }
}

/// Top-level configuration, loaded once at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.ai.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MelonError::Config(e.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub default_provider: ProviderKind,
    /// Upper bound on one HTTP request, in seconds.
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub gemini: GeminiConfig,
    pub openrouter: OpenRouterConfig,
}

impl AiConfig {
    /// Reject settings that would make every provider call fail.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(MelonError::Config(
                "ai.request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry: RetryConfig::default(),
            gemini: GeminiConfig::default(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

/// Exponential backoff for transient provider failures.
///
/// `max_retries = 0` means a single attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            min_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            text_model: "gemini-pro".into(),
            vision_model: "gemini-pro-vision".into(),
            temperature: 0.7,
            max_output_tokens: 1000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".into(),
            text_model: "anthropic/claude-3-opus".into(),
            vision_model: "openai/gpt-4-vision".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Pick the configured key, falling back to the environment. Blank keys count as absent.
pub fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        })
}
