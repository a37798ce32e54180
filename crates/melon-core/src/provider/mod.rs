pub mod gemini;
pub mod http;
pub mod openrouter;
pub mod types;

pub use gemini::GeminiClient;
pub use http::HttpTransport;
pub use openrouter::OpenRouterClient;
pub use types::{ChatMessage, Role};

use crate::config::{AiConfig, ProviderKind};
use crate::error::ProviderError;
use crate::frame::ImageBuffer;

/// Capabilities every completion provider offers.
///
/// Each call is a single blocking request; failures come back typed.
pub trait AiBackend {
    fn name(&self) -> &str;

    /// Text completion. `history` is the full prior conversation, oldest first.
    fn get_response(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, ProviderError>;

    /// Vision completion over one image. `None` uses the provider's default prompt.
    fn analyze_image(&self, image: &ImageBuffer, prompt: Option<&str>) -> Result<String, ProviderError>;
}

/// The configured provider, chosen once at startup.
#[derive(Debug, Clone)]
pub enum Backend {
    Gemini(GeminiClient),
    OpenRouter(OpenRouterClient),
}

impl Backend {
    /// Build the provider named by `config.default_provider`.
    pub fn from_config(config: &AiConfig) -> Result<Self, ProviderError> {
        Self::for_provider(config.default_provider, config)
    }

    pub fn for_provider(kind: ProviderKind, config: &AiConfig) -> Result<Self, ProviderError> {
        let http = HttpTransport::from_config(config)?;
        Ok(match kind {
            ProviderKind::Gemini => Self::Gemini(GeminiClient::new(config.gemini.clone(), http)?),
            ProviderKind::OpenRouter => {
                Self::OpenRouter(OpenRouterClient::new(config.openrouter.clone(), http)?)
            }
        })
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::OpenRouter(_) => ProviderKind::OpenRouter,
        }
    }
}

impl AiBackend for Backend {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(c) => c.name(),
            Self::OpenRouter(c) => c.name(),
        }
    }

    fn get_response(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(c) => c.get_response(prompt, history),
            Self::OpenRouter(c) => c.get_response(prompt, history),
        }
    }

    fn analyze_image(&self, image: &ImageBuffer, prompt: Option<&str>) -> Result<String, ProviderError> {
        match self {
            Self::Gemini(c) => c.analyze_image(image, prompt),
            Self::OpenRouter(c) => c.analyze_image(image, prompt),
        }
    }
}
