use thiserror::Error;

#[derive(Error, Debug)]
pub enum MelonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl From<image::ImageError> for MelonError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(u) => Self::UnsupportedFormat(u.to_string()),
            image::ImageError::IoError(io) => Self::Io(io),
            other => Self::Decode(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for MelonError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Failure of a single call to a remote completion provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication rejected (http {0})")]
    Unauthorized(u16),

    #[error("rate limited")]
    RateLimited,

    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing api key for {0}: set it in the config file or the {1} environment variable")]
    MissingApiKey(String, String),

    #[error("could not encode image: {0}")]
    Encode(String),
}

impl ProviderError {
    /// Transient failures worth another attempt.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) | Self::RateLimited => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Network, authentication, or non-2xx failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Timeout(_)
                | Self::Unauthorized(_)
                | Self::RateLimited
                | Self::Http { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MelonError>;
