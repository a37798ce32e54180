//! Client for the OpenRouter chat completions API (OpenAI-compatible schema).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{resolve_api_key, OpenRouterConfig, OPENROUTER_API_KEY_ENV};
use crate::error::ProviderError;
use crate::frame::ImageBuffer;
use crate::io::image_io::upload_bytes;
use crate::prompt::{DEFAULT_VISION_PROMPT, SYSTEM_PROMPT};

use super::http::HttpTransport;
use super::types::{ChatMessage, Role};
use super::AiBackend;

const APP_TITLE: &str = "MelonBuddy";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: Option<serde_json::Value>,
}

fn system_message() -> RequestMessage {
    RequestMessage {
        role: Role::System,
        content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
    }
}

pub fn build_chat_request(
    config: &OpenRouterConfig,
    prompt: &str,
    history: &[ChatMessage],
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(system_message());
    messages.extend(history.iter().map(|m| RequestMessage {
        role: m.role,
        content: MessageContent::Text(m.content.clone()),
    }));
    messages.push(RequestMessage {
        role: Role::User,
        content: MessageContent::Text(prompt.to_string()),
    });

    ChatCompletionRequest {
        model: config.text_model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// The image travels as a `data:` URL inside an `image_url` part.
pub fn build_vision_request(
    config: &OpenRouterConfig,
    prompt: &str,
    mime_type: &str,
    image_base64: &str,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.vision_model.clone(),
        messages: vec![
            system_message(),
            RequestMessage {
                role: Role::User,
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:{mime_type};base64,{image_base64}"),
                        },
                    },
                ]),
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Content of the first choice. An `error` object in a 200 reply is still a failure.
pub fn response_text(response: ChatCompletionResponse) -> Result<String, ProviderError> {
    if let Some(err) = response.error {
        let code = err.code.map(|c| c.to_string()).unwrap_or_default();
        return Err(ProviderError::InvalidResponse(
            format!("{} {}", code, err.message).trim().to_string(),
        ));
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("no content in response".into()))
}

/// OpenRouter text and vision client.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    config: OpenRouterConfig,
    authorization: String,
    http: HttpTransport,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig, http: HttpTransport) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), OPENROUTER_API_KEY_ENV)
            .ok_or_else(|| {
                ProviderError::MissingApiKey("OpenRouter".into(), OPENROUTER_API_KEY_ENV.into())
            })?;
        Ok(Self {
            config,
            authorization: format!("Bearer {api_key}"),
            http,
        })
    }

    fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let headers = [
            ("Authorization", self.authorization.as_str()),
            ("X-Title", APP_TITLE),
        ];
        let response: ChatCompletionResponse = self.http.post_json(&url, &headers, request)?;
        response_text(response)
    }
}

impl AiBackend for OpenRouterClient {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    fn get_response(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, ProviderError> {
        info!(model = %self.config.text_model, turns = history.len(), "OpenRouter chat request");
        self.complete(&build_chat_request(&self.config, prompt, history))
    }

    fn analyze_image(&self, image: &ImageBuffer, prompt: Option<&str>) -> Result<String, ProviderError> {
        let (bytes, mime) = upload_bytes(image).map_err(|e| ProviderError::Encode(e.to_string()))?;
        info!(model = %self.config.vision_model, bytes = bytes.len(), mime, "OpenRouter vision request");
        let encoded = STANDARD.encode(&bytes);
        self.complete(&build_vision_request(
            &self.config,
            prompt.unwrap_or(DEFAULT_VISION_PROMPT),
            mime,
            &encoded,
        ))
    }
}
