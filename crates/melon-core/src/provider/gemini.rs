//! Client for the Gemini `generateContent` REST endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{resolve_api_key, GeminiConfig, GEMINI_API_KEY_ENV};
use crate::error::ProviderError;
use crate::frame::ImageBuffer;
use crate::io::image_io::upload_bytes;
use crate::prompt::{DEFAULT_VISION_PROMPT, SYSTEM_PROMPT};

use super::http::HttpTransport;
use super::types::{ChatMessage, Role};
use super::AiBackend;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

fn text_part(text: impl Into<String>) -> Part {
    Part::Text { text: text.into() }
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

/// System messages from the history are folded into the system instruction;
/// the rest keep their order.
pub fn build_chat_request(
    config: &GeminiConfig,
    prompt: &str,
    history: &[ChatMessage],
) -> GenerateContentRequest {
    let mut system = vec![text_part(SYSTEM_PROMPT)];
    let mut contents = Vec::with_capacity(history.len() + 1);

    for msg in history {
        match msg.role {
            Role::System => system.push(text_part(msg.content.as_str())),
            role => contents.push(Content {
                role: Some(gemini_role(role)),
                parts: vec![text_part(msg.content.as_str())],
            }),
        }
    }
    contents.push(Content {
        role: Some("user"),
        parts: vec![text_part(prompt)],
    });

    GenerateContentRequest {
        contents,
        system_instruction: Content {
            role: None,
            parts: system,
        },
        generation_config: generation_config(config),
    }
}

pub fn build_vision_request(
    config: &GeminiConfig,
    prompt: &str,
    mime_type: &str,
    image_base64: String,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![
                text_part(prompt),
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: mime_type.to_string(),
                        data: image_base64,
                    },
                },
            ],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![text_part(SYSTEM_PROMPT)],
        },
        generation_config: generation_config(config),
    }
}

fn generation_config(config: &GeminiConfig) -> GenerationConfig {
    GenerationConfig {
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    }
}

/// Concatenate the text parts of the first candidate.
pub fn response_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ProviderError::InvalidResponse(format!(
            "prompt blocked: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("no candidates in response".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(ProviderError::InvalidResponse(format!(
            "empty candidate (finish reason: {reason})"
        )));
    }
    Ok(text)
}

/// Gemini text and vision client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    api_key: String,
    http: HttpTransport,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, http: HttpTransport) -> Result<Self, ProviderError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), GEMINI_API_KEY_ENV)
            .ok_or_else(|| {
                ProviderError::MissingApiKey("Gemini".into(), GEMINI_API_KEY_ENV.into())
            })?;
        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn generate(&self, model: &str, request: &GenerateContentRequest) -> Result<String, ProviderError> {
        let headers = [("x-goog-api-key", self.api_key.as_str())];
        let response: GenerateContentResponse =
            self.http.post_json(&self.endpoint(model), &headers, request)?;
        response_text(response)
    }
}

impl AiBackend for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn get_response(&self, prompt: &str, history: &[ChatMessage]) -> Result<String, ProviderError> {
        info!(model = %self.config.text_model, turns = history.len(), "Gemini chat request");
        let request = build_chat_request(&self.config, prompt, history);
        self.generate(&self.config.text_model, &request)
    }

    fn analyze_image(&self, image: &ImageBuffer, prompt: Option<&str>) -> Result<String, ProviderError> {
        let (bytes, mime) = upload_bytes(image).map_err(|e| ProviderError::Encode(e.to_string()))?;
        info!(model = %self.config.vision_model, bytes = bytes.len(), mime, "Gemini vision request");
        let request = build_vision_request(
            &self.config,
            prompt.unwrap_or(DEFAULT_VISION_PROMPT),
            mime,
            STANDARD.encode(&bytes),
        );
        self.generate(&self.config.vision_model, &request)
    }
}
