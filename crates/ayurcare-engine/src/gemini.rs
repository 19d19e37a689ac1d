//! Gemini `generateContent` client.
//!
//! Issues exactly one request per exchange. No retries, no streaming.

use crate::catalog::SYSTEM_PROMPT;
use crate::gateway::{build_turns, GatewayError, GenerationParams, ResponseGateway, Turn};
use crate::message::HistoryEntry;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Public Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Turn>,
    system_instruction: SystemInstruction<'a>,
    generation_config: GenerationParams,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [TextRef<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextRef<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GenerateContentResponse {
    /// Text of the first candidate, skipping thought parts.
    fn reply_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn request_body<'a>(
    message: &str,
    history: &[HistoryEntry],
    system_prompt: &'a str,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: build_turns(message, history),
        system_instruction: SystemInstruction {
            parts: [TextRef {
                text: system_prompt,
            }],
        },
        generation_config: GenerationParams::FIXED,
    }
}

/// Builder for [`GeminiGateway`].
#[derive(Debug, Clone)]
pub struct GeminiGatewayBuilder {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout_secs: u64,
    system_prompt: String,
}

impl GeminiGatewayBuilder {
    /// Set the API key. A gateway without one fails every call.
    #[must_use]
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Override the REST base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Override the system instruction sent with every request.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn build(self) -> Result<GeminiGateway, GatewayError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(GatewayError::Network)?;
        Ok(GeminiGateway {
            api_key: self.api_key,
            base_url: self.base_url,
            model: self.model,
            timeout_secs: self.timeout_secs,
            system_prompt: self.system_prompt,
            client,
        })
    }
}

impl Default for GeminiGatewayBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Response gateway backed by the hosted Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout_secs: u64,
    system_prompt: String,
    client: HttpClient,
}

impl GeminiGateway {
    pub fn builder() -> GeminiGatewayBuilder {
        GeminiGatewayBuilder::default()
    }

    /// Gateway with default endpoint, model and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Self::builder().api_key(Some(api_key.into())).build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.timeout_secs)
        } else {
            GatewayError::Network(e)
        }
    }
}

#[async_trait]
impl ResponseGateway for GeminiGateway {
    #[instrument(skip(self, message, history), fields(model = %self.model, history_len = history.len()))]
    async fn respond(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<Option<String>, GatewayError> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("No API key configured");
            return Err(GatewayError::MissingApiKey);
        };

        let body = request_body(message, history, &self.system_prompt);
        debug!(turns = body.contents.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "Gemini API error response");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %text, "Failed to parse Gemini response");
            GatewayError::Malformed(e.to_string())
        })?;

        let reply = parsed.reply_text();
        debug!(has_reply = reply.is_some(), "Gemini response received");
        Ok(reply)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
