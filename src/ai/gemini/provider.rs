//! Gemini API provider
//!
//! Handles the single outbound call to Google's `generateContent` endpoint:
//! - inline video parts (base64) next to the instruction text
//! - JSON response mode constrained by a response schema
//! - extraction of the text payload from the candidate envelope
//!
//! Transport failures and non-2xx statuses are reported as `ProviderError`,
//! without retries. A 2xx reply always yields text, possibly empty; judging
//! it is left to the response parser.

use super::error::ProviderError;
use super::types::MediaPayload;
use super::utils::{truncate_for_log, MAX_LOGGED_CHARS};
use crate::ai::config::AnalysisConfig;
use crate::ai::http_client::build_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Everything sent to the provider for one analysis
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub media: Vec<MediaPayload>,
    /// Response schema in the provider's dialect
    pub response_schema: Value,
}

/// One round trip to a generative model
///
/// Returns the raw response text; interpreting it is the caller's job. Only
/// a failed call (network, auth, quota, rejected request) is an error.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

/// Gemini API client
pub struct GeminiProvider {
    client: Client,
    config: AnalysisConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(config: AnalysisConfig) -> Result<Self, ProviderError> {
        let client = build_client(config.request_timeout)?;
        Ok(Self { client, config })
    }

    /// Create a provider on top of an existing HTTP client
    pub fn with_client(client: Client, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let body = GenerateContentRequest::from_request(request);

        info!(
            model = %self.config.model,
            media_parts = request.media.len(),
            "Sending analysis request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&text);
            warn!(status = status.as_u16(), message = %message, "Provider rejected request");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(extract_response_text(&text))
    }
}

/// Text payload of a successful reply
///
/// A body without usable text (blocked prompt, empty candidate, or not a
/// `generateContent` envelope at all) is logged and yields an empty string,
/// which the response parser rejects as a format failure.
fn extract_response_text(body: &str) -> String {
    let parsed: GenerateContentResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(
                error = %e,
                raw_body = %truncate_for_log(body, MAX_LOGGED_CHARS),
                "Provider reply is not a generateContent envelope"
            );
            debug!(raw_body = %body, "Full provider reply");
            return String::new();
        }
    };

    if let Some(usage) = &parsed.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            total_tokens = usage.total_token_count,
            "Provider usage"
        );
    }

    match parsed.into_text() {
        Ok(text) => text,
        Err(reason) => {
            warn!(
                reason = reason.as_deref().unwrap_or("unspecified"),
                raw_body = %truncate_for_log(body, MAX_LOGGED_CHARS),
                "Provider returned no text"
            );
            debug!(raw_body = %body, "Full provider reply");
            String::new()
        }
    }
}

/// Pull the human-readable message out of an error body
///
/// Falls back to the raw body when it is not the usual `{"error": {...}}`.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        error: ApiErrorDetail,
    }

    #[derive(Deserialize)]
    struct ApiErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => api_error.error.message,
        Err(_) => body.trim().to_string(),
    }
}

// API request/response types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        let mut parts = Vec::with_capacity(request.media.len() + 1);
        parts.push(Part::Text {
            text: &request.prompt,
        });
        parts.extend(request.media.iter().map(|media| Part::InlineData {
            inline_data: InlineData {
                mime_type: &media.mime_type,
                data: &media.data,
            },
        }));

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    ///
    /// Without any text, returns the finish or block reason instead.
    fn into_text(self) -> Result<String, Option<String>> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(block_reason);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(candidate.finish_reason.or(block_reason));
        }

        Ok(text)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
