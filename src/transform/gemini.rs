//! Gemini (Google) transform client.

use crate::error::{ResumePhotoError, Result};
use crate::image::{decode_base64_lenient, EncodedImage};
use crate::transform::client::TransformClient;
use crate::transform::config::TransformConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Media type of every image handed back by the client.
pub const RESULT_MEDIA_TYPE: &str = "image/png";

/// Finish reasons that mean the model refused to draw.
const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "IMAGE_RECITATION",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

/// Transform client backed by the Gemini `generateContent` endpoint.
pub struct GeminiTransformClient {
    client: reqwest::Client,
    config: TransformConfig,
}

impl GeminiTransformClient {
    /// Creates a client from an explicit configuration.
    ///
    /// A missing credential is not an error here; it is reported by
    /// [`transform`](TransformClient::transform) before any request is sent.
    pub fn new(config: TransformConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Creates a client that reuses an existing HTTP client.
    pub fn with_http_client(config: TransformConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    async fn transform_impl(&self, image: &EncodedImage) -> Result<EncodedImage> {
        let api_key = self
            .config
            .credential()
            .ok_or(ResumePhotoError::MissingCredential)?;

        let start = Instant::now();
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url,
            self.config.model.as_str(),
        );
        let body = GeminiRequest::new(image, &self.config.instruction);

        tracing::debug!(
            model = %self.config.model,
            media_type = %image.media_type(),
            size_bytes = image.size(),
            "submitting resume photo transform"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = parse_error(&text);
            tracing::warn!(status = status.as_u16(), "transform request failed: {err}");
            return Err(err);
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let result = extract_image(gemini_response)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            size_bytes = result.size(),
            "resume photo transform complete"
        );

        Ok(result)
    }
}

#[async_trait]
impl TransformClient for GeminiTransformClient {
    async fn transform(&self, image: &EncodedImage) -> Result<EncodedImage> {
        self.transform_impl(image).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

/// Maps an error response body to `TransformationFailed`, keeping the
/// service's own message when it sent one.
fn parse_error(text: &str) -> ResumePhotoError {
    let message = serde_json::from_str::<GeminiErrorEnvelope>(text)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_default();
    ResumePhotoError::failed(message)
}

/// Pulls the first inline image out of a successful response.
fn extract_image(response: GeminiResponse) -> Result<EncodedImage> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("prompt blocked: {reason}"));
            return Err(ResumePhotoError::failed(msg));
        }
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ResumePhotoError::NoImageReturned);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if SAFETY_FINISH_REASONS.contains(&reason) {
            tracing::warn!(finish_reason = reason, "model declined to generate an image");
        }
    }

    let inline_data = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or(ResumePhotoError::NoImageReturned)?;

    let data = decode_base64_lenient(&inline_data.data)
        .map_err(|e| ResumePhotoError::failed(format!("invalid image data in response: {e}")))?;
    if data.is_empty() {
        return Err(ResumePhotoError::NoImageReturned);
    }

    Ok(EncodedImage::new(RESULT_MEDIA_TYPE, data))
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - inline image data or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn new(image: &EncodedImage, instruction: &str) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: image.media_type().to_string(),
                    data: image.to_base64(),
                },
            },
            GeminiRequestPart::Text {
                text: instruction.to_string(),
            },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: Option<String>,
}
