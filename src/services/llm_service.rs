use crate::config::LlmConfig;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Failure reported by a completion backend. Never interpreted by the
/// pipeline, only propagated.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to call LLM service: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM service returned error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse LLM response: {0}")]
    Malformed(String),

    #[error("LLM response was blocked: {0}")]
    Blocked(String),
}

/// Anything that can turn prompt segments into one text completion.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Segments are sent in order as parts of a single user turn.
    async fn complete(&self, segments: &[&str]) -> Result<String, ProviderError>;
}

/// Google Gemini `generateContent` backend.
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_client: HttpClient,
}

impl GeminiProvider {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            http_client: HttpClient::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, segments: &[&str]) -> Result<String, ProviderError> {
        let parts: Vec<_> = segments.iter().map(|text| json!({ "text": text })).collect();

        let mut request = self.http_client.post(self.endpoint()).json(&json!({
            "contents": [{ "role": "user", "parts": parts }],
        }));

        // Without a key the request still goes out and the API rejects it
        if let Some(api_key) = &self.api_key {
            request = request.header("x-goog-api-key", api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        extract_text(body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(ProviderError::Blocked(reason));
    };

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "candidate has no text".to_string());
        return Err(ProviderError::Blocked(reason));
    }

    Ok(texts.concat())
}
