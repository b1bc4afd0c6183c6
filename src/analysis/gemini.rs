//! A client for the Gemini text generation API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The Gemini API host.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Something that can answer a prompt with text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}

/// Generates text with a Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client for `model` that authenticates with `api_key`.
    ///
    /// # Errors
    /// Returns [Error::MissingApiKey] if `api_key` is empty.
    pub fn new(api_key: &str, model: &str) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: GEMINI_BASE_URL.to_owned(),
        })
    }

    /// Send requests to `base_url` instead of the public Gemini API.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        tracing::debug!("Calling Gemini model {}", self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| Error::AnalysisRequest(error.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::AnalysisRequest(format!(
                "Gemini responded with status {status}: {error_text}"
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| Error::AnalysisParse(format!("unexpected response body: {error}")))?;

        reply_text(reply)
    }
}

/// Join the text parts of the first candidate.
fn reply_text(reply: GenerateContentResponse) -> Result<String, Error> {
    let text: String = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Err(Error::AnalysisParse("empty response from Gemini".to_owned()))
    } else {
        Ok(text)
    }
}
