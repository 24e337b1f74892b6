// THEORY:
// The hosted backend talks to a Gemini-style `generateContent` API. One model
// answers both vision and text prompts. A request carries a single user turn whose
// parts are the prompt text followed, for vision prompts, by the image as inline
// base64 data. The API key travels in the `x-goog-api-key` header rather than the
// query string so it does not end up in URL logs.
//
// A reply may contain several candidates with several parts each; the first
// candidate's text parts are concatenated. A reply with no candidates (for example
// one blocked by a safety filter) is malformed from our point of view.

use super::{GenerationRequest, ReasoningBackend, http_client};
use crate::config::HostedSettings;
use crate::error::ReasoningError;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
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
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

pub struct HostedBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HostedBackend {
    pub fn new(settings: &HostedSettings, timeout: Option<Duration>) -> Result<Self, ReasoningError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| ReasoningError::Client("hosted backend has no API key".into()))?;
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                settings.base_url.trim_end_matches('/'),
                settings.model
            ),
            api_key,
        })
    }

    async fn post(&self, request: GenerationRequest<'_>) -> Result<String, ReasoningError> {
        let mut parts = vec![Part::Text { text: request.prompt }];
        if let Some(image) = request.image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type,
                    data: &image.base64_data,
                },
            });
        }
        let body = GenerateContentRequest {
            contents: vec![Content { role: "user", parts }],
        };
        debug!(endpoint = %self.endpoint, with_image = request.image.is_some(), "hosted generateContent");

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ReasoningError::from_status(status, &text));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| ReasoningError::Malformed(e.to_string()))?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| ReasoningError::Malformed("reply has no candidates".into()))?;
        let reply: String = candidate.parts.into_iter().filter_map(|p| p.text).collect();
        Ok(reply.trim().to_string())
    }
}

impl ReasoningBackend for HostedBackend {
    fn name(&self) -> &str {
        "hosted"
    }

    fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> BoxFuture<'a, Result<String, ReasoningError>> {
        self.post(request).boxed()
    }
}
