// THEORY:
// The local backend speaks the `POST /api/generate` protocol of a model server
// running next to the user (Ollama and compatible servers). A request is one JSON
// object `{model, prompt, images?, stream: false}`; the reply is one JSON object
// whose `response` field holds the whole completion. Streaming is always off, so
// one request yields exactly one reply body.
//
// Vision prompts go to the vision model and text prompts to the text model; both
// are usually served by the same endpoint.

use super::{GenerationRequest, ModelRole, ReasoningBackend, http_client};
use crate::config::LocalSettings;
use crate::error::ReasoningError;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<&'a str>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

pub struct LocalBackend {
    client: reqwest::Client,
    endpoint: String,
    vision_model: String,
    text_model: String,
}

impl LocalBackend {
    pub fn new(settings: &LocalSettings, timeout: Option<Duration>) -> Result<Self, ReasoningError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/api/generate", settings.base_url.trim_end_matches('/')),
            vision_model: settings.vision_model.clone(),
            text_model: settings.text_model.clone(),
        })
    }

    fn model_for(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Vision => &self.vision_model,
            ModelRole::Text => &self.text_model,
        }
    }

    async fn post(&self, request: GenerationRequest<'_>) -> Result<String, ReasoningError> {
        let body = GenerateRequest {
            model: self.model_for(request.role),
            prompt: request.prompt,
            images: request.image.map(|i| i.base64_data.as_str()).into_iter().collect(),
            stream: false,
        };
        debug!(endpoint = %self.endpoint, model = body.model, images = body.images.len(), "local generate");

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ReasoningError::from_status(status, &text));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ReasoningError::Malformed(e.to_string()))?;
        parsed
            .response
            .map(|reply| reply.trim().to_string())
            .ok_or_else(|| ReasoningError::Malformed("reply has no 'response' field".into()))
    }
}

impl ReasoningBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> BoxFuture<'a, Result<String, ReasoningError>> {
        self.post(request).boxed()
    }
}
