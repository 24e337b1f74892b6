// THEORY:
// The reasoning layer is the only part of the system that talks to the network.
// It exposes one capability interface, `ReasoningBackend`, with the questions the
// pipeline needs answered:
//
// - `validate_image`: is this a single plant, and does it look stressed?
// - `explain`: narrate the computed metrics in plain language.
// - `self_rate_confidence`: how sure is the model of its own narrative?
// - `describe_scene`: free-form description of whatever the image shows.
//
// A backend only has to implement `generate`, a single prompt (optionally with an
// image) in, reply text out. The four capabilities are default methods built on
// top of it, so the prompt wording and reply parsing live in exactly one place and
// the hosted and local variants differ only in wire format.
//
// Methods return `BoxFuture` so the trait stays object-safe and the backend can be
// picked from configuration at runtime as a `Box<dyn ReasoningBackend>`.
//
// Nothing in here decides what a failure means for the report. Every call returns
// a `ReasoningError` on failure and the pipeline turns it into inline text.

pub mod hosted;
pub mod local;
pub mod prompts;

use crate::config::{BackendKind, LeafwatchConfig};
use crate::error::ReasoningError;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::fmt;

pub use hosted::HostedBackend;
pub use local::LocalBackend;

/// Which model a request is meant for. The local backend serves these from two
/// different models; the hosted backend uses one model for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Vision,
    Text,
}

/// A base64-encoded image ready to be embedded in a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: &'static str,
    pub base64_data: String,
}

impl EncodedImage {
    pub fn jpeg(base64_data: String) -> Self {
        Self {
            mime_type: "image/jpeg",
            base64_data,
        }
    }
}

/// A single prompt, optionally with an attached image.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub role: ModelRole,
    pub prompt: &'a str,
    pub image: Option<&'a EncodedImage>,
}

impl<'a> GenerationRequest<'a> {
    pub fn vision(prompt: &'a str, image: &'a EncodedImage) -> Self {
        Self {
            role: ModelRole::Vision,
            prompt,
            image: Some(image),
        }
    }

    pub fn text(prompt: &'a str) -> Self {
        Self {
            role: ModelRole::Text,
            prompt,
            image: None,
        }
    }
}

/// The model's own 0–100 rating of its explanation. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "lowercase")]
pub enum SelfRatedConfidence {
    Rated(f64),
    Indeterminate,
}

impl fmt::Display for SelfRatedConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfRatedConfidence::Rated(percent) => write!(f, "{percent:.1}%"),
            SelfRatedConfidence::Indeterminate => f.write_str("Could not determine"),
        }
    }
}

/// Keeps only digits and decimal points, parses what is left, and clamps to [0, 100].
pub fn parse_confidence(reply: &str) -> SelfRatedConfidence {
    let scrubbed: String = reply
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match scrubbed.parse::<f64>() {
        Ok(value) if value.is_finite() => SelfRatedConfidence::Rated(value.clamp(0.0, 100.0)),
        _ => SelfRatedConfidence::Indeterminate,
    }
}

/// Outcome of the plant validation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantVerdict {
    Plant,
    NotPlant,
}

/// The reply rejects the image when "no" appears anywhere in it, in any case.
/// "Not", "Nope" and "None" therefore reject too.
pub fn parse_verdict(reply: &str) -> PlantVerdict {
    if reply.to_lowercase().contains("no") {
        PlantVerdict::NotPlant
    } else {
        PlantVerdict::Plant
    }
}

/// A remote vision/language model.
pub trait ReasoningBackend: Send + Sync {
    /// Short human-readable name, used in logs and reports.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the trimmed reply text.
    fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> BoxFuture<'a, Result<String, ReasoningError>>;

    fn validate_image<'a>(&'a self, image: &'a EncodedImage) -> BoxFuture<'a, Result<String, ReasoningError>> {
        self.generate(GenerationRequest::vision(prompts::VALIDATION_PROMPT, image))
    }

    fn explain<'a>(&'a self, summary_prompt: &'a str) -> BoxFuture<'a, Result<String, ReasoningError>> {
        self.generate(GenerationRequest::text(summary_prompt))
    }

    fn self_rate_confidence<'a>(
        &'a self,
        summary: &'a str,
    ) -> BoxFuture<'a, Result<SelfRatedConfidence, ReasoningError>> {
        async move {
            let prompt = prompts::self_rating_prompt(summary);
            let reply = self.generate(GenerationRequest::text(&prompt)).await?;
            Ok(parse_confidence(&reply))
        }
        .boxed()
    }

    fn describe_scene<'a>(&'a self, image: &'a EncodedImage) -> BoxFuture<'a, Result<String, ReasoningError>> {
        self.generate(GenerationRequest::vision(prompts::SCENE_DESCRIPTION_PROMPT, image))
    }
}

/// Builds the backend selected by `config.backend`.
pub fn backend_from_config(config: &LeafwatchConfig) -> Result<Box<dyn ReasoningBackend>, ReasoningError> {
    let timeout = config.request_timeout();
    let backend: Box<dyn ReasoningBackend> = match config.backend {
        BackendKind::Local => Box::new(LocalBackend::new(&config.local, timeout)?),
        BackendKind::Hosted => Box::new(HostedBackend::new(&config.hosted, timeout)?),
    };
    Ok(backend)
}

/// Shared reqwest client construction for both backends.
pub(crate) fn http_client(timeout: Option<std::time::Duration>) -> Result<reqwest::Client, ReasoningError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| ReasoningError::Client(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_parses_plain_numbers() {
        assert_eq!(parse_confidence("85"), SelfRatedConfidence::Rated(85.0));
        assert_eq!(parse_confidence(" 72.5\n"), SelfRatedConfidence::Rated(72.5));
        assert_eq!(parse_confidence("About 90%"), SelfRatedConfidence::Rated(90.0));
    }

    #[test]
    fn confidence_clamps_to_percent_range() {
        assert_eq!(parse_confidence("120"), SelfRatedConfidence::Rated(100.0));
    }

    #[test]
    fn confidence_without_a_number_is_indeterminate() {
        assert_eq!(parse_confidence("no idea"), SelfRatedConfidence::Indeterminate);
        assert_eq!(parse_confidence(""), SelfRatedConfidence::Indeterminate);
        // Two numbers run together do not form one.
        assert_eq!(parse_confidence("between 70.5 and 80.5"), SelfRatedConfidence::Indeterminate);
    }

    #[test]
    fn confidence_display() {
        assert_eq!(SelfRatedConfidence::Rated(87.0).to_string(), "87.0%");
        assert_eq!(SelfRatedConfidence::Indeterminate.to_string(), "Could not determine");
    }

    #[test]
    fn verdicts() {
        assert_eq!(parse_verdict("Yes"), PlantVerdict::Plant);
        assert_eq!(parse_verdict("Yes, it looks wilted."), PlantVerdict::Plant);
        assert_eq!(parse_verdict("No."), PlantVerdict::NotPlant);
        assert_eq!(parse_verdict("NO, this is a car"), PlantVerdict::NotPlant);
        assert_eq!(parse_verdict("Yes, but no visible wilting"), PlantVerdict::NotPlant);
    }

    #[test]
    fn any_no_substring_rejects() {
        assert_eq!(parse_verdict("Yes. The plant does not look stressed."), PlantVerdict::NotPlant);
        assert_eq!(parse_verdict("Not a plant, this is a car."), PlantVerdict::NotPlant);
        assert_eq!(parse_verdict("None of the image is a plant"), PlantVerdict::NotPlant);
        assert_eq!(parse_verdict("Nope"), PlantVerdict::NotPlant);
    }
}
