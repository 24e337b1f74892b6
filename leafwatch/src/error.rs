// THEORY:
// Errors come in two layers. `ReasoningError` is everything that can go wrong
// while talking to a remote model; the pipeline never lets it escape, it turns
// it into inline report text instead. `LeafwatchError` is the short list of
// things that genuinely stop a run: the image is missing or unreadable, the
// image is blank, the model says it is not a plant, or the configuration is
// unusable.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LeafwatchError>;

/// Fatal errors. Each one ends the run with a printed message.
#[derive(Debug, Error)]
pub enum LeafwatchError {
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("could not decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not encode image for transport: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// The normalized frame has almost no pixel variance.
    #[error("the image appears blank (pixel std-dev {std_dev:.2})")]
    BlankImage { std_dev: f64 },

    /// The remote model judged the image not to show a single plant.
    #[error("not a valid plant image: {verdict}")]
    NotAPlant { verdict: String },
}

/// Problems loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown backend '{0}' (expected 'local' or 'hosted')")]
    UnknownBackend(String),

    #[error("the hosted backend needs an API key (set GEMINI_API_KEY or [hosted].api_key)")]
    MissingApiKey,

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Failures of a single remote model call.
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend reply: {0}")]
    Malformed(String),

    #[error("could not build client: {0}")]
    Client(String),
}

impl ReasoningError {
    /// Maps a non-success response into a `Status` error, keeping a short body snippet.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let snippet: String = body.chars().take(200).collect();
        Self::Status {
            status: status.as_u16(),
            body: snippet,
        }
    }
}
