//! Error taxonomy shared by every front end.
//!
//! Each failure a user can hit maps to exactly one of these types, so the UI
//! decides how to surface it (inline message, silent redirect, blocking
//! notice) by matching on the type rather than on message text.

use reqwest::StatusCode;
use thiserror::Error;

/// No backend base URL was configured anywhere.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Backend URL missing. Set PREPPILOT_BACKEND_URL in the environment, .env or config file.")]
    MissingBackendUrl,
}

/// The form input does not meet the minimum requirements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please paste a valid Job Description (min {min} characters, got {actual}).")]
    JobDescriptionTooShort { min: usize, actual: usize },
}

/// The generation call failed after it was attempted.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("could not reach the generation backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// 4xx: the backend refused the request as sent.
    #[error("generation backend rejected the request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    /// 5xx and anything else that is not a success.
    #[error("generation backend failed ({status}): {body}")]
    Service { status: StatusCode, body: String },

    #[error("generation backend returned an unreadable prep pack: {0}")]
    Decode(#[from] LoadError),
}

impl GenerationError {
    /// Message shown to the user. The same for every variant.
    pub fn user_message(&self) -> &'static str {
        "Generation failed. Check that the backend is running and its OpenRouter key is set, then try again."
    }
}

/// The stored result could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no prep pack stored")]
    NotFound,

    #[error("stored prep pack is malformed: {0}")]
    Parse(String),

    #[error("could not read stored prep pack: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

/// Writing a prep pack to the session slot failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not serialize prep pack: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write prep pack: {0}")]
    Io(#[from] std::io::Error),
}

/// Rendering or writing the PDF failed; no file is left behind.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("could not write PDF: {0}")]
    Io(#[from] std::io::Error),
}
