//! Error types for the analysis pipeline

use std::path::PathBuf;
use thiserror::Error;

/// User-facing text for a response that could not be parsed
pub const FORMAT_ERROR_MESSAGE: &str = "The analysis result was not in the expected format.";

/// A file could not be turned into an inline media payload
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid media type {0:?}")]
    InvalidMediaType(String),
}

/// The provider call itself failed
///
/// A reply that arrived with a success status is never a `ProviderError`,
/// however unusable its content.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The provider answered, but not with a usable analysis
///
/// Carries no details on purpose: the raw text and parser error are logged
/// where the failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", FORMAT_ERROR_MESSAGE)]
pub struct AnalysisFormatError;

/// Everything `FightAnalysisClient::analyze` can fail with
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Format(#[from] AnalysisFormatError),
}
