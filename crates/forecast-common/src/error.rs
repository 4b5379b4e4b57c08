//! Error types for the texture pipeline.

use thiserror::Error;

/// Result type alias using ForecastError.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Primary error type for fetch, decode, encode and cache operations.
///
/// Payloads are plain strings so a single build failure can be cloned out to
/// every request waiting on the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    // === Upstream Errors ===
    #[error("Upstream request failed for {url}: {message}")]
    UpstreamFetch { url: String, message: String },

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    // === Decode Errors ===
    #[error("GRIB decode failed: {0}")]
    Decode(String),

    #[error("Decoded message is missing key '{0}'")]
    MissingGridKey(String),

    // === Encode Errors ===
    #[error("Artifact encoding failed: {0}")]
    Encode(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    Storage(String),

    // === Dispatch Errors ===
    #[error("Product '{product}' does not provide '{extension}' artifacts")]
    UnsupportedArtifact { product: String, extension: String },

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    // === Infrastructure Errors ===
    #[error("Build cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForecastError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ForecastError::UnsupportedArtifact { .. } | ForecastError::UnknownProduct(_) => 404,

            ForecastError::UpstreamFetch { .. }
            | ForecastError::UpstreamStatus { .. }
            | ForecastError::Decode(_)
            | ForecastError::MissingGridKey(_) => 502,

            ForecastError::Cancelled => 503,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}
