//! Error types for the Tavus client.

use thiserror::Error;

/// Tavus client error type.
#[derive(Error, Debug)]
pub enum TavusError {
    /// The client was constructed without an API key.
    #[error("Missing Tavus API key. Cannot proceed.")]
    MissingApiKey,

    /// Persona or replica id was empty.
    #[error("persona_id and replica_id are required for conversation")]
    MissingIds,

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed or the body could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with status >= 400.
    #[error("Tavus API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// Result type alias for Tavus operations.
pub type Result<T> = std::result::Result<T, TavusError>;
