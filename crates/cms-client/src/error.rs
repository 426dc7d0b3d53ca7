//! Error types for the conferencing directory client.

use thiserror::Error;

/// Errors that can occur when talking to the conferencing directory API.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("directory returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The XML response could not be parsed.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
