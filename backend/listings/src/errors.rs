//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    /// The request was rejected before any call was built.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No signer connected")]
    NoSignerConnected,

    /// The signer or the ledger refused the call.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The ledger returned an object we cannot read as a property.
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// Transport or JSON-RPC failure while reading from the ledger.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ListingError {
    fn from(err: reqwest::Error) -> Self {
        ListingError::QueryFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ListingError {
    fn from(err: serde_json::Error) -> Self {
        ListingError::QueryFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;
