use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for HTTP store operations.
pub type HttpStoreResult<T> = Result<T, HttpStoreError>;

/// Errors raised by the HTTP session store backend.
#[derive(Debug, Error)]
pub enum HttpStoreError {
    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// Sending a request failed before a response arrived.
    #[error("request to `{path}` failed")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The node answered with an unexpected status.
    #[error("request to `{path}` returned status {status}")]
    RequestStatus { path: String, status: StatusCode },
    /// The response body could not be decoded.
    #[error("failed to decode response from `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpStoreError> for StorageError {
    fn from(err: HttpStoreError) -> Self {
        let message = err.to_string();
        StorageError::unavailable(message, err)
    }
}
