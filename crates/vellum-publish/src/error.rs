//! Error types for the publish client.

/// Error from publish collaborator operations.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A publish operation is already in flight on this client.
    #[error("a publish operation is already in progress")]
    AlreadyInProgress,

    /// HTTP request failed (network error, timeout).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// HTTP response error (collaborator returned an error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Collaborator accepted the request but rejected the document.
    #[error("publish rejected: {0}")]
    Rejected(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}
