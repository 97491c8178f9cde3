//! Error types for the ordering client
//!
//! Backend error responses map onto these by HTTP status. Every variant
//! is recoverable at the UI level (alert, cached data, or an empty cart),
//! so there is no fatal case.

use thiserror::Error;

/// Errors surfaced by the ordering client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure talking to the backend or the image host
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend replied with success but the envelope carried no data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401: no token, or the session expired
    #[error("Authentication required")]
    Unauthorized,

    /// 403: admin-only operation without the admin role
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 404: menu item, table or order no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400: the backend rejected the request payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error: {0}")]
    Internal(String),

    /// A push payload did not match the shape its event type implies
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
