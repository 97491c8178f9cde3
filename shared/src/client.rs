//! Client-related types shared between the backend API and the client
//!
//! Common request/response types used in API communication.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Unified API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl UserInfo {
    /// Administrators may edit the menu and see hidden items
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

// =============================================================================
// Table availability
// =============================================================================

/// Table availability query parameters.
///
/// Serialized as an ISO-8601 timestamp pair in the query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAvailabilityQuery {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

// =============================================================================
// Image upload
// =============================================================================

/// Server-issued signature for a direct upload to the image host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub upload_url: String,
}

/// Result of a direct upload to the image host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
}
