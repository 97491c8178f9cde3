//! Push channel message types
//!
//! JSON messages exchanged over the WebSocket push channel between the
//! ordering backend and connected clients.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Push event types consumed by the client.
///
/// The backend may introduce new types at any time; anything the client
/// does not recognize deserializes to [`PushEventType::Unknown`] and is
/// ignored rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushEventType {
    MenuUpdate,
    OrderUpdate,
    ReservationUpdate,
    CartUpdate,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PushEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushEventType::MenuUpdate => write!(f, "menu_update"),
            PushEventType::OrderUpdate => write!(f, "order_update"),
            PushEventType::ReservationUpdate => write!(f, "reservation_update"),
            PushEventType::CartUpdate => write!(f, "cart_update"),
            PushEventType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Push channel message body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub event_type: PushEventType,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PushMessage {
    pub fn new(event_type: PushEventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Parse the payload as a concrete type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// First outbound message after connecting; identifies the user so the
/// backend can target notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientHello {
    pub user_id: String,
    pub request_id: Uuid,
    pub client_version: Option<String>,
}

impl ClientHello {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            request_id: Uuid::new_v4(),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
