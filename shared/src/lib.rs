//! Shared types for the Saffron ordering client
//!
//! Common types used across the client crates: data models, API
//! request/response DTOs and push-channel message structures.

pub mod client;
pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Push channel re-exports (for convenient access)
pub use message::{ClientHello, PushEventType, PushMessage};
