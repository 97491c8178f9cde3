//! Saffron Client - restaurant ordering client core
//!
//! Client-side logic for the Saffron ordering app: HTTP calls to the
//! backend API, the reconnecting push listener, reservation time-window
//! math, hall-map gesture handling, the pull-to-add gesture and the
//! persisted cart.

pub mod cache;
pub mod cart;
pub mod config;
pub mod error;
pub mod gesture;
pub mod http;
pub mod timewindow;
pub mod ws;

pub use cache::CacheVersionService;
pub use cart::{CartStore, CartState};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use ws::{PushListener, PushListenerHandle, decode_payload};

// Re-export shared types for convenience
pub use shared::client::{ApiResponse, LoginResponse, UserInfo};
pub use shared::message::{PushEventType, PushMessage};
