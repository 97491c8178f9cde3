//! Data models
//!
//! Shared between the ordering backend and the client (via API). The
//! backend owns the canonical lifecycle of these records; the client
//! caches and displays them.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod reservation;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
