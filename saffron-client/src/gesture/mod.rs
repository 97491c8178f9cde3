//! Touch gesture handling
//!
//! Two independent state machines drive the touch interactions:
//! [`transform::GestureTransformEngine`] for the hall-map pan/zoom and
//! [`pull_to_add::PullToAddMachine`] for the admin pull-to-add gesture on
//! the menu list. Both own their bookkeeping and know nothing about the
//! rendering layer; side effects come back as plain values.

pub mod platform;
pub mod pull_to_add;
pub mod transform;

pub use platform::{MobileGestureConfig, PlatformGestureConfig, WebGestureConfig};
pub use pull_to_add::{PullEffect, PullState, PullToAddMachine};
pub use transform::{GestureTransformEngine, TouchPoint, Transform};
