//! Platform-specific gesture tuning
//!
//! Web and mobile targets report gesture velocity differently, so the pan
//! sensitivity differs per platform. The strategy is injected into the
//! transform engine at construction.

/// Per-platform gesture constants
pub trait PlatformGestureConfig: Send + Sync {
    /// Multiplier applied to pan deltas
    fn pan_sensitivity(&self) -> f32;
}

/// Web target: pointer events already arrive in CSS pixels
#[derive(Debug, Clone, Copy, Default)]
pub struct WebGestureConfig;

impl PlatformGestureConfig for WebGestureConfig {
    fn pan_sensitivity(&self) -> f32 {
        1.0
    }
}

/// Mobile target: native touch deltas under-report relative to the web
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileGestureConfig;

impl PlatformGestureConfig for MobileGestureConfig {
    fn pan_sensitivity(&self) -> f32 {
        1.5
    }
}
