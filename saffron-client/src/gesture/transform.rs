//! Hall-map pan/zoom transform engine
//!
//! Converts raw multi-touch frames into a 2D affine transform (uniform
//! scale + translation) for the hall-map view. One moving contact pans,
//! two contacts pinch-zoom. The engine re-baselines the pinch distance on
//! every entry into the zoom state so the scale never jumps.

use super::platform::PlatformGestureConfig;
use shared::models::TablePlacement;

/// Minimum map scale
pub const MIN_SCALE: f32 = 0.3;

/// Maximum map scale
pub const MAX_SCALE: f32 = 3.0;

/// Movement below this (px, either axis) is not a pan
pub const PAN_DEAD_ZONE: f32 = 2.0;

/// A single touch contact in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: TouchPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// View transform owned by the map view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Transform {
    /// Map a point from hall coordinates to view coordinates.
    ///
    /// Translation is kept in hall units (pan deltas are divided by the
    /// scale on input), so it is applied before scaling.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x + self.translate_x) * self.scale,
            (y + self.translate_y) * self.scale,
        )
    }

    /// Project a table's floor-plan placement through this transform for
    /// rendering on the hall-map view
    pub fn project_placement(&self, placement: &TablePlacement) -> TablePlacement {
        let (x, y) = self.apply(placement.x, placement.y);
        TablePlacement {
            table_id: placement.table_id.clone(),
            x,
            y,
            width: placement.width * self.scale,
            height: placement.height * self.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Panning,
    Zooming,
}

/// Pan/zoom state machine over touch contact count
pub struct GestureTransformEngine {
    config: Box<dyn PlatformGestureConfig>,
    transform: Transform,
    phase: Phase,
    /// First contact position when the gesture began
    gesture_origin: Option<TouchPoint>,
    /// Translation at the moment the pan began
    pan_baseline: (f32, f32),
    /// Pinch distance and scale recorded on entry into Zooming
    zoom_baseline: Option<(f32, f32)>,
}

impl std::fmt::Debug for GestureTransformEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureTransformEngine")
            .field("transform", &self.transform)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl GestureTransformEngine {
    pub fn new(config: Box<dyn PlatformGestureConfig>) -> Self {
        Self {
            config,
            transform: Transform::default(),
            phase: Phase::Idle,
            gesture_origin: None,
            pan_baseline: (0.0, 0.0),
            zoom_baseline: None,
        }
    }

    /// Current view transform
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_zooming(&self) -> bool {
        self.phase == Phase::Zooming
    }

    /// Reset to the identity transform (explicit user action)
    pub fn reset(&mut self) {
        self.transform = Transform::default();
        self.end_gesture();
    }

    /// Feed one touch frame. Call on every touch-start/move event with
    /// the full set of active contacts.
    pub fn update(&mut self, contacts: &[TouchPoint]) {
        match contacts {
            [] => self.end_gesture(),
            [single] => self.update_single(*single),
            [a, b, ..] => self.update_pinch(*a, *b),
        }
    }

    /// All contacts lifted
    pub fn release(&mut self) {
        self.end_gesture();
    }

    /// A competing recognizer took over; behaves like a release
    pub fn force_cancel(&mut self) {
        self.end_gesture();
    }

    fn update_single(&mut self, contact: TouchPoint) {
        // Dropping from two contacts to one ends the pinch; the remaining
        // finger starts a fresh pan from its current position.
        if self.phase == Phase::Zooming {
            self.phase = Phase::Idle;
            self.zoom_baseline = None;
            self.gesture_origin = None;
        }

        let origin = match self.gesture_origin {
            Some(origin) => origin,
            None => {
                self.gesture_origin = Some(contact);
                self.pan_baseline = (self.transform.translate_x, self.transform.translate_y);
                return;
            }
        };

        let dx = contact.x - origin.x;
        let dy = contact.y - origin.y;

        if self.phase == Phase::Idle {
            if dx.abs() <= PAN_DEAD_ZONE && dy.abs() <= PAN_DEAD_ZONE {
                return;
            }
            self.phase = Phase::Panning;
            tracing::trace!("pan started");
        }

        // Divide by scale so a zoomed-in map pans by the same map distance
        let sensitivity = self.config.pan_sensitivity();
        let scale = self.transform.scale.max(f32::EPSILON);
        self.transform.translate_x = self.pan_baseline.0 + dx / scale * sensitivity;
        self.transform.translate_y = self.pan_baseline.1 + dy / scale * sensitivity;
    }

    fn update_pinch(&mut self, a: TouchPoint, b: TouchPoint) {
        let distance = a.distance_to(b);

        let (baseline_distance, baseline_scale) = match self.phase {
            // Re-baseline on every transition into Zooming
            Phase::Zooming => match self.zoom_baseline {
                Some(baseline) => baseline,
                None => {
                    self.zoom_baseline = Some((distance, self.transform.scale));
                    return;
                }
            },
            _ => {
                self.phase = Phase::Zooming;
                self.zoom_baseline = Some((distance, self.transform.scale));
                tracing::trace!(distance, "pinch started");
                return;
            }
        };

        let ratio = if baseline_distance > f32::EPSILON {
            distance / baseline_distance
        } else {
            f32::INFINITY
        };

        let candidate = baseline_scale * ratio;
        if candidate.is_nan() {
            return;
        }
        self.transform.scale = candidate.clamp(MIN_SCALE, MAX_SCALE);
    }

    fn end_gesture(&mut self) {
        self.phase = Phase::Idle;
        self.gesture_origin = None;
        // Zoom baseline is dropped unconditionally on release
        self.zoom_baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::platform::{MobileGestureConfig, WebGestureConfig};

    fn web_engine() -> GestureTransformEngine {
        GestureTransformEngine::new(Box::new(WebGestureConfig))
    }

    #[test]
    fn test_identity_by_default() {
        let engine = web_engine();
        assert_eq!(engine.transform(), Transform::default());
    }

    #[test]
    fn test_dead_zone_suppresses_tiny_moves() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(100.0, 100.0)]);
        engine.update(&[TouchPoint::new(101.5, 100.5)]);
        assert_eq!(engine.transform().translate_x, 0.0);
        assert_eq!(engine.transform().translate_y, 0.0);
    }

    #[test]
    fn test_single_finger_pan() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(100.0, 100.0)]);
        engine.update(&[TouchPoint::new(130.0, 80.0)]);
        let t = engine.transform();
        assert_eq!(t.translate_x, 30.0);
        assert_eq!(t.translate_y, -20.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_pan_sensitivity_is_platform_specific() {
        let mut engine = GestureTransformEngine::new(Box::new(MobileGestureConfig));
        engine.update(&[TouchPoint::new(0.0, 0.0)]);
        engine.update(&[TouchPoint::new(10.0, 0.0)]);
        assert_eq!(engine.transform().translate_x, 15.0);
    }

    #[test]
    fn test_pinch_doubles_scale() {
        let mut engine = web_engine();
        // Baseline distance 100px, spread to 200px
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(200.0, 0.0)]);
        assert_eq!(engine.transform().scale, 2.0);
    }

    #[test]
    fn test_scale_clamped_at_extremes() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(10_000.0, 0.0)]);
        assert_eq!(engine.transform().scale, MAX_SCALE);

        engine.release();
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(0.0, 0.0)]);
        assert_eq!(engine.transform().scale, MIN_SCALE);
    }

    #[test]
    fn test_zero_baseline_distance_clamps() {
        let mut engine = web_engine();
        // Both contacts at the same point: infinite ratio on spread
        engine.update(&[TouchPoint::new(50.0, 50.0), TouchPoint::new(50.0, 50.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        assert_eq!(engine.transform().scale, MAX_SCALE);
    }

    #[test]
    fn test_second_finger_rebaselines_zoom() {
        let mut engine = web_engine();
        // Pan first
        engine.update(&[TouchPoint::new(0.0, 0.0)]);
        engine.update(&[TouchPoint::new(50.0, 0.0)]);
        // Second finger lands; first pinch frame only records the baseline
        engine.update(&[TouchPoint::new(50.0, 0.0), TouchPoint::new(150.0, 0.0)]);
        assert_eq!(engine.transform().scale, 1.0);
        assert!(engine.is_zooming());
        // Scale moves relative to the new baseline, no jump
        engine.update(&[TouchPoint::new(50.0, 0.0), TouchPoint::new(200.0, 0.0)]);
        assert_eq!(engine.transform().scale, 1.5);
    }

    #[test]
    fn test_release_clears_zoom_flag() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        assert!(engine.is_zooming());
        engine.release();
        assert!(!engine.is_zooming());

        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.force_cancel();
        assert!(!engine.is_zooming());
    }

    #[test]
    fn test_pan_scaled_by_current_zoom() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(200.0, 0.0)]);
        engine.release();

        // At 2x zoom a 40px drag moves the map 20 map-units
        engine.update(&[TouchPoint::new(0.0, 0.0)]);
        engine.update(&[TouchPoint::new(40.0, 0.0)]);
        assert_eq!(engine.transform().translate_x, 20.0);
    }

    #[test]
    fn test_placement_projection_follows_pan_and_zoom() {
        let mut engine = web_engine();
        // Zoom to 2x, then drag 40px right (20 hall units at 2x)
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(100.0, 0.0)]);
        engine.update(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(200.0, 0.0)]);
        engine.release();
        engine.update(&[TouchPoint::new(0.0, 0.0)]);
        engine.update(&[TouchPoint::new(40.0, 0.0)]);

        let placement = TablePlacement {
            table_id: "t1".to_string(),
            x: 10.0,
            y: 5.0,
            width: 30.0,
            height: 20.0,
        };
        let projected = engine.transform().project_placement(&placement);
        assert_eq!(projected.table_id, "t1");
        assert_eq!(projected.x, 60.0);
        assert_eq!(projected.y, 10.0);
        assert_eq!(projected.width, 60.0);
        assert_eq!(projected.height, 40.0);
    }

    #[test]
    fn test_reset_returns_to_identity() {
        let mut engine = web_engine();
        engine.update(&[TouchPoint::new(0.0, 0.0)]);
        engine.update(&[TouchPoint::new(40.0, 10.0)]);
        engine.reset();
        assert_eq!(engine.transform(), Transform::default());
    }
}
