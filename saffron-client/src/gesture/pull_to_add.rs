//! Pull-to-add gesture state machine
//!
//! Administrators can pull the menu list down past a threshold and hold
//! to open the "new item" editor. A hold released between 50% and 100%
//! progress refreshes the list instead of doing nothing — deliberate
//! behavior, not a fallback.
//!
//! The machine is driven by the menu screen: scroll offsets via
//! [`PullToAddMachine::on_scroll`], drag deltas via
//! [`PullToAddMachine::on_pull`], releases via
//! [`PullToAddMachine::on_release`] and a repeating 50ms timer via
//! [`PullToAddMachine::on_tick`]. Side effects come back as
//! [`PullEffect`] values; the machine never calls into the view.

/// Pull distance is capped here (px)
pub const MAX_PULL_DISTANCE: f32 = 250.0;

/// Pull distance at which the hold phase starts (px)
pub const PULL_THRESHOLD: f32 = 175.0;

/// Hold timer tick
pub const HOLD_TICK_MS: u64 = 50;

/// Hold length required to complete (ms)
pub const HOLD_DURATION_MS: u64 = 1000;

/// Settle-back animation length after cancel or completion (ms)
pub const SETTLE_DURATION_MS: u64 = 200;

/// Hold progress above which a cancelled hold still refreshes the list
pub const REFRESH_PROGRESS_THRESHOLD: f32 = 0.5;

/// The list counts as "at top" within this scroll offset (px)
pub const TOP_BUFFER: f32 = 4.0;

/// Side effect requested by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullEffect {
    /// Nothing to do
    None,
    /// Partial hold released: refresh the menu list
    Refresh,
    /// Full hold: open the new-item editor
    OpenEditor,
}

/// View-facing snapshot of the gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullState {
    pub is_pulling: bool,
    pub pull_distance: f32,
    pub is_hold_active: bool,
    pub hold_progress: f32,
    pub is_adding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Pulling,
    HoldActive,
    /// Progress animating back to zero after cancel or completion
    Settling,
}

/// Gesture-driven state machine for the admin pull-to-add workflow
#[derive(Debug)]
pub struct PullToAddMachine {
    /// Capability gate; non-admin machines ignore all input
    enabled: bool,
    phase: Phase,
    pull_distance: f32,
    hold_elapsed_ms: u64,
    /// Logical hold timer handle. Only one may be active; clearing twice
    /// is a no-op.
    timer_active: bool,
    settle_from: f32,
    settle_remaining_ms: u64,
    is_adding: bool,
    at_top: bool,
    last_scroll_offset: f32,
}

impl PullToAddMachine {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            phase: Phase::Idle,
            pull_distance: 0.0,
            hold_elapsed_ms: 0,
            timer_active: false,
            settle_from: 0.0,
            settle_remaining_ms: 0,
            is_adding: false,
            at_top: true,
            last_scroll_offset: 0.0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Current hold progress in [0, 1]
    pub fn hold_progress(&self) -> f32 {
        match self.phase {
            Phase::HoldActive => {
                (self.hold_elapsed_ms as f32 / HOLD_DURATION_MS as f32).min(1.0)
            }
            Phase::Settling => {
                self.settle_from * (self.settle_remaining_ms as f32 / SETTLE_DURATION_MS as f32)
            }
            _ => 0.0,
        }
    }

    pub fn snapshot(&self) -> PullState {
        PullState {
            is_pulling: matches!(self.phase, Phase::Pulling | Phase::HoldActive),
            pull_distance: self.pull_distance,
            is_hold_active: self.phase == Phase::HoldActive,
            hold_progress: self.hold_progress(),
            is_adding: self.is_adding,
        }
    }

    /// Scroll offset changed (0 = top of list).
    ///
    /// Scrolling away from the top, or reversing scroll direction while a
    /// hold is active, cancels the hold immediately — even if the pull
    /// distance is still above threshold. This cancel hard-resets the
    /// progress; there is nothing left on screen to animate.
    pub fn on_scroll(&mut self, offset: f32) -> PullEffect {
        if !self.enabled {
            return PullEffect::None;
        }

        let was_at_top = self.at_top;
        let moved_down_list = offset > self.last_scroll_offset + f32::EPSILON;
        self.at_top = offset <= TOP_BUFFER;
        self.last_scroll_offset = offset;

        match self.phase {
            Phase::HoldActive if !self.at_top || moved_down_list => {
                let effect = self.cancel_effect();
                self.reset();
                effect
            }
            Phase::Pulling if !self.at_top && was_at_top => {
                self.reset();
                PullEffect::None
            }
            _ => PullEffect::None,
        }
    }

    /// Downward drag delta from the start of the current gesture (px).
    pub fn on_pull(&mut self, drag_delta: f32) -> PullEffect {
        if !self.enabled || !self.at_top {
            return PullEffect::None;
        }

        match self.phase {
            Phase::Idle if drag_delta > 0.0 => {
                self.phase = Phase::Pulling;
                self.pull_distance = drag_delta.min(MAX_PULL_DISTANCE);
                PullEffect::None
            }
            Phase::Pulling => {
                self.pull_distance = drag_delta.max(0.0).min(MAX_PULL_DISTANCE);
                if self.pull_distance >= PULL_THRESHOLD {
                    self.phase = Phase::HoldActive;
                    self.hold_elapsed_ms = 0;
                    self.start_hold_timer();
                    tracing::debug!(distance = self.pull_distance, "hold started");
                }
                PullEffect::None
            }
            Phase::HoldActive => {
                self.pull_distance = drag_delta.max(0.0).min(MAX_PULL_DISTANCE);
                if self.pull_distance < PULL_THRESHOLD {
                    let effect = self.cancel_effect();
                    self.settle();
                    return effect;
                }
                PullEffect::None
            }
            _ => PullEffect::None,
        }
    }

    /// Advance the hold timer by one tick (50ms) or progress the
    /// settle-back animation.
    pub fn on_tick(&mut self) -> PullEffect {
        match self.phase {
            Phase::HoldActive => {
                if !self.timer_active {
                    return PullEffect::None;
                }
                self.hold_elapsed_ms += HOLD_TICK_MS;
                if self.hold_elapsed_ms >= HOLD_DURATION_MS {
                    self.is_adding = true;
                    self.settle_with_progress(1.0);
                    tracing::debug!("hold completed, opening editor");
                    return PullEffect::OpenEditor;
                }
                PullEffect::None
            }
            Phase::Settling => {
                self.settle_remaining_ms = self.settle_remaining_ms.saturating_sub(HOLD_TICK_MS);
                if self.settle_remaining_ms == 0 {
                    self.reset();
                }
                PullEffect::None
            }
            _ => PullEffect::None,
        }
    }

    /// Gesture released or terminated by a competing recognizer.
    pub fn on_release(&mut self) -> PullEffect {
        match self.phase {
            Phase::HoldActive => {
                let effect = self.cancel_effect();
                self.settle();
                effect
            }
            Phase::Pulling => {
                self.settle();
                PullEffect::None
            }
            _ => PullEffect::None,
        }
    }

    /// Component teardown: drop the timer so no callback fires against a
    /// dead view.
    pub fn teardown(&mut self) {
        self.reset();
    }

    fn cancel_effect(&mut self) -> PullEffect {
        let progress = self.hold_progress();
        self.clear_hold_timer();
        if progress >= REFRESH_PROGRESS_THRESHOLD && progress < 1.0 {
            tracing::debug!(progress, "partial hold released, refreshing");
            PullEffect::Refresh
        } else {
            PullEffect::None
        }
    }

    fn settle(&mut self) {
        let progress = self.hold_progress();
        self.settle_with_progress(progress);
    }

    fn settle_with_progress(&mut self, from: f32) {
        self.clear_hold_timer();
        self.hold_elapsed_ms = 0;
        self.pull_distance = 0.0;
        if from > 0.0 {
            self.phase = Phase::Settling;
            self.settle_from = from;
            self.settle_remaining_ms = SETTLE_DURATION_MS;
        } else {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.clear_hold_timer();
        self.phase = Phase::Idle;
        self.pull_distance = 0.0;
        self.hold_elapsed_ms = 0;
        self.settle_from = 0.0;
        self.settle_remaining_ms = 0;
        self.is_adding = false;
    }

    fn start_hold_timer(&mut self) {
        // The previous timer must already be gone; clearing is idempotent
        // so this is safe even if a transition raced it.
        self.clear_hold_timer();
        self.timer_active = true;
    }

    fn clear_hold_timer(&mut self) {
        self.timer_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_machine() -> PullToAddMachine {
        PullToAddMachine::new(true)
    }

    /// Pull past the threshold and run the hold timer for `ms`.
    fn pull_and_hold(machine: &mut PullToAddMachine, ms: u64) -> PullEffect {
        machine.on_scroll(0.0);
        machine.on_pull(10.0);
        machine.on_pull(180.0);
        assert!(machine.snapshot().is_hold_active);
        for _ in 0..(ms / HOLD_TICK_MS) {
            let effect = machine.on_tick();
            if effect != PullEffect::None {
                return effect;
            }
        }
        PullEffect::None
    }

    #[test]
    fn test_disabled_for_non_admin() {
        let mut machine = PullToAddMachine::new(false);
        machine.on_scroll(0.0);
        assert_eq!(machine.on_pull(200.0), PullEffect::None);
        assert!(!machine.snapshot().is_pulling);
    }

    #[test]
    fn test_pull_distance_capped() {
        let mut machine = admin_machine();
        machine.on_pull(10.0);
        machine.on_pull(400.0);
        assert_eq!(machine.snapshot().pull_distance, MAX_PULL_DISTANCE);
    }

    #[test]
    fn test_pull_ignored_when_not_at_top() {
        let mut machine = admin_machine();
        machine.on_scroll(120.0);
        assert_eq!(machine.on_pull(200.0), PullEffect::None);
        assert!(!machine.snapshot().is_pulling);
    }

    #[test]
    fn test_full_hold_opens_editor() {
        let mut machine = admin_machine();
        let effect = pull_and_hold(&mut machine, 1000);
        assert_eq!(effect, PullEffect::OpenEditor);
        assert!(machine.snapshot().is_adding);

        // Progress settles back to zero
        for _ in 0..(SETTLE_DURATION_MS / HOLD_TICK_MS) {
            machine.on_tick();
        }
        let state = machine.snapshot();
        assert_eq!(state.hold_progress, 0.0);
        assert!(!state.is_adding);
    }

    #[test]
    fn test_partial_hold_release_refreshes() {
        // 180px pull, 600ms hold (progress 0.6), then release
        let mut machine = admin_machine();
        assert_eq!(pull_and_hold(&mut machine, 600), PullEffect::None);
        assert!((machine.snapshot().hold_progress - 0.6).abs() < 1e-6);

        assert_eq!(machine.on_release(), PullEffect::Refresh);
        // Fires exactly once
        assert_eq!(machine.on_release(), PullEffect::None);
        assert_eq!(machine.on_tick(), PullEffect::None);
    }

    #[test]
    fn test_short_hold_release_is_a_no_op() {
        let mut machine = admin_machine();
        assert_eq!(pull_and_hold(&mut machine, 400), PullEffect::None);
        assert_eq!(machine.on_release(), PullEffect::None);
    }

    #[test]
    fn test_scroll_away_cancels_hold() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 200);
        machine.on_scroll(50.0);
        let state = machine.snapshot();
        assert!(!state.is_hold_active);
        assert_eq!(state.hold_progress, 0.0);
    }

    #[test]
    fn test_scroll_reversal_cancels_even_above_threshold() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 200);
        // Still within the top buffer but moving down the list
        machine.on_scroll(2.0);
        assert!(!machine.snapshot().is_hold_active);
    }

    #[test]
    fn test_scroll_away_with_partial_progress_still_refreshes() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 600);
        assert_eq!(machine.on_scroll(50.0), PullEffect::Refresh);
    }

    #[test]
    fn test_dropping_below_threshold_cancels() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 200);
        assert_eq!(machine.on_pull(100.0), PullEffect::None);
        assert!(!machine.snapshot().is_hold_active);
    }

    #[test]
    fn test_settle_animates_progress_down() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 400);
        machine.on_release();

        let mid = machine.snapshot().hold_progress;
        assert!(mid > 0.0 && mid <= 0.4);
        machine.on_tick();
        assert!(machine.snapshot().hold_progress < mid);
    }

    #[test]
    fn test_teardown_clears_timer() {
        let mut machine = admin_machine();
        pull_and_hold(&mut machine, 200);
        machine.teardown();
        // A stray tick after teardown does nothing
        assert_eq!(machine.on_tick(), PullEffect::None);
        assert!(!machine.snapshot().is_hold_active);
    }
}
