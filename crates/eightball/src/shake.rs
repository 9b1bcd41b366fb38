//! The shake gesture that precedes every rotation.

use std::time::Duration;

use crate::timeline::{Timeline, TimerEvent};

/// Where the gesture is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShakeState {
    /// Ready for a new gesture.
    #[default]
    Idle,
    /// Shaking; new gestures are ignored.
    Shaking,
}

/// Idle → Shaking → Idle gesture with a fixed duration.
#[derive(Debug)]
pub struct ShakeGesture {
    state: ShakeState,
    duration: Duration,
}

impl ShakeGesture {
    /// Create an idle gesture lasting `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            state: ShakeState::Idle,
            duration,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ShakeState {
        self.state
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.state == ShakeState::Shaking
    }

    /// Start shaking and schedule the finish. Returns `false` (and does
    /// nothing) if already shaking.
    pub fn begin(&mut self, timeline: &mut Timeline) -> bool {
        if self.is_shaking() {
            return false;
        }
        self.state = ShakeState::Shaking;
        timeline.schedule(self.duration, TimerEvent::ShakeFinished);
        true
    }

    /// Return to idle. Returns `false` if there was nothing to finish.
    pub fn finish(&mut self) -> bool {
        if !self.is_shaking() {
            return false;
        }
        self.state = ShakeState::Idle;
        true
    }
}
