//! Two-phase card transition.
//!
//! `begin` hides the card and waits out the fade; `on_fade_out` hands back the
//! index whose content should now be swapped in and waits a short settle
//! delay; `on_fade_in` says the card may be shown again. A sequence cannot be
//! cancelled once begun.

use std::time::Duration;

use crate::timeline::{Timeline, TimerEvent};

/// Where a card transition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePhase {
    /// No transition in flight.
    #[default]
    Idle,
    /// Fading out; `index` is the project to show next.
    FadingOut {
        /// Project index to swap in.
        index: usize,
    },
    /// Content swapped; waiting to fade back in.
    Settling,
}

/// Drives a card change through fade-out, swap and fade-in.
#[derive(Debug)]
pub struct FadeSequence {
    phase: FadePhase,
    fade_out: Duration,
    settle: Duration,
}

impl FadeSequence {
    /// Create an idle sequence with the given delays.
    #[must_use]
    pub fn new(fade_out: Duration, settle: Duration) -> Self {
        Self {
            phase: FadePhase::Idle,
            fade_out,
            settle,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.phase != FadePhase::Idle
    }

    /// Start fading out towards `index`.
    pub fn begin(&mut self, index: usize, timeline: &mut Timeline) {
        self.phase = FadePhase::FadingOut { index };
        timeline.schedule(self.fade_out, TimerEvent::FadeOutFinished);
    }

    /// The fade-out elapsed. Returns the index to swap in and schedules the
    /// fade-in, or `None` if no fade-out was running.
    pub fn on_fade_out(&mut self, timeline: &mut Timeline) -> Option<usize> {
        let FadePhase::FadingOut { index } = self.phase else {
            return None;
        };
        self.phase = FadePhase::Settling;
        timeline.schedule(self.settle, TimerEvent::FadeInFinished);
        Some(index)
    }

    /// The settle delay elapsed. Returns `true` if the card should now be
    /// shown.
    pub fn on_fade_in(&mut self) -> bool {
        if self.phase != FadePhase::Settling {
            return false;
        }
        self.phase = FadePhase::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> FadeSequence {
        FadeSequence::new(Duration::from_millis(500), Duration::from_millis(50))
    }

    #[test]
    fn test_full_sequence() {
        let mut timeline = Timeline::new();
        let mut fade = sequence();

        fade.begin(2, &mut timeline);
        assert_eq!(fade.phase(), FadePhase::FadingOut { index: 2 });
        assert!(fade.in_flight());

        let (_, event) = timeline.pop_due(Duration::from_millis(500)).unwrap();
        assert_eq!(event, TimerEvent::FadeOutFinished);
        assert_eq!(fade.on_fade_out(&mut timeline), Some(2));
        assert_eq!(fade.phase(), FadePhase::Settling);

        assert!(timeline.pop_due(Duration::from_millis(549)).is_none());
        let (_, event) = timeline.pop_due(Duration::from_millis(550)).unwrap();
        assert_eq!(event, TimerEvent::FadeInFinished);
        assert!(fade.on_fade_in());
        assert!(!fade.in_flight());
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let mut timeline = Timeline::new();
        let mut fade = sequence();

        assert_eq!(fade.on_fade_out(&mut timeline), None);
        assert!(!fade.on_fade_in());

        fade.begin(0, &mut timeline);
        assert!(!fade.on_fade_in());
        assert_eq!(fade.phase(), FadePhase::FadingOut { index: 0 });
    }
}
