//! Virtual-time timer queue.
//!
//! Every delayed step in the kiosk (auto-rotate ticks, the shake gesture,
//! both fade phases) is a one-shot [`TimerEvent`] scheduled here. The
//! timeline never looks at a clock: the runtime feeds it wall-clock time,
//! tests feed it whatever they like.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Something that happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// The auto-rotate interval elapsed.
    AutoRotate,
    /// The shake gesture finished.
    ShakeFinished,
    /// The card finished fading out; swap its content.
    FadeOutFinished,
    /// The settle delay elapsed; fade the card back in.
    FadeInFinished,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A queue of pending timers ordered by deadline, then by scheduling order.
#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), TimerEvent>,
    deadlines: HashMap<TimerId, Duration>,
}

impl Timeline {
    /// Create an empty timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, measured from the timeline's start.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = self.now + delay;
        self.pending.insert((deadline, id), event);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending timers carrying `event`.
    #[must_use]
    pub fn count_of(&self, event: TimerEvent) -> usize {
        self.pending.values().filter(|e| **e == event).count()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerEvent)> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }

        let event = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((id, event))
    }

    /// Move the clock forward to `to`. The clock never runs backwards.
    pub fn advance_to(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_timeline_is_empty() {
        let timeline = Timeline::new();
        assert_eq!(timeline.now(), Duration::ZERO);
        assert_eq!(timeline.pending_count(), 0);
        assert!(timeline.next_deadline().is_none());
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(500), TimerEvent::FadeOutFinished);
        timeline.schedule(ms(100), TimerEvent::ShakeFinished);

        assert_eq!(timeline.next_deadline(), Some(ms(100)));
        let (_, first) = timeline.pop_due(ms(1000)).unwrap();
        assert_eq!(first, TimerEvent::ShakeFinished);
        assert_eq!(timeline.now(), ms(100));

        let (_, second) = timeline.pop_due(ms(1000)).unwrap();
        assert_eq!(second, TimerEvent::FadeOutFinished);
        assert_eq!(timeline.now(), ms(500));
        assert!(timeline.pop_due(ms(1000)).is_none());
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(50), TimerEvent::FadeInFinished);
        timeline.schedule(ms(50), TimerEvent::AutoRotate);

        assert_eq!(timeline.pop_due(ms(50)).unwrap().1, TimerEvent::FadeInFinished);
        assert_eq!(timeline.pop_due(ms(50)).unwrap().1, TimerEvent::AutoRotate);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(800), TimerEvent::ShakeFinished);
        assert!(timeline.pop_due(ms(799)).is_none());
        assert_eq!(timeline.pending_count(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timeline = Timeline::new();
        let id = timeline.schedule(ms(10), TimerEvent::AutoRotate);
        assert!(timeline.is_pending(id));

        assert!(timeline.cancel(id));
        assert!(!timeline.is_pending(id));
        assert!(!timeline.cancel(id));
        assert!(timeline.pop_due(ms(100)).is_none());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut timeline = Timeline::new();
        let id = timeline.schedule(ms(10), TimerEvent::AutoRotate);
        timeline.pop_due(ms(10)).unwrap();
        assert!(!timeline.cancel(id));
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut timeline = Timeline::new();
        timeline.advance_to(ms(1000));
        timeline.schedule(ms(500), TimerEvent::FadeOutFinished);
        assert_eq!(timeline.next_deadline(), Some(ms(1500)));
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut timeline = Timeline::new();
        timeline.advance_to(ms(300));
        timeline.advance_to(ms(100));
        assert_eq!(timeline.now(), ms(300));
    }

    #[test]
    fn test_count_of() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(1), TimerEvent::AutoRotate);
        timeline.schedule(ms(2), TimerEvent::AutoRotate);
        timeline.schedule(ms(3), TimerEvent::ShakeFinished);
        assert_eq!(timeline.count_of(TimerEvent::AutoRotate), 2);
        assert_eq!(timeline.count_of(TimerEvent::FadeInFinished), 0);
    }
}
