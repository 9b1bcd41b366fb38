//! Project selection and the auto-rotate schedule.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, trace};

use crate::project::Project;
use crate::timeline::{Timeline, TimerEvent, TimerId};

/// The loaded snapshot and which project is on screen.
#[derive(Debug, Clone, Default)]
pub struct RotationState {
    projects: Vec<Project>,
    current_index: Option<usize>,
}

impl RotationState {
    /// Wrap a freshly loaded snapshot. Nothing is selected yet.
    #[must_use]
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            current_index: None,
        }
    }

    /// The snapshot.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Number of projects in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Index of the project currently selected.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The project currently selected.
    #[must_use]
    pub fn current(&self) -> Option<&Project> {
        self.current_index.and_then(|i| self.projects.get(i))
    }

    /// Select `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&Project> {
        if index >= self.projects.len() {
            return None;
        }
        self.current_index = Some(index);
        self.projects.get(index)
    }

    /// Pick the index to show next.
    ///
    /// Returns `None` for an empty snapshot and `Some(0)` for a single
    /// project. Otherwise samples uniformly until the result differs from
    /// the current index.
    pub fn pick_next<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        match self.projects.len() {
            0 => None,
            1 => Some(0),
            len => loop {
                let candidate = rng.gen_range(0..len);
                if Some(candidate) != self.current_index {
                    return Some(candidate);
                }
                trace!(candidate, "re-sampling repeated index");
            },
        }
    }
}

/// Owns the rotation state and the single auto-rotate schedule.
#[derive(Debug)]
pub struct RotationController {
    state: RotationState,
    interval: Duration,
    timer: Option<TimerId>,
}

impl RotationController {
    /// Create a controller with an empty snapshot.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            state: RotationState::default(),
            interval,
            timer: None,
        }
    }

    /// Replace the snapshot.
    pub fn load(&mut self, projects: Vec<Project>) {
        self.state = RotationState::new(projects);
    }

    /// The rotation state.
    #[must_use]
    pub fn state(&self) -> &RotationState {
        &self.state
    }

    /// Mutable access to the rotation state.
    pub fn state_mut(&mut self) -> &mut RotationState {
        &mut self.state
    }

    /// Pick the next index from the current state.
    pub fn pick_next<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        self.state.pick_next(rng)
    }

    /// Auto-rotate interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)start the auto-rotate schedule. Any previous schedule is
    /// cancelled first, so at most one is ever active.
    pub fn start_auto_rotate(&mut self, timeline: &mut Timeline) {
        if let Some(previous) = self.timer.take() {
            timeline.cancel(previous);
        }
        self.timer = Some(timeline.schedule(self.interval, TimerEvent::AutoRotate));
        debug!(interval_ms = self.interval.as_millis(), "auto-rotate armed");
    }

    /// Cancel the auto-rotate schedule. Safe to call when none is active.
    pub fn stop_auto_rotate(&mut self, timeline: &mut Timeline) {
        if let Some(timer) = self.timer.take() {
            timeline.cancel(timer);
            debug!("auto-rotate stopped");
        }
    }

    /// Whether an auto-rotate schedule is active.
    #[must_use]
    pub fn is_auto_rotating(&self) -> bool {
        self.timer.is_some()
    }

    /// Handle a fired auto-rotate timer. Returns `true` if it belonged to
    /// the active schedule, in which case the next tick is already armed.
    pub fn on_tick(&mut self, timeline: &mut Timeline, fired: TimerId) -> bool {
        if self.timer != Some(fired) {
            return false;
        }
        self.timer = Some(timeline.schedule(self.interval, TimerEvent::AutoRotate));
        true
    }
}
