//! The eight-ball kiosk.
//!
//! [`Kiosk`] owns every piece of mutable state: the project snapshot, the
//! timeline, the shake gesture, the fade sequence and the renderer. Load
//! results, user input and elapsed time are fed in from outside; nothing in
//! here blocks or reads a clock.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::{MessageConfig, Timings};
use crate::display::{FadeSequence, ProjectCard, Renderer};
use crate::error::{Error, Result};
use crate::project::Project;
use crate::rotation::RotationController;
use crate::shake::ShakeGesture;
use crate::timeline::{Timeline, TimerEvent, TimerId};

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Shake the ball now.
    Shake,
    /// Open the current card's link.
    OpenLink,
    /// Leave the kiosk.
    Quit,
}

impl Input {
    /// Parse a line of terminal input. An empty line shakes.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "shake" => Some(Self::Shake),
            "o" | "open" => Some(Self::OpenLink),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Whether the kiosk should keep running after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    Continue,
    /// Shut down.
    Quit,
}

/// Lifecycle of the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KioskPhase {
    /// Waiting for the project list.
    #[default]
    Loading,
    /// The store holds no projects.
    Empty,
    /// Loading failed.
    Failed,
    /// Cards are rotating.
    Rotating,
}

/// Rotates project cards on a renderer.
#[derive(Debug)]
pub struct Kiosk<R, G> {
    renderer: R,
    rng: G,
    messages: MessageConfig,
    timeline: Timeline,
    rotation: RotationController,
    shake: ShakeGesture,
    fade: FadeSequence,
    phase: KioskPhase,
    card: Option<ProjectCard>,
}

impl<R: Renderer, G: Rng> Kiosk<R, G> {
    /// Create a kiosk waiting for its project list.
    pub fn new(renderer: R, rng: G, timings: Timings, messages: MessageConfig) -> Self {
        Self {
            renderer,
            rng,
            messages,
            timeline: Timeline::new(),
            rotation: RotationController::new(timings.interval),
            shake: ShakeGesture::new(timings.shake),
            fade: FadeSequence::new(timings.fade_out, timings.fade_settle),
            phase: KioskPhase::Loading,
            card: None,
        }
    }

    /// Show the loading indicator.
    pub fn begin_loading(&mut self) {
        self.phase = KioskPhase::Loading;
        self.renderer.set_loading(true);
    }

    /// Accept the result of the initial project fetch.
    ///
    /// A non-empty list shows a first card immediately and starts
    /// auto-rotation. An empty list or an error shows a banner and nothing
    /// else happens.
    pub fn on_loaded(&mut self, loaded: Result<Vec<Project>>) {
        match loaded {
            Ok(projects) if !projects.is_empty() => {
                info!(count = projects.len(), "starting rotation");
                self.renderer.set_loading(false);
                self.rotation.load(projects);
                self.phase = KioskPhase::Rotating;
                self.rotate();
                self.rotation.start_auto_rotate(&mut self.timeline);
            }
            Ok(_) | Err(Error::EmptyResult) => {
                info!("no projects to show");
                self.phase = KioskPhase::Empty;
                self.renderer.show_banner(&self.messages.empty);
                self.renderer.set_loading(false);
            }
            Err(e) => {
                error!(error = %e, "failed to load projects");
                self.phase = KioskPhase::Failed;
                self.renderer.show_banner(&self.messages.fetch_failed);
                self.renderer.set_loading(false);
            }
        }
    }

    /// Handle a user action.
    pub fn handle_input(&mut self, input: Input) -> Flow {
        match input {
            Input::Shake => {
                if self.phase != KioskPhase::Rotating {
                    debug!(phase = ?self.phase, "shake ignored");
                    return Flow::Continue;
                }
                self.trigger();
                // A manual shake pushes the next automatic one a full interval out
                self.rotation.start_auto_rotate(&mut self.timeline);
            }
            Input::OpenLink => self.open_link(),
            Input::Quit => {
                self.shutdown();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Start a shake gesture. Returns `false` if the kiosk is busy shaking
    /// or mid-fade, in which case nothing happens.
    pub fn trigger(&mut self) -> bool {
        if self.is_busy() {
            debug!("shake ignored while animating");
            return false;
        }
        if !self.shake.begin(&mut self.timeline) {
            return false;
        }
        self.renderer.set_shaking(true);
        self.renderer.set_visible(false);
        true
    }

    /// Move time forward to `elapsed` (measured from the kiosk's start),
    /// firing every timer that falls due on the way.
    pub fn advance_to(&mut self, elapsed: Duration) {
        while let Some((id, event)) = self.timeline.pop_due(elapsed) {
            self.on_timer(id, event);
        }
        self.timeline.advance_to(elapsed);
    }

    /// Move time forward by `by`.
    pub fn advance_by(&mut self, by: Duration) {
        let target = self.timeline.now() + by;
        self.advance_to(target);
    }

    /// When the next timer is due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    /// Stop auto-rotation. In-flight fades still finish if time advances.
    pub fn shutdown(&mut self) {
        self.rotation.stop_auto_rotate(&mut self.timeline);
    }

    /// Whether a shake or fade is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.shake.is_shaking() || self.fade.in_flight()
    }

    /// Whether a shake gesture is in flight.
    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.shake.is_shaking()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> KioskPhase {
        self.phase
    }

    /// Index of the selected project.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.rotation.state().current_index()
    }

    /// The selected project.
    #[must_use]
    pub fn current_project(&self) -> Option<&Project> {
        self.rotation.state().current()
    }

    /// Whether the auto-rotate schedule is armed.
    #[must_use]
    pub fn is_auto_rotating(&self) -> bool {
        self.rotation.is_auto_rotating()
    }

    /// The timeline, for inspection.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn on_timer(&mut self, id: TimerId, event: TimerEvent) {
        match event {
            TimerEvent::AutoRotate => {
                if !self.rotation.on_tick(&mut self.timeline, id) {
                    return;
                }
                debug!("auto-rotate tick");
                self.trigger();
            }
            TimerEvent::ShakeFinished => {
                if self.shake.finish() {
                    self.renderer.set_shaking(false);
                    self.rotate();
                }
            }
            TimerEvent::FadeOutFinished => {
                let Some(index) = self.fade.on_fade_out(&mut self.timeline) else {
                    return;
                };
                if let Some(project) = self.rotation.state().projects().get(index) {
                    let card = ProjectCard::from(project);
                    self.renderer.show_card(&card);
                    self.card = Some(card);
                }
            }
            TimerEvent::FadeInFinished => {
                if self.fade.on_fade_in() {
                    self.renderer.set_visible(true);
                }
            }
        }
    }

    fn rotate(&mut self) {
        let Some(index) = self.rotation.pick_next(&mut self.rng) else {
            return;
        };
        self.render(index);
    }

    fn render(&mut self, index: usize) {
        if self.rotation.state_mut().select(index).is_none() {
            warn!(index, "ignoring out-of-range render");
            return;
        }
        debug!(index, "rendering project");
        self.renderer.set_visible(false);
        self.fade.begin(index, &mut self.timeline);
    }

    fn open_link(&mut self) {
        let Some(link) = self.card.as_ref().and_then(|c| c.link.clone()) else {
            debug!("no link on the current card");
            return;
        };
        if let Err(e) = self.renderer.open_link(&link) {
            warn!(error = %e, "could not open project link");
        }
    }
}
