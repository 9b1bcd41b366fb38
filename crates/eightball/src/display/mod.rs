//! Rendering project cards.
//!
//! The kiosk talks to the screen only through the [`Renderer`] trait, so each
//! UI toolkit gets its own implementation. Card content is described by the
//! toolkit-agnostic [`ProjectCard`]; the timing of a card change is handled
//! by [`FadeSequence`].

mod fade;
mod terminal;

use crate::error::Result;
use crate::project::Project;

pub use fade::{FadePhase, FadeSequence};
pub use terminal::{open_in_browser, Launcher, TerminalRenderer};

/// Label shown on the external link.
pub const LINK_LABEL: &str = "View Project";

/// A screenshot attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// Image URL.
    pub src: String,
    /// Alternative text (the project title).
    pub alt: String,
}

/// An external link attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    /// Target URL.
    pub href: String,
    /// Text shown for the link.
    pub label: String,
}

/// Everything shown on a project card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    /// Project title.
    pub title: String,
    /// `by {author}`.
    pub byline: String,
    /// Screenshot, or `None` to leave the region empty.
    pub screenshot: Option<Screenshot>,
    /// External link, or `None` to hide it.
    pub link: Option<CardLink>,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            byline: project.byline(),
            screenshot: project.screenshot_url().map(|src| Screenshot {
                src: src.to_string(),
                alt: project.title.clone(),
            }),
            link: project.link().map(|href| CardLink {
                href: href.to_string(),
                label: LINK_LABEL.to_string(),
            }),
        }
    }
}

/// A surface that can show project cards.
pub trait Renderer {
    /// Show or hide the loading indicator.
    fn set_loading(&mut self, loading: bool);

    /// Show an error or empty-state banner.
    fn show_banner(&mut self, message: &str);

    /// Fade the card surface in (`true`) or out (`false`).
    fn set_visible(&mut self, visible: bool);

    /// Apply or remove the shaking marker.
    fn set_shaking(&mut self, shaking: bool);

    /// Replace the card content. Called while the surface is hidden.
    fn show_card(&mut self, card: &ProjectCard);

    /// Open a card link in a new browser context.
    ///
    /// # Errors
    ///
    /// Returns an error if the link could not be handed off.
    fn open_link(&mut self, link: &CardLink) -> Result<()>;
}
