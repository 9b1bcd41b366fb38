//! Plain terminal renderer.
//!
//! Prints each card as a framed block once it fades in. Links are handed to
//! the platform opener (`xdg-open`, `open` or `start`).

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use super::{CardLink, ProjectCard, Renderer};
use crate::error::{Error, Result};

const RULE_WIDTH: usize = 48;

/// Launches a URL outside the terminal.
pub type Launcher = fn(&str) -> io::Result<()>;

/// Renders cards as text on any writer.
pub struct TerminalRenderer<W: Write> {
    out: W,
    card: Option<ProjectCard>,
    visible: bool,
    launcher: Launcher,
}

impl<W: Write> std::fmt::Debug for TerminalRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("card", &self.card)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl TerminalRenderer<io::Stdout> {
    /// Render to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render to `out`, opening links with the platform opener.
    pub fn new(out: W) -> Self {
        Self::with_launcher(out, open_in_browser)
    }

    /// Render to `out`, opening links with `launcher`.
    pub fn with_launcher(out: W, launcher: Launcher) -> Self {
        Self {
            out,
            card: None,
            visible: false,
            launcher,
        }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "terminal write failed");
        }
    }

    fn draw_card(&mut self) {
        let Some(card) = self.card.clone() else {
            return;
        };

        let rule = "─".repeat(RULE_WIDTH);
        let mut block = vec![
            rule.clone(),
            format!("  {}", card.title),
            format!("  {}", card.byline),
        ];
        if let Some(shot) = &card.screenshot {
            block.push(format!("  [screenshot] {}", shot.src));
        }
        if let Some(link) = &card.link {
            block.push(format!("  {} → {}  (o to open)", link.label, link.href));
        }
        block.push(rule);

        self.emit(&block.join("\n"));
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.emit("Loading projects...");
        }
    }

    fn show_banner(&mut self, message: &str) {
        self.emit(&format!("! {message}"));
    }

    fn set_visible(&mut self, visible: bool) {
        let was_visible = self.visible;
        self.visible = visible;
        if visible && !was_visible {
            self.draw_card();
        }
    }

    fn set_shaking(&mut self, shaking: bool) {
        if shaking {
            self.emit("  ~ shaking the eight ball ~");
        }
    }

    fn show_card(&mut self, card: &ProjectCard) {
        self.card = Some(card.clone());
        if self.visible {
            self.draw_card();
        }
    }

    fn open_link(&mut self, link: &CardLink) -> Result<()> {
        debug!(url = %link.href, "opening link");
        (self.launcher)(&link.href).map_err(|source| Error::LinkOpen {
            url: link.href.clone(),
            source,
        })
    }
}

fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(url);
        command
    }

    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(url);
        command
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}

/// Open `url` with the platform's default handler without waiting for it.
///
/// # Errors
///
/// Returns an error if the opener could not be spawned.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    spawn_reaped(opener_command(url)).map(|_| ())
}

/// Spawn `command` with null stdio and reap it from a background thread so
/// finished openers do not linger as zombies.
fn spawn_reaped(mut command: Command) -> io::Result<thread::JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name("eightball-opener".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => debug!(%status, "link opener exited"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to wait for link opener"),
        })
}
