//! Binding the kiosk to real time and terminal input.
//!
//! The loop waits on three things: the kiosk's next timer deadline, the next
//! user input, and Ctrl-C. Whichever comes first, the kiosk is advanced to
//! the current elapsed time before anything else happens, so timers always
//! fire in deadline order relative to input.

use std::future;
use std::io::{self, BufRead};
use std::thread;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::display::Renderer;
use crate::error::Result;
use crate::kiosk::{Flow, Input, Kiosk};
use crate::repository::ProjectRepository;
use crate::store::ProjectStore;

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Load the projects and run the kiosk until quit or Ctrl-C.
///
/// Load failures end up as a banner on the renderer, not as an error here.
///
/// # Errors
///
/// Returns an error only if waiting for Ctrl-C fails.
pub async fn run_kiosk<S, R, G>(
    repository: &ProjectRepository<S>,
    kiosk: &mut Kiosk<R, G>,
    mut inputs: mpsc::Receiver<Input>,
) -> Result<()>
where
    S: ProjectStore,
    R: Renderer,
    G: Rng,
{
    let started = Instant::now();

    kiosk.begin_loading();
    let loaded = repository.load_all().await;
    kiosk.advance_to(started.elapsed());
    kiosk.on_loaded(loaded);

    let mut inputs_open = true;
    loop {
        let deadline = kiosk.next_deadline().map(|d| started + d);
        tokio::select! {
            () = sleep_until(deadline) => {
                kiosk.advance_to(started.elapsed());
            }
            input = inputs.recv(), if inputs_open => {
                kiosk.advance_to(started.elapsed());
                match input {
                    Some(input) => {
                        if kiosk.handle_input(input) == Flow::Quit {
                            info!("quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("input closed; rotating until interrupted");
                        inputs_open = false;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupted");
                break;
            }
        }
    }

    kiosk.shutdown();
    Ok(())
}

/// Forward parsed lines from `reader` to `inputs` until EOF, a read error,
/// or the receiver goes away. Blocks the calling thread.
pub fn forward_inputs<Rd: BufRead>(reader: Rd, inputs: &mpsc::Sender<Input>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };
        let Some(input) = Input::parse(&line) else {
            debug!(line = %line.trim(), "unrecognised input");
            continue;
        };
        if inputs.blocking_send(input).is_err() {
            break;
        }
    }
}

/// Read commands from stdin on a dedicated thread.
///
/// The thread is detached; a pending read never holds up process exit.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_stdin_reader(inputs: mpsc::Sender<Input>) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("eightball-stdin".to_string())
        .spawn(move || forward_inputs(io::stdin().lock(), &inputs))?;
    Ok(handle)
}
