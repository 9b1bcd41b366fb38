//! `eightball` - A magic eight-ball kiosk for student project showcases
//!
//! This library fetches submitted projects from a hosted store and shows one
//! at a time, picking a different project at random on every shake. It also
//! provides the submission path that uploads a screenshot and inserts the
//! project row.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod kiosk;
pub mod logging;
pub mod project;
pub mod repository;
pub mod rotation;
pub mod runtime;
pub mod shake;
pub mod store;
pub mod submit;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use kiosk::{Input, Kiosk};
pub use logging::init_logging;
pub use project::{NewProject, Project};
pub use repository::ProjectRepository;
pub use store::{ProjectStore, RestStore};
