//! Remote store access.
//!
//! The [`ProjectStore`] trait is the seam between eightball and the hosted
//! data store. [`RestStore`] talks to the store over HTTP; tests substitute
//! in-memory fakes.

mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::project::{NewProject, Project};

pub use rest::RestStore;

/// A hosted store holding project rows and screenshot objects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch every project row, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Insert one project row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    async fn insert_project(&self, row: &NewProject) -> Result<Project>;

    /// Upload a binary object under `path` in the screenshot bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    async fn upload_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Resolve the public URL of an uploaded object. No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    fn public_url(&self, path: &str) -> Result<String>;
}
