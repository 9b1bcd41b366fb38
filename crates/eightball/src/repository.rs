//! Loading the project snapshot.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::project::{sort_newest_first, Project};
use crate::store::ProjectStore;

/// Reads the submitted projects from a [`ProjectStore`].
#[derive(Debug)]
pub struct ProjectRepository<S> {
    store: S,
}

impl<S: ProjectStore> ProjectRepository<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch every project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] wrapping whatever the store reported.
    pub async fn load_all(&self) -> Result<Vec<Project>> {
        let mut projects = self.store.list_projects().await.map_err(|e| {
            warn!(error = %e, "project fetch failed");
            Error::fetch(e)
        })?;
        sort_newest_first(&mut projects);
        info!(count = projects.len(), "loaded project snapshot");
        Ok(projects)
    }

    /// Like [`load_all`](Self::load_all), but an empty store is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyResult`] if there are no projects, or
    /// [`Error::Fetch`] if the read failed.
    pub async fn load_snapshot(&self) -> Result<Vec<Project>> {
        let projects = self.load_all().await?;
        if projects.is_empty() {
            return Err(Error::EmptyResult);
        }
        Ok(projects)
    }
}
