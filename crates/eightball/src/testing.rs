//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::display::{CardLink, ProjectCard, Renderer};
use crate::error::{Error, Result};
use crate::project::{NewProject, Project};
use crate::store::ProjectStore;

/// A project created on day `day` of March 2025.
pub fn project_at(title: &str, day: u32) -> Project {
    Project {
        title: title.to_string(),
        author_name: "Student".to_string(),
        link: None,
        screenshot_url: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
    }
}

/// A recorded upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub path: String,
    pub size: usize,
    pub content_type: String,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct FakeStore {
    projects: Vec<Project>,
    fail_reads: bool,
    fail_uploads: bool,
    fail_inserts: bool,
    pub uploads: Mutex<Vec<Upload>>,
    pub inserts: Mutex<Vec<NewProject>>,
}

impl FakeStore {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn inserted(&self) -> Vec<NewProject> {
        self.inserts.lock().unwrap().clone()
    }
}

fn unavailable() -> Error {
    Error::Store {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl ProjectStore for FakeStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        Ok(self.projects.clone())
    }

    async fn insert_project(&self, row: &NewProject) -> Result<Project> {
        if self.fail_inserts {
            return Err(unavailable());
        }
        self.inserts.lock().unwrap().push(row.clone());
        Ok(Project {
            title: row.title.clone(),
            author_name: row.student_name.clone(),
            link: row.link.clone(),
            screenshot_url: row.screenshot_url.clone(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        })
    }

    async fn upload_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        if self.fail_uploads {
            return Err(unavailable());
        }
        self.uploads.lock().unwrap().push(Upload {
            path: path.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        Ok(format!("https://store.test/public/{path}"))
    }
}

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Loading(bool),
    Banner(String),
    Visible(bool),
    Shaking(bool),
    Card(ProjectCard),
    OpenLink(String),
}

/// Renderer that records every call and tracks what is on screen.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub loading: bool,
    pub banner: Option<String>,
    pub visible: bool,
    pub shaking: bool,
    pub card: Option<ProjectCard>,
}

impl RecordingRenderer {
    /// Title of the card, if the surface is visible.
    pub fn visible_title(&self) -> Option<&str> {
        if self.visible {
            self.card.as_ref().map(|c| c.title.as_str())
        } else {
            None
        }
    }

    pub fn count(&self, matches: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|c| matches(c)).count()
    }

    pub fn opened_links(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::OpenLink(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.calls.push(RenderCall::Loading(loading));
    }

    fn show_banner(&mut self, message: &str) {
        self.banner = Some(message.to_string());
        self.calls.push(RenderCall::Banner(message.to_string()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.calls.push(RenderCall::Visible(visible));
    }

    fn set_shaking(&mut self, shaking: bool) {
        self.shaking = shaking;
        self.calls.push(RenderCall::Shaking(shaking));
    }

    fn show_card(&mut self, card: &ProjectCard) {
        self.card = Some(card.clone());
        self.calls.push(RenderCall::Card(card.clone()));
    }

    fn open_link(&mut self, link: &CardLink) -> Result<()> {
        self.calls.push(RenderCall::OpenLink(link.href.clone()));
        Ok(())
    }
}
