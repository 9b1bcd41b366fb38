//! Project records as stored in the hosted store.
//!
//! A [`Project`] is read-only once fetched; [`NewProject`] is the insert
//! payload written by a submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted student project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project title.
    pub title: String,

    /// Name of the student who submitted it.
    #[serde(rename = "student_name")]
    pub author_name: String,

    /// External link to the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Public URL of the uploaded screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,

    /// When the store recorded the submission.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// The external link, if one was given and is non-blank.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        non_blank(self.link.as_deref())
    }

    /// The screenshot URL, if one was given and is non-blank.
    #[must_use]
    pub fn screenshot_url(&self) -> Option<&str> {
        non_blank(self.screenshot_url.as_deref())
    }

    /// The author by-line shown under the title.
    #[must_use]
    pub fn byline(&self) -> String {
        format!("by {}", self.author_name)
    }
}

/// A row to insert into the projects table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    /// Name of the student.
    pub student_name: String,
    /// Project title.
    pub title: String,
    /// External link, `null` when absent.
    pub link: Option<String>,
    /// Screenshot URL, `null` when absent.
    pub screenshot_url: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Sort projects newest first. Equal timestamps keep their relative order.
pub fn sort_newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
