//! Submitting a new project.
//!
//! A submission optionally uploads a screenshot to the object store, then
//! inserts the project row pointing at the screenshot's public URL. The two
//! steps are not transactional: if the insert fails after a successful
//! upload, the object stays behind.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result, SubmitStage};
use crate::project::{NewProject, Project};
use crate::store::ProjectStore;

/// Folder inside the bucket that holds screenshots.
pub const SCREENSHOT_FOLDER: &str = "screenshots";

/// A screenshot file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotFile {
    /// Original file name, used for the extension.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ScreenshotFile {
    /// Read a screenshot from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// A zero-byte file counts as no screenshot at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Text after the last `.`, or the whole name if there is none.
    #[must_use]
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    /// MIME type guessed from the extension.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self.extension().to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

/// What a student fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The student's name.
    pub student_name: String,
    /// Project title.
    pub title: String,
    /// Optional external link.
    pub link: Option<String>,
    /// Optional screenshot.
    pub screenshot: Option<ScreenshotFile>,
}

impl Submission {
    /// Check that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for a blank name or title.
    pub fn validate(&self) -> Result<()> {
        if self.student_name.trim().is_empty() {
            return Err(Error::MissingField {
                field: "student_name",
            });
        }
        if self.title.trim().is_empty() {
            return Err(Error::MissingField { field: "title" });
        }
        Ok(())
    }
}

fn file_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(_, ext)| ext)
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("Invalid regex pattern"))
}

/// Build the object path for a screenshot:
/// `screenshots/{unix_millis}-{sanitized_title}.{ext}`.
#[must_use]
pub fn screenshot_object_path(title: &str, file_name: &str, now: DateTime<Utc>) -> String {
    let sanitized = unsafe_chars().replace_all(title, "_").to_lowercase();
    format!(
        "{SCREENSHOT_FOLDER}/{}-{sanitized}.{}",
        now.timestamp_millis(),
        file_extension(file_name)
    )
}

/// Submit a project: upload the screenshot if one was given, then insert
/// the row.
///
/// # Errors
///
/// Returns [`Error::MissingField`] before touching the store if a required
/// field is blank, and [`Error::Submit`] naming the failed step otherwise.
#[instrument(skip_all, fields(title = %submission.title))]
pub async fn submit<S>(store: &S, submission: Submission, now: DateTime<Utc>) -> Result<Project>
where
    S: ProjectStore + ?Sized,
{
    submission.validate()?;

    let Submission {
        student_name,
        title,
        link,
        screenshot,
    } = submission;

    let screenshot_url = match screenshot {
        Some(file) if !file.is_empty() => {
            let path = screenshot_object_path(&title, &file.file_name, now);
            let content_type = file.content_type();
            debug!(%path, size = file.bytes.len(), "uploading screenshot");
            store
                .upload_object(&path, file.bytes, content_type)
                .await
                .map_err(|e| Error::submit(SubmitStage::Upload, e))?;
            let url = store
                .public_url(&path)
                .map_err(|e| Error::submit(SubmitStage::Upload, e))?;
            Some(url)
        }
        Some(_) => {
            debug!("empty screenshot, skipping upload");
            None
        }
        None => None,
    };

    let row = NewProject {
        student_name,
        title,
        link: link.filter(|l| !l.trim().is_empty()),
        screenshot_url,
    };

    match store.insert_project(&row).await {
        Ok(project) => {
            info!(screenshot = row.screenshot_url.is_some(), "project submitted");
            Ok(project)
        }
        Err(e) => {
            if let Some(url) = &row.screenshot_url {
                warn!(%url, "insert failed, screenshot left in the bucket");
            }
            Err(Error::submit(SubmitStage::Insert, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::testing::{FakeStore, Upload};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    fn submission(screenshot: Option<ScreenshotFile>) -> Submission {
        Submission {
            student_name: "Ada".to_string(),
            title: "Robot Arm".to_string(),
            link: Some("https://example.com/arm".to_string()),
            screenshot,
        }
    }

    fn png(bytes: &[u8]) -> ScreenshotFile {
        ScreenshotFile {
            file_name: "arm shot.PNG".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_object_path_sanitizes_title() {
        let path = screenshot_object_path("My Cool App!", "shot.final.png", now());
        assert_eq!(path, "screenshots/1700000000123-my_cool_app_.png");
    }

    #[test]
    fn test_object_path_without_dot_uses_whole_name() {
        let path = screenshot_object_path("x", "screenshot", now());
        assert_eq!(path, "screenshots/1700000000123-x.screenshot");
    }

    #[test]
    fn test_object_path_replaces_non_ascii() {
        let path = screenshot_object_path("Café #2", "a.jpg", now());
        assert_eq!(path, "screenshots/1700000000123-caf___2.jpg");
    }

    #[test]
    fn test_object_path_replaces_case_folding_lookalikes() {
        // Kelvin sign and long s fold to `k` and `s` but are not ASCII
        let path = screenshot_object_path("\u{212A}elvin \u{017F}hip", "a.png", now());
        assert_eq!(path, "screenshots/1700000000123-_elvin__hip.png");
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(png(b"x").content_type(), "image/png");
        let jpeg = ScreenshotFile {
            file_name: "a.jpeg".to_string(),
            bytes: vec![1],
        };
        assert_eq!(jpeg.content_type(), "image/jpeg");
        let odd = ScreenshotFile {
            file_name: "notes.txt".to_string(),
            bytes: vec![1],
        };
        assert_eq!(odd.content_type(), "application/octet-stream");
    }

    #[test]
    fn test_read_screenshot_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let file = ScreenshotFile::read(&path).unwrap();
        assert_eq!(file.file_name, "demo.gif");
        assert_eq!(file.bytes, b"GIF89a");
        assert_eq!(file.content_type(), "image/gif");
    }

    #[test]
    fn test_read_missing_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScreenshotFile::read(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_submit_with_screenshot() {
        let store = FakeStore::default();
        let project = submit(&store, submission(Some(png(b"\x89PNG"))), now())
            .await
            .unwrap();

        let uploads = store.uploads.lock().unwrap().clone();
        assert_eq!(
            uploads,
            vec![Upload {
                path: "screenshots/1700000000123-robot_arm.PNG".to_string(),
                size: 4,
                content_type: "image/png".to_string(),
            }]
        );
        assert_eq!(
            project.screenshot_url.as_deref(),
            Some("https://store.test/public/screenshots/1700000000123-robot_arm.PNG")
        );
        assert_eq!(store.inserted()[0].link.as_deref(), Some("https://example.com/arm"));
    }

    #[tokio::test]
    async fn test_submit_without_screenshot() {
        let store = FakeStore::default();
        submit(&store, submission(None), now()).await.unwrap();

        assert_eq!(store.upload_count(), 0);
        assert_eq!(store.inserted()[0].screenshot_url, None);
    }

    #[tokio::test]
    async fn test_empty_screenshot_skips_upload() {
        let store = FakeStore::default();
        submit(&store, submission(Some(png(b""))), now())
            .await
            .unwrap();

        assert_eq!(store.upload_count(), 0);
        let inserted = store.inserted();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].screenshot_url, None);
    }

    #[tokio::test]
    async fn test_blank_link_becomes_null() {
        let store = FakeStore::default();
        let mut form = submission(None);
        form.link = Some("  ".to_string());
        submit(&store, form, now()).await.unwrap();

        assert_eq!(store.inserted()[0].link, None);
    }

    #[tokio::test]
    async fn test_blank_title_rejected_before_store() {
        let store = FakeStore::default();
        let mut form = submission(Some(png(b"x")));
        form.title = String::new();

        let err = submit(&store, form, now()).await.unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "title" }));
        assert_eq!(store.upload_count(), 0);
        assert!(store.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = FakeStore::default();
        let mut form = submission(None);
        form.student_name = " ".to_string();

        let err = submit(&store, form, now()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: "student_name"
            }
        ));
    }

    #[tokio::test]
    async fn test_upload_failure_skips_insert() {
        let store = FakeStore::failing_uploads();
        let err = submit(&store, submission(Some(png(b"x"))), now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Submit {
                stage: SubmitStage::Upload,
                ..
            }
        ));
        assert!(store.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_leaves_upload() {
        let store = FakeStore::failing_inserts();
        let err = submit(&store, submission(Some(png(b"x"))), now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Submit {
                stage: SubmitStage::Insert,
                ..
            }
        ));
        assert!(err.to_string().contains("project insert"));
        assert_eq!(store.upload_count(), 1);
    }
}
