//! HTTP client for the hosted store.
//!
//! Rows live behind a `PostgREST` style endpoint at `/rest/v1/{table}` and
//! screenshots behind `/storage/v1/object/{bucket}/{path}`. Every request
//! carries the anonymous key both as `apikey` and as a bearer token.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::{debug, instrument};

use super::ProjectStore;
use crate::config::StoreEndpoint;
use crate::error::{Error, Result};
use crate::project::{NewProject, Project};

/// Cache lifetime in seconds attached to uploaded screenshots.
const UPLOAD_CACHE_CONTROL: &str = "3600";

/// Store client speaking the hosted store's REST dialect.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    endpoint: StoreEndpoint,
}

impl RestStore {
    /// Create a client for the given endpoint.
    #[must_use]
    pub fn new(endpoint: StoreEndpoint) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &StoreEndpoint {
        &self.endpoint
    }

    fn url_with<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.endpoint.url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::internal(format!("store URL {} cannot be a base", self.endpoint.url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self) -> Result<Url> {
        self.url_with(["rest", "v1", self.endpoint.table.as_str()])
    }

    fn object_url(&self, public: bool, path: &str) -> Result<Url> {
        let prefix: &[&str] = if public {
            &["storage", "v1", "object", "public"]
        } else {
            &["storage", "v1", "object"]
        };
        self.url_with(
            prefix
                .iter()
                .copied()
                .chain(std::iter::once(self.endpoint.bucket.as_str()))
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.endpoint.anon_key)
            .bearer_auth(&self.endpoint.anon_key)
    }
}

/// Turn a non-success response into [`Error::Store`], keeping the body text.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body
    };
    Err(Error::Store {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ProjectStore for RestStore {
    #[instrument(skip(self), fields(table = %self.endpoint.table))]
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.table_url()?;
        let response = self
            .authorized(self.http.get(url))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let projects: Vec<Project> = check(response).await?.json().await?;
        debug!(count = projects.len(), "fetched projects");
        Ok(projects)
    }

    #[instrument(skip(self, row), fields(title = %row.title))]
    async fn insert_project(&self, row: &NewProject) -> Result<Project> {
        let url = self.table_url()?;
        let response = self
            .authorized(self.http.post(url))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        let mut inserted: Vec<Project> = check(response).await?.json().await?;
        if inserted.is_empty() {
            return Err(Error::internal("store returned no rows for insert"));
        }
        debug!("inserted project row");
        Ok(inserted.swap_remove(0))
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_object(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = self.object_url(false, path)?;
        let response = self
            .authorized(self.http.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, UPLOAD_CACHE_CONTROL)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        check(response).await?;
        debug!("uploaded object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        Ok(self.object_url(true, path)?.to_string())
    }
}
