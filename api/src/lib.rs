//! HTTP data access for the rota task collection.
//!
//! # Architecture
//!
//! [`TaskApi`] translates the four logical collection operations into HTTP
//! requests against a fixed base address and decodes the JSON bodies:
//!
//! | Operation | Method | Path | Request body |
//! |-----------|--------|------------|------------------------|
//! | list | GET | `/` | — |
//! | create | POST | `/` | `{title, completed}` |
//! | update | PUT | `/{id}` | `{title, completed}` |
//! | delete | DELETE | `/{id}` | — |
//!
//! # Error Handling
//!
//! Failures are not classified: transport errors and non-success statuses both
//! propagate as `anyhow::Error` to the caller. There are no retries, timeouts,
//! or backoff — each operation is exactly one round trip.

use anyhow::{Result, anyhow, ensure};
use url::Url;

use rota_types::{Task, TaskId};

/// Client for a single remote task collection.
///
/// Holds one `reqwest::Client`; construct once and share by reference.
#[derive(Debug, Clone)]
pub struct TaskApi {
    client: reqwest::Client,
    base: Url,
}

/// POST body for creation. New tasks always start incomplete.
#[derive(Debug, serde::Serialize)]
struct NewTask<'a> {
    title: &'a str,
    completed: bool,
}

/// PUT body for a full-replace update.
#[derive(Debug, serde::Serialize)]
struct TaskPatch<'a> {
    title: &'a str,
    completed: bool,
}

impl TaskApi {
    /// Creates a client for the collection at `base`.
    ///
    /// Fails for URLs that cannot address collection elements (`data:` and
    /// friends).
    pub fn new(base: Url) -> Result<Self> {
        ensure!(
            base.path_segments().is_some(),
            "collection URL cannot address elements: {base}"
        );
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Reads the entire collection. No pagination, no filtering.
    pub async fn fetch_all(&self) -> Result<Vec<Task>> {
        tracing::debug!(url = %self.base, "GET collection");
        let tasks = self
            .client
            .get(self.base.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Task>>()
            .await?;
        Ok(tasks)
    }

    /// Creates a task; the returned record carries the server-assigned id.
    pub async fn create(&self, title: &str) -> Result<Task> {
        tracing::debug!(url = %self.base, title, "POST collection");
        let task = self
            .client
            .post(self.base.clone())
            .json(&NewTask {
                title,
                completed: false,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<Task>()
            .await?;
        Ok(task)
    }

    /// Full-replace update of the element addressed by `id`; returns the
    /// server's updated record.
    pub async fn update(&self, id: TaskId, title: &str, completed: bool) -> Result<Task> {
        let url = self.element_url(id)?;
        tracing::debug!(%url, completed, "PUT element");
        let task = self
            .client
            .put(url)
            .json(&TaskPatch { title, completed })
            .send()
            .await?
            .error_for_status()?
            .json::<Task>()
            .await?;
        Ok(task)
    }

    /// Deletes the element addressed by `id`. The response body is ignored.
    pub async fn remove(&self, id: TaskId) -> Result<()> {
        let url = self.element_url(id)?;
        tracing::debug!(%url, "DELETE element");
        self.client
            .delete(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn element_url(&self, id: TaskId) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("collection URL cannot address elements"))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}
