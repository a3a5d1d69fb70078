//! HTTP client for the publish collaborator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::error::PublishError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Which collaborator endpoint a document goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// `POST /publish/page`
    Page,
    /// `POST /publish/post`
    Post,
}

impl DocumentKind {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Page => "/publish/page",
            Self::Post => "/publish/post",
        }
    }
}

/// Document payload for a publish call.
#[derive(Clone, Debug, Serialize)]
pub struct PublishRequest {
    /// URL-safe identifier; the collaborator derives the filename from it.
    pub slug: String,
    /// Complete HTML document.
    pub html: String,
    /// Display title, echoed in collaborator logs.
    pub title: String,
}

/// Successful publish result from the collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Location of the persisted document.
    pub url: String,
    /// Filename the collaborator wrote.
    pub filename: String,
}

/// Payload for a full rebuild.
#[derive(Clone, Debug, Serialize)]
pub struct RebuildRequest {
    /// Page collection, as exported.
    pub pages: serde_json::Value,
    /// Post collection, as exported.
    pub posts: serde_json::Value,
    /// Settings record, as exported.
    pub settings: serde_json::Value,
    /// Menu collection, as exported.
    pub menus: serde_json::Value,
}

/// Per-collection counts from a full rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RebuildSummary {
    /// Pages written.
    #[serde(default)]
    pub pages: u64,
    /// Posts written.
    #[serde(default)]
    pub posts: u64,
}

/// Result of [`PublishClient::publish_or_fallback`].
///
/// When the collaborator is unavailable the document is still delivered as a
/// local artifact: `published` is false and `html`/`filename` carry the
/// payload for direct download or disk export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Whether the collaborator persisted the document.
    pub published: bool,
    /// Location returned by the collaborator, when published.
    pub url: Option<String>,
    /// Target filename (collaborator-reported or derived from the slug).
    pub filename: String,
    /// The document itself, for the local fallback path.
    pub html: String,
}

#[derive(Deserialize)]
struct PublishResponse {
    success: bool,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct RebuildResponse {
    success: bool,
    #[serde(default)]
    results: RebuildSummary,
    #[serde(default)]
    error: Option<String>,
}

/// Releases the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Client for the publish collaborator.
pub struct PublishClient {
    agent: Agent,
    base_url: String,
    in_flight: AtomicBool,
}

impl PublishClient {
    /// Create a client with the default timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a client with an explicit global timeout.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Check collaborator health. Any outcome other than a 200 response,
    /// including a network failure or timeout, means unavailable.
    pub fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.agent.get(&url).call() {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                tracing::debug!(error = %e, "Publish collaborator health check failed");
                false
            }
        }
    }

    /// Publish one page document.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::AlreadyInProgress`] when another publish is in
    /// flight on this client.
    pub fn publish_page(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        let _guard = self.acquire()?;
        self.publish_inner(DocumentKind::Page, request)
    }

    /// Publish one post document.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::AlreadyInProgress`] when another publish is in
    /// flight on this client.
    pub fn publish_post(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        let _guard = self.acquire()?;
        self.publish_inner(DocumentKind::Post, request)
    }

    /// Publish with the designed fallback: when the health check fails, or
    /// the collaborator stops responding mid-call, the document is returned
    /// as a local artifact instead of a hard failure.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::AlreadyInProgress`] when another publish is in
    /// flight; collaborator-side rejections are also surfaced.
    pub fn publish_or_fallback(
        &self,
        kind: DocumentKind,
        request: &PublishRequest,
    ) -> Result<PublishOutcome, PublishError> {
        let _guard = self.acquire()?;

        if !self.health() {
            tracing::warn!(slug = %request.slug, "Collaborator unavailable, delivering local artifact");
            return Ok(Self::local_artifact(request));
        }

        match self.publish_inner(kind, request) {
            Ok(receipt) => Ok(PublishOutcome {
                published: true,
                url: Some(receipt.url),
                filename: receipt.filename,
                html: request.html.clone(),
            }),
            // Transport failure after a passing health check still falls
            // back; the collaborator went away mid-operation.
            Err(PublishError::Http(e)) => {
                tracing::warn!(slug = %request.slug, error = %e, "Collaborator stopped responding, delivering local artifact");
                Ok(Self::local_artifact(request))
            }
            Err(e) => Err(e),
        }
    }

    /// Rebuild every document from the supplied collections.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::AlreadyInProgress`] when another publish is in
    /// flight on this client.
    pub fn rebuild_all(&self, request: &RebuildRequest) -> Result<RebuildSummary, PublishError> {
        let _guard = self.acquire()?;

        let url = format!("{}/rebuild-all", self.base_url);
        let body: RebuildResponse = self.post_json(&url, request)?;

        if !body.success {
            return Err(PublishError::Rejected(
                body.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }
        Ok(body.results)
    }

    fn publish_inner(
        &self,
        kind: DocumentKind,
        request: &PublishRequest,
    ) -> Result<PublishReceipt, PublishError> {
        let url = format!("{}{}", self.base_url, kind.endpoint());
        tracing::info!(slug = %request.slug, endpoint = kind.endpoint(), "Publishing document");

        let body: PublishResponse = self.post_json(&url, request)?;

        if !body.success {
            return Err(PublishError::Rejected(
                body.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }
        Ok(PublishReceipt {
            url: body.url.unwrap_or_default(),
            filename: body
                .filename
                .unwrap_or_else(|| format!("{}.html", request.slug)),
        })
    }

    fn post_json<Req: Serialize, Resp: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        request: &Req,
    ) -> Result<Resp, PublishError> {
        let payload = serde_json::to_vec(request)?;

        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(PublishError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>, PublishError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PublishError::AlreadyInProgress);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    fn local_artifact(request: &PublishRequest) -> PublishOutcome {
        PublishOutcome {
            published: false,
            url: None,
            filename: format!("{}.html", request.slug),
            html: request.html.clone(),
        }
    }
}
