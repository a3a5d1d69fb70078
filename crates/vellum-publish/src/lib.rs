//! Publish collaborator HTTP client.
//!
//! The collaborator is an external process that persists generated HTML to a
//! durable location. This crate implements the client side of its contract:
//!
//! - `GET /health`: reachable means 200; anything else is "unavailable"
//! - `POST /publish/page` and `POST /publish/post` with `{slug, html, title}`
//! - `POST /rebuild-all` with `{pages, posts, settings, menus}`
//!
//! At most one publish operation is in flight per client; a second call fails
//! immediately with [`PublishError::AlreadyInProgress`]. The in-flight flag
//! is reset on every exit path. All calls carry a bounded timeout; a
//! non-responding collaborator is treated as unavailable, and
//! [`PublishClient::publish_or_fallback`] then returns a local artifact
//! instead of a hard failure.

mod client;
mod error;

pub use client::{
    DocumentKind, PublishClient, PublishOutcome, PublishReceipt, PublishRequest, RebuildRequest,
    RebuildSummary,
};
pub use error::PublishError;
