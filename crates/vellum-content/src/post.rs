//! Post model and store.
//!
//! Posts share the page lifecycle (whole-collection overwrite, one-way
//! draft → published) but carry article fields instead of layout sections.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vellum_store::{KvStore, KvStoreExt, StoreError, keys};

use crate::page::{PageError, PageStatus};

/// A blog post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Opaque unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Trusted, admin-authored article markup.
    #[serde(default)]
    pub content: String,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional read-time label (e.g. "4 min read").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    /// Optional featured image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// Publication status.
    #[serde(default)]
    pub status: PageStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last save timestamp.
    pub updated_at: DateTime<Utc>,
    /// Set once on publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// CRUD over the post collection.
pub struct PostStore {
    store: Arc<dyn KvStore>,
}

impl PostStore {
    /// Create a post store over the given persistence port.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Create a new draft post and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] if `title` is empty.
    pub fn create_post(&self, title: &str, slug: &str) -> Result<Post, PageError> {
        if title.trim().is_empty() {
            return Err(PageError::Validation("post title must not be empty".into()));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            title: title.to_owned(),
            slug: slug.trim().to_owned(),
            content: String::new(),
            category: None,
            read_time: None,
            featured_image: None,
            status: PageStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        let mut posts = self.load();
        posts.push(post.clone());
        self.persist(&posts)?;
        Ok(post)
    }

    /// Fetch a post by id.
    pub fn load_post(&self, id: &str) -> Option<Post> {
        self.load().into_iter().find(|p| p.id == id)
    }

    /// All posts in collection order.
    pub fn list_posts(&self) -> Vec<Post> {
        self.load()
    }

    /// Overwrite the stored record for `post`, refreshing `updated_at`.
    pub fn save_post(&self, post: &mut Post) -> Result<(), PageError> {
        post.updated_at = Utc::now();

        let mut posts = self.load();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(stored) => *stored = post.clone(),
            None => posts.push(post.clone()),
        }
        self.persist(&posts)?;
        Ok(())
    }

    /// Remove a post. Returns `Ok(false)` for unknown ids.
    pub fn delete_post(&self, id: &str) -> Result<bool, PageError> {
        let mut posts = self.load();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.persist(&posts)?;
        Ok(true)
    }

    /// Transition the post to published and save. Irreversible.
    pub fn publish_post(&self, post: &mut Post) -> Result<(), PageError> {
        post.status = PageStatus::Published;
        post.published_at = Some(Utc::now());
        self.save_post(post)
    }

    fn load(&self) -> Vec<Post> {
        match self.store.get_json::<Vec<Post>>(keys::POSTS) {
            Ok(Some(posts)) => posts,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load post collection, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, posts: &[Post]) -> Result<(), StoreError> {
        self.store.set_json(keys::POSTS, &posts)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vellum_store::MemoryStore;

    use super::*;

    fn store() -> PostStore {
        PostStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_post_is_draft() {
        let posts = store();

        let post = posts.create_post("Launch day", "launch-day").unwrap();

        assert_eq!(post.status, PageStatus::Draft);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_create_post_empty_title_is_validation_error() {
        let posts = store();

        assert!(matches!(
            posts.create_post(" ", "x"),
            Err(PageError::Validation(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let posts = store();
        let mut post = posts.create_post("Launch day", "launch-day").unwrap();

        post.content = "<p>We shipped.</p>".to_owned();
        post.category = Some("News".to_owned());
        posts.save_post(&mut post).unwrap();

        let stored = posts.load_post(&post.id).unwrap();
        assert_eq!(stored.content, "<p>We shipped.</p>");
        assert_eq!(stored.category.as_deref(), Some("News"));
    }

    #[test]
    fn test_publish_post_sets_timestamp() {
        let posts = store();
        let mut post = posts.create_post("Launch day", "launch-day").unwrap();

        posts.publish_post(&mut post).unwrap();

        assert_eq!(post.status, PageStatus::Published);
        assert!(post.published_at.unwrap() >= post.created_at);
    }

    #[test]
    fn test_delete_post() {
        let posts = store();
        let post = posts.create_post("Launch day", "launch-day").unwrap();

        assert!(posts.delete_post(&post.id).unwrap());
        assert!(!posts.delete_post(&post.id).unwrap());
        assert!(posts.load_post(&post.id).is_none());
    }
}
