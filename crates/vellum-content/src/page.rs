//! Page model and store.
//!
//! A [`Page`] is an ordered list of [`LayoutSection`] blocks plus metadata and
//! a one-way draft → published status. [`PageStore`] provides CRUD over the
//! page collection and orchestrates the publish transition.
//!
//! Section `order` values may carry gaps or collisions (removal does not
//! renumber, duplication inserts `source.order + 1`); rendering resolves both
//! with a stable sort, ties broken by list position.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vellum_store::{KvStore, KvStoreExt, StoreError, keys};

use crate::blocks::{BlockRegistry, BlockType};
use crate::settings::SettingsStore;

/// Publication status. The only transition is `Draft -> Published`;
/// there is no unpublish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

/// One content unit on a page, tagged by block type, holding its own markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSection {
    /// Opaque unique identifier.
    pub id: String,
    /// Template family tag.
    pub block_type: BlockType,
    /// Rendered/editable markup fragment (trusted, admin-authored).
    pub content: String,
    /// Vertical position sort key.
    pub order: u32,
}

/// A CMS-managed document composed of ordered content sections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Opaque unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL-safe identifier; `index` for the home page.
    pub slug: String,
    /// Publication status.
    #[serde(default)]
    pub status: PageStatus,
    /// Ordered content sections.
    #[serde(default, alias = "layout")]
    pub sections: Vec<LayoutSection>,
    /// SEO title; falls back to `title` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    /// SEO description; falls back to empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last save timestamp.
    pub updated_at: DateTime<Utc>,
    /// Set once on publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Sections sorted for display: ascending `order`, ties broken by list
    /// position (stable sort).
    #[must_use]
    pub fn sections_in_order(&self) -> Vec<&LayoutSection> {
        let mut sections: Vec<&LayoutSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }
}

/// Error from page store operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Missing required field, or a slug conflict among published pages.
    #[error("validation error: {0}")]
    Validation(String),

    /// Section creation referenced an unregistered block-type tag.
    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    /// Persistence layer failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// CRUD over the page collection and its ordered section lists.
///
/// Every mutation reads the whole collection, applies the change, and writes
/// the whole collection back (last writer wins).
pub struct PageStore {
    store: Arc<dyn KvStore>,
    registry: BlockRegistry,
}

impl PageStore {
    /// Create a page store over the given persistence port, with the built-in
    /// block templates.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            registry: BlockRegistry::new(),
        }
    }

    /// Create a new draft page with an empty section list and persist it.
    ///
    /// An empty `slug` derives one from the title, defaulting to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] if `title` is empty.
    pub fn create_page(&self, title: &str, slug: &str) -> Result<Page, PageError> {
        if title.trim().is_empty() {
            return Err(PageError::Validation("page title must not be empty".into()));
        }

        let now = Utc::now();
        let slug = if slug.trim().is_empty() {
            let derived = slugify(title);
            if derived.is_empty() {
                "index".to_owned()
            } else {
                derived
            }
        } else {
            slug.trim().to_owned()
        };

        let page = Page {
            id: Uuid::new_v4().to_string(),
            title: title.to_owned(),
            slug,
            status: PageStatus::Draft,
            sections: Vec::new(),
            meta_title: None,
            meta_description: None,
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        let mut pages = self.load();
        pages.push(page.clone());
        self.persist(&pages)?;
        Ok(page)
    }

    /// Fetch a page by id from the full collection.
    pub fn load_page(&self, id: &str) -> Option<Page> {
        self.load().into_iter().find(|p| p.id == id)
    }

    /// Fetch a page by slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<Page> {
        self.load().into_iter().find(|p| p.slug == slug)
    }

    /// All pages in collection order.
    pub fn list_pages(&self) -> Vec<Page> {
        self.load()
    }

    /// Overwrite the stored record for `page`, refreshing `updated_at`.
    /// Pages not yet in the collection are appended.
    pub fn save_page(&self, page: &mut Page) -> Result<(), PageError> {
        page.updated_at = Utc::now();

        let mut pages = self.load();
        match pages.iter_mut().find(|p| p.id == page.id) {
            Some(stored) => *stored = page.clone(),
            None => pages.push(page.clone()),
        }
        self.persist(&pages)?;
        Ok(())
    }

    /// Remove a page from the collection. Returns `Ok(false)` for unknown ids.
    pub fn delete_page(&self, id: &str) -> Result<bool, PageError> {
        let mut pages = self.load();
        let before = pages.len();
        pages.retain(|p| p.id != id);
        if pages.len() == before {
            return Ok(false);
        }
        self.persist(&pages)?;
        Ok(true)
    }

    /// Append a section built from the block template for `tag` and save.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnknownBlockType`] for an unregistered tag.
    pub fn add_section(&self, page: &mut Page, tag: &str) -> Result<LayoutSection, PageError> {
        let Some(block_type) = BlockType::parse(tag) else {
            return Err(PageError::UnknownBlockType(tag.to_owned()));
        };

        let settings = SettingsStore::new(Arc::clone(&self.store)).load();
        let section = LayoutSection {
            id: Uuid::new_v4().to_string(),
            block_type,
            content: self.registry.render(block_type, &settings),
            order: u32::try_from(page.sections.len()).unwrap_or(u32::MAX) + 1,
        };
        page.sections.push(section.clone());

        self.save_page(page)?;
        Ok(section)
    }

    /// Filter out a section and save. Remaining orders are not renumbered;
    /// gaps are tolerated (rendering sorts by `order`).
    pub fn remove_section(&self, page: &mut Page, section_id: &str) -> Result<bool, PageError> {
        let before = page.sections.len();
        page.sections.retain(|s| s.id != section_id);
        if page.sections.len() == before {
            return Ok(false);
        }
        self.save_page(page)?;
        Ok(true)
    }

    /// Replace a section's markup verbatim and save. No structural validation
    /// is performed; section content is trusted admin-authored HTML.
    pub fn update_section_content(
        &self,
        page: &mut Page,
        section_id: &str,
        markup: &str,
    ) -> Result<bool, PageError> {
        let Some(section) = page.sections.iter_mut().find(|s| s.id == section_id) else {
            return Ok(false);
        };
        section.content = markup.to_owned();
        self.save_page(page)?;
        Ok(true)
    }

    /// Clone a section with a fresh id, inserted immediately after the source
    /// with `order = source.order + 1`. Order collisions with following
    /// sections are resolved only by the render-time stable sort.
    pub fn duplicate_section(
        &self,
        page: &mut Page,
        section_id: &str,
    ) -> Result<Option<LayoutSection>, PageError> {
        let Some(pos) = page.sections.iter().position(|s| s.id == section_id) else {
            return Ok(None);
        };

        let mut copy = page.sections[pos].clone();
        copy.id = Uuid::new_v4().to_string();
        copy.order = copy.order.saturating_add(1);
        page.sections.insert(pos + 1, copy.clone());

        self.save_page(page)?;
        Ok(Some(copy))
    }

    /// Reassign `order = position + 1` for each matched section id, in the
    /// given sequence. Unmatched ids are dropped silently.
    pub fn reorder_sections(&self, page: &mut Page, ids: &[&str]) -> Result<(), PageError> {
        let positions: HashMap<&str, u32> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, u32::try_from(i).unwrap_or(u32::MAX) + 1))
            .collect();
        for section in &mut page.sections {
            if let Some(order) = positions.get(section.id.as_str()) {
                section.order = *order;
            }
        }
        self.save_page(page)
    }

    /// Transition the page to published and save. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] when another published page already
    /// holds this slug.
    pub fn publish_page(&self, page: &mut Page) -> Result<(), PageError> {
        let pages = self.load();
        let slug_taken = pages.iter().any(|p| {
            p.id != page.id && p.status == PageStatus::Published && p.slug == page.slug
        });
        if slug_taken {
            return Err(PageError::Validation(format!(
                "slug '{}' already belongs to a published page",
                page.slug
            )));
        }

        page.status = PageStatus::Published;
        page.published_at = Some(Utc::now());
        self.save_page(page)
    }

    fn load(&self) -> Vec<Page> {
        match self.store.get_json::<Vec<Page>>(keys::PAGES) {
            Ok(Some(pages)) => pages,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load page collection, treating as empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, pages: &[Page]) -> Result<(), StoreError> {
        self.store.set_json(keys::PAGES, &pages)
    }
}

/// Derive a URL-safe slug from a title.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_owned()
}
