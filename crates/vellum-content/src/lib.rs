//! Content model and typed stores for the Vellum CMS engine.
//!
//! This crate owns the CMS data model (menus, pages, posts, settings) and the
//! stores that persist it through the [`vellum_store::KvStore`] port. Every
//! store commits the whole collection back under its fixed key on each save:
//! last writer wins, no partial patches.
//!
//! # Architecture
//!
//! - [`MenuStore`]: CRUD over named menus and their nested item trees
//! - [`PageStore`]: CRUD over pages and their ordered layout sections,
//!   including the one-way draft → published transition
//! - [`PostStore`]: CRUD over blog posts
//! - [`SettingsStore`]: site-wide settings with seeded defaults
//! - [`BlockRegistry`]: closed block-type registry mapping each tag to its
//!   section template
//! - [`SiteData`]: portable import/export aggregate for the whole data set
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vellum_content::MenuStore;
//! use vellum_store::MemoryStore;
//!
//! let menus = MenuStore::new(Arc::new(MemoryStore::new()));
//! let menu = menus.create_menu("Footer Links", "footer-2")?;
//! ```

mod blocks;
mod menu;
mod page;
mod post;
mod settings;
mod transfer;

pub use blocks::{BlockRegistry, BlockType};
pub use menu::{
    LinkTarget, Menu, MenuError, MenuItem, MenuItemDraft, MenuItemPatch, MenuPatch, MenuStore,
    RESERVED_LOCATIONS,
};
pub use page::{LayoutSection, Page, PageError, PageStatus, PageStore};
pub use post::{Post, PostStore};
pub use settings::{SettingsStore, SiteSettings};
pub use transfer::SiteData;
