//! Fixed storage keys for the persisted collections.
//!
//! Each key names one JSON-serialized collection. The strings are part of the
//! on-disk contract and must not change without a migration.

/// Site-wide settings record.
pub const SETTINGS: &str = "site_settings";

/// Page collection.
pub const PAGES: &str = "pages";

/// Post collection.
pub const POSTS: &str = "posts";

/// Menu collection (canonical shape: object keyed by menu id).
pub const MENUS: &str = "menus";

/// Media collection.
pub const MEDIA: &str = "media";

/// Service collection.
pub const SERVICES: &str = "services";

/// Project collection.
pub const PROJECTS: &str = "projects";

/// Header/footer style-settings record.
pub const STYLE_SETTINGS: &str = "style_settings";

/// Timestamp of the last data import.
pub const LAST_IMPORT: &str = "last_import";
