//! Portable import/export of the whole data set.
//!
//! [`SiteData`] is the single JSON document used for round-tripping between
//! the persistence medium and a portable file. Collections the engine does
//! not model structurally (media, services, projects) are carried as opaque
//! JSON values so a round-trip stays byte-faithful to their stored shape.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use vellum_store::{KvStore, KvStoreExt, StoreError, keys};

use crate::menu::Menu;
use crate::page::Page;
use crate::post::Post;
use crate::settings::SiteSettings;

/// The full exported data set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    /// Post collection.
    pub posts: Vec<Post>,
    /// Service collection (opaque).
    pub services: Vec<serde_json::Value>,
    /// Project collection (opaque).
    pub projects: Vec<serde_json::Value>,
    /// Page collection.
    pub pages: Vec<Page>,
    /// Media collection (opaque).
    pub media: Vec<serde_json::Value>,
    /// Menu collection, keyed by menu id.
    pub menus: BTreeMap<String, Menu>,
    /// Site settings record.
    pub settings: SiteSettings,
    /// Header/footer style-settings record (opaque).
    pub style_settings: serde_json::Value,
}

impl SiteData {
    /// Read every collection out of the store.
    ///
    /// Absent collections export as empty; settings fall back to defaults.
    pub fn export(store: &dyn KvStore) -> Result<Self, StoreError> {
        Ok(Self {
            posts: store.get_json(keys::POSTS)?.unwrap_or_default(),
            services: store.get_json(keys::SERVICES)?.unwrap_or_default(),
            projects: store.get_json(keys::PROJECTS)?.unwrap_or_default(),
            pages: store.get_json(keys::PAGES)?.unwrap_or_default(),
            media: store.get_json(keys::MEDIA)?.unwrap_or_default(),
            menus: store.get_json(keys::MENUS)?.unwrap_or_default(),
            settings: store.get_json(keys::SETTINGS)?.unwrap_or_default(),
            style_settings: store.get_json(keys::STYLE_SETTINGS)?.unwrap_or_default(),
        })
    }

    /// Write every collection into the store and stamp the import marker.
    pub fn import(&self, store: &dyn KvStore) -> Result<(), StoreError> {
        store.set_json(keys::POSTS, &self.posts)?;
        store.set_json(keys::SERVICES, &self.services)?;
        store.set_json(keys::PROJECTS, &self.projects)?;
        store.set_json(keys::PAGES, &self.pages)?;
        store.set_json(keys::MEDIA, &self.media)?;
        store.set_json(keys::MENUS, &self.menus)?;
        store.set_json(keys::SETTINGS, &self.settings)?;
        store.set_json(keys::STYLE_SETTINGS, &self.style_settings)?;
        store.set_json(keys::LAST_IMPORT, &Utc::now().to_rfc3339())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vellum_store::MemoryStore;

    use super::*;
    use crate::menu::{MenuItemDraft, MenuStore};
    use crate::page::PageStore;
    use crate::post::PostStore;
    use crate::settings::SettingsStore;

    #[test]
    fn test_export_of_empty_store_is_default() {
        let store = MemoryStore::new();

        let data = SiteData::export(&store).unwrap();

        assert_eq!(data, SiteData::default());
    }

    #[test]
    fn test_round_trip_reproduces_collections() {
        let source = Arc::new(MemoryStore::new());
        let menus = MenuStore::new(Arc::clone(&source) as Arc<dyn KvStore>);
        let pages = PageStore::new(Arc::clone(&source) as Arc<dyn KvStore>);
        let posts = PostStore::new(Arc::clone(&source) as Arc<dyn KvStore>);
        let settings = SettingsStore::new(Arc::clone(&source) as Arc<dyn KvStore>);

        let menu = menus.create_menu("Footer Links", "footer-2").unwrap();
        menus
            .add_menu_item(
                &menu.id,
                MenuItemDraft {
                    label: "Privacy".to_owned(),
                    url: "/privacy".to_owned(),
                    ..MenuItemDraft::default()
                },
            )
            .unwrap();
        let mut page = pages.create_page("Home", "index").unwrap();
        pages.add_section(&mut page, "hero").unwrap();
        posts.create_post("Launch", "launch").unwrap();
        let mut site_settings = settings.load();
        site_settings.site_name = "Acme Co".to_owned();
        settings.save(&site_settings).unwrap();
        source
            .set_json(keys::MEDIA, &vec![json!({"id": "m1", "url": "/img.png"})])
            .unwrap();

        let exported = SiteData::export(source.as_ref()).unwrap();

        let target = MemoryStore::new();
        exported.import(&target).unwrap();
        let reimported = SiteData::export(&target).unwrap();

        assert_eq!(reimported, exported);
    }

    #[test]
    fn test_import_stamps_last_import_marker() {
        let store = MemoryStore::new();

        SiteData::default().import(&store).unwrap();

        let marker: Option<String> = store.get_json(keys::LAST_IMPORT).unwrap();
        assert!(marker.is_some());
    }

    #[test]
    fn test_opaque_collections_survive_round_trip() {
        let store = MemoryStore::new();
        let data = SiteData {
            services: vec![json!({"id": "s1", "name": "Consulting", "price": 100})],
            projects: vec![json!({"id": "pr1", "tags": ["web", "brand"]})],
            style_settings: json!({"headerLayout": "centered"}),
            ..SiteData::default()
        };

        data.import(&store).unwrap();
        let back = SiteData::export(&store).unwrap();

        assert_eq!(back.services, data.services);
        assert_eq!(back.projects, data.projects);
        assert_eq!(back.style_settings, data.style_settings);
    }
}
