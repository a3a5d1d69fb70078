//! Site settings model and store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vellum_store::{KvStore, KvStoreExt, StoreError, keys};

/// Site-wide configuration consumed by every renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Site display name.
    pub site_name: String,
    /// Short strapline used by hero blocks and meta fallbacks.
    pub tagline: String,
    /// Logo URL.
    pub logo_url: String,
    /// Contact email shown in the footer contact column.
    pub contact_email: String,
    /// Contact phone shown in the footer contact column.
    pub contact_phone: String,
    /// Postal address shown in the footer contact column.
    pub contact_address: String,
    /// Social links, network name to URL.
    pub social_links: BTreeMap<String, String>,
    /// Copyright holder; falls back to the site name when empty.
    pub copyright_holder: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "My Site".to_owned(),
            tagline: "A marketing website".to_owned(),
            logo_url: "/assets/logo.svg".to_owned(),
            contact_email: "hello@example.com".to_owned(),
            contact_phone: String::new(),
            contact_address: String::new(),
            social_links: BTreeMap::new(),
            copyright_holder: String::new(),
        }
    }
}

impl SiteSettings {
    /// Name used in the copyright line.
    #[must_use]
    pub fn copyright_name(&self) -> &str {
        if self.copyright_holder.is_empty() {
            &self.site_name
        } else {
            &self.copyright_holder
        }
    }
}

/// Store for the single site-settings record.
pub struct SettingsStore {
    store: Arc<dyn KvStore>,
}

impl SettingsStore {
    /// Create a settings store over the given persistence port.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load settings, falling back to seeded defaults when the record is
    /// absent or corrupt (corruption is logged, not surfaced).
    pub fn load(&self) -> SiteSettings {
        match self.store.get_json::<SiteSettings>(keys::SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => SiteSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load site settings, using defaults");
                SiteSettings::default()
            }
        }
    }

    /// Overwrite the settings record.
    pub fn save(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.store.set_json(keys::SETTINGS, settings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vellum_store::MemoryStore;

    use super::*;

    #[test]
    fn test_load_defaults_when_absent() {
        let store = SettingsStore::new(Arc::new(MemoryStore::new()));

        assert_eq!(store.load(), SiteSettings::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = SettingsStore::new(Arc::new(MemoryStore::new()));
        let mut settings = SiteSettings::default();
        settings.site_name = "Acme Co".to_owned();
        settings
            .social_links
            .insert("twitter".to_owned(), "https://twitter.com/acme".to_owned());

        store.save(&settings).unwrap();

        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_load_defaults_on_corrupt_record() {
        let mem = MemoryStore::new().with_value(keys::SETTINGS, "{broken");
        let store = SettingsStore::new(Arc::new(mem));

        assert_eq!(store.load(), SiteSettings::default());
    }

    #[test]
    fn test_copyright_name_falls_back_to_site_name() {
        let mut settings = SiteSettings::default();
        settings.site_name = "Acme Co".to_owned();
        assert_eq!(settings.copyright_name(), "Acme Co");

        settings.copyright_holder = "Acme Holdings".to_owned();
        assert_eq!(settings.copyright_name(), "Acme Holdings");
    }
}
