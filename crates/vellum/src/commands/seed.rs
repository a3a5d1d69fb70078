//! `vellum seed` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use vellum_config::{CliSettings, Config};
use vellum_content::{MenuStore, PageStore, SettingsStore, SiteSettings};
use vellum_store::{FsStore, KvStore, keys};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the seed command.
#[derive(Args)]
pub(crate) struct SeedArgs {
    /// Site data directory (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover vellum.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SeedArgs {
    /// Write default content into the data directory.
    ///
    /// Idempotent: existing settings and pages are left untouched.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let data_dir = config.site_resolved.data_dir.clone();

        std::fs::create_dir_all(&data_dir)?;
        let store: Arc<dyn KvStore> = Arc::new(FsStore::new(data_dir.clone()));

        if store.get_raw(keys::SETTINGS)?.is_none() {
            SettingsStore::new(Arc::clone(&store)).save(&SiteSettings::default())?;
        }
        MenuStore::new(Arc::clone(&store)).seed_defaults()?;

        let pages = PageStore::new(Arc::clone(&store));
        if pages.find_by_slug("index").is_none() {
            let mut home = pages.create_page("Home", "index")?;
            pages.add_section(&mut home, "hero")?;
        }

        output.success(&format!("Seeded default content in {}", data_dir.display()));
        Ok(())
    }
}
