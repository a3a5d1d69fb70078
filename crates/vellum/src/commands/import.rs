//! `vellum import` command implementation.

use std::path::PathBuf;

use clap::Args;
use vellum_config::{CliSettings, Config};
use vellum_content::SiteData;
use vellum_store::FsStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the import command.
#[derive(Args)]
pub(crate) struct ImportArgs {
    /// Path to a previously exported JSON data set.
    input: PathBuf,

    /// Site data directory (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover vellum.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ImportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let content = std::fs::read_to_string(&self.input)?;
        let data: SiteData = serde_json::from_str(&content)?;

        std::fs::create_dir_all(&config.site_resolved.data_dir)?;
        let store = FsStore::new(config.site_resolved.data_dir.clone());
        data.import(&store)?;

        output.success(&format!(
            "Imported {} pages, {} posts and {} menus from {}",
            data.pages.len(),
            data.posts.len(),
            data.menus.len(),
            self.input.display()
        ));
        Ok(())
    }
}
