//! `vellum export` command implementation.

use std::path::PathBuf;

use clap::Args;
use vellum_config::{CliSettings, Config};
use vellum_content::SiteData;
use vellum_store::FsStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Destination file for the JSON data set.
    #[arg(short, long, default_value = "vellum-export.json")]
    output: PathBuf,

    /// Site data directory (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover vellum.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ExportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store = FsStore::new(config.site_resolved.data_dir.clone());
        let data = SiteData::export(&store)?;
        let json = serde_json::to_string_pretty(&data)?;
        std::fs::write(&self.output, json)?;

        output.success(&format!(
            "Exported {} pages, {} posts and {} menus to {}",
            data.pages.len(),
            data.posts.len(),
            data.menus.len(),
            self.output.display()
        ));
        Ok(())
    }
}
