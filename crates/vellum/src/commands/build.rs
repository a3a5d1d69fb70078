//! `vellum build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use vellum_config::{CliSettings, Config};
use vellum_content::{Menu, MenuStore, PageStatus, PageStore, PostStore, SettingsStore};
use vellum_render::{MenuRenderOptions, render_page_document, render_post_document};
use vellum_store::{FsStore, KvStore};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site data directory (overrides config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover vellum.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            out_dir: self.output_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let out_dir = config.build_resolved.out_dir.clone();

        output.info(&format!(
            "Data: {}",
            config.site_resolved.data_dir.display()
        ));
        output.info(&format!("Output: {}", out_dir.display()));

        let store: Arc<dyn KvStore> =
            Arc::new(FsStore::new(config.site_resolved.data_dir.clone()));
        let settings = SettingsStore::new(Arc::clone(&store)).load();
        let menus = MenuStore::new(Arc::clone(&store)).list_menus();
        let menu_refs: Vec<&Menu> = menus.values().collect();
        let render_options = MenuRenderOptions {
            max_depth: config.render.max_depth,
            ..MenuRenderOptions::default()
        };

        std::fs::create_dir_all(&out_dir)?;
        let mut written = 0_usize;

        for page in PageStore::new(Arc::clone(&store)).list_pages() {
            if page.status != PageStatus::Published {
                continue;
            }
            let html = render_page_document(&page, &settings, &menu_refs, &render_options);
            std::fs::write(out_dir.join(format!("{}.html", page.slug)), html)?;
            written += 1;
        }

        let posts_dir = out_dir.join("posts");
        std::fs::create_dir_all(&posts_dir)?;
        for post in PostStore::new(Arc::clone(&store)).list_posts() {
            if post.status != PageStatus::Published {
                continue;
            }
            let html = render_post_document(&post, &settings, &menu_refs, &render_options);
            std::fs::write(posts_dir.join(format!("{}.html", post.slug)), html)?;
            written += 1;
        }

        output.success(&format!(
            "Site built successfully to {} ({written} documents)",
            out_dir.display()
        ));
        Ok(())
    }
}
