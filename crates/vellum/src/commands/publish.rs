//! `vellum publish` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use vellum_config::{CliSettings, Config};
use vellum_content::{Menu, MenuStore, PageStore, PostStore, SettingsStore, SiteData};
use vellum_publish::{DocumentKind, PublishClient, PublishRequest, RebuildRequest};
use vellum_render::{MenuRenderOptions, render_page_document, render_post_document};
use vellum_store::{FsStore, KvStore};

use crate::error::CliError;
use crate::output::Output;

/// What to publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PublishTarget {
    /// Publish a single page by slug.
    Page,
    /// Publish a single post by slug.
    Post,
    /// Rebuild every document from the current data set.
    All,
}

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// What to publish.
    #[arg(value_enum)]
    target: PublishTarget,

    /// Slug of the page or post (not used with `all`).
    slug: Option<String>,

    /// Collaborator base URL (overrides config).
    #[arg(long)]
    publish_url: Option<String>,

    /// Request timeout in seconds (overrides config).
    #[arg(long)]
    timeout_secs: Option<u64>,

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

impl PublishArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            data_dir: self.data_dir.clone(),
            publish_url: self.publish_url.clone(),
            timeout_secs: self.timeout_secs,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let base_url = config.require_publish_url()?;
        let timeout = Duration::from_secs(config.publish_resolved.timeout_secs);
        let client = PublishClient::with_timeout(base_url, timeout);

        let store: Arc<dyn KvStore> =
            Arc::new(FsStore::new(config.site_resolved.data_dir.clone()));

        match self.target {
            PublishTarget::Page | PublishTarget::Post => {
                let slug = self.slug.as_deref().ok_or_else(|| {
                    CliError::Validation("a slug is required for page and post targets".to_owned())
                })?;
                let render_options = MenuRenderOptions {
                    max_depth: config.render.max_depth,
                    ..MenuRenderOptions::default()
                };
                let (kind, request) = build_request(self.target, slug, &store, &render_options)?;
                publish_document(&output, &client, kind, &request, &config)
            }
            PublishTarget::All => rebuild_all(&output, &client, &store),
        }
    }
}

/// Render the requested document into a publish payload.
fn build_request(
    target: PublishTarget,
    slug: &str,
    store: &Arc<dyn KvStore>,
    options: &MenuRenderOptions,
) -> Result<(DocumentKind, PublishRequest), CliError> {
    let settings = SettingsStore::new(Arc::clone(store)).load();
    let menus = MenuStore::new(Arc::clone(store)).list_menus();
    let menu_refs: Vec<&Menu> = menus.values().collect();

    match target {
        PublishTarget::Page => {
            let page = PageStore::new(Arc::clone(store))
                .find_by_slug(slug)
                .ok_or_else(|| CliError::Validation(format!("no page with slug '{slug}'")))?;
            let request = PublishRequest {
                slug: page.slug.clone(),
                html: render_page_document(&page, &settings, &menu_refs, options),
                title: page.title,
            };
            Ok((DocumentKind::Page, request))
        }
        PublishTarget::Post => {
            let posts = PostStore::new(Arc::clone(store));
            let post = posts
                .list_posts()
                .into_iter()
                .find(|p| p.slug == slug)
                .ok_or_else(|| CliError::Validation(format!("no post with slug '{slug}'")))?;
            let request = PublishRequest {
                slug: post.slug.clone(),
                html: render_post_document(&post, &settings, &menu_refs, options),
                title: post.title.clone(),
            };
            Ok((DocumentKind::Post, request))
        }
        PublishTarget::All => unreachable!("handled by the caller"),
    }
}

fn publish_document(
    output: &Output,
    client: &PublishClient,
    kind: DocumentKind,
    request: &PublishRequest,
    config: &Config,
) -> Result<(), CliError> {
    output.info(&format!("Publishing '{}'...", request.slug));

    let outcome = client.publish_or_fallback(kind, request)?;
    if outcome.published {
        let url = outcome.url.unwrap_or_else(|| outcome.filename.clone());
        output.success(&format!("Published '{}' to {url}", request.slug));
        return Ok(());
    }

    // Collaborator unavailable: deliver the artifact locally.
    let out_dir = &config.build_resolved.out_dir;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&outcome.filename);
    std::fs::write(&path, &outcome.html)?;
    output.warning(&format!(
        "Collaborator unavailable; wrote local artifact {}",
        path.display()
    ));
    Ok(())
}

fn rebuild_all(
    output: &Output,
    client: &PublishClient,
    store: &Arc<dyn KvStore>,
) -> Result<(), CliError> {
    let data = SiteData::export(store.as_ref())?;
    let request = RebuildRequest {
        pages: serde_json::to_value(&data.pages)?,
        posts: serde_json::to_value(&data.posts)?,
        settings: serde_json::to_value(&data.settings)?,
        menus: serde_json::to_value(&data.menus)?,
    };

    output.info("Rebuilding all documents...");
    let summary = client.rebuild_all(&request)?;
    output.success(&format!(
        "Rebuilt {} pages and {} posts",
        summary.pages, summary.posts
    ));
    Ok(())
}
