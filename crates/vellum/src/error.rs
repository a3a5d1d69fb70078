//! CLI error types.

use vellum_config::ConfigError;
use vellum_content::{MenuError, PageError};
use vellum_publish::PublishError;
use vellum_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Menu(#[from] MenuError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
