//! Configuration management for Vellum.
//!
//! Parses `vellum.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the site data directory.
    pub data_dir: Option<PathBuf>,
    /// Override the static build output directory.
    pub out_dir: Option<PathBuf>,
    /// Override the publish collaborator base URL.
    pub publish_url: Option<String>,
    /// Override the publish request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vellum.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    #[serde(default)]
    site: SiteConfigRaw,
    /// Build configuration (paths are relative strings from TOML).
    #[serde(default)]
    build: BuildConfigRaw,
    /// Publish collaborator configuration (optional section).
    /// When present, `base_url` is required.
    publish: Option<PublishConfigRaw>,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Resolved publish configuration (set after loading).
    #[serde(skip)]
    pub publish_resolved: PublishConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    data_dir: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding the key-value store's JSON files.
    pub data_dir: PathBuf,
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    out_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Output directory for static HTML exports.
    pub out_dir: PathBuf,
}

/// Raw publish configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PublishConfigRaw {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved publish collaborator configuration.
#[derive(Debug)]
pub struct PublishConfig {
    /// Collaborator base URL; `None` means publishing always falls back to
    /// local artifacts.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum menu nesting depth emitted by the navigation renderer.
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vellum.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(data_dir) = &settings.data_dir {
            self.site_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.build_resolved.out_dir.clone_from(out_dir);
        }
        if let Some(publish_url) = &settings.publish_url {
            self.publish_resolved.base_url = Some(publish_url.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.publish_resolved.timeout_secs = timeout_secs;
        }
    }

    /// Get the validated publish collaborator base URL.
    ///
    /// Use this instead of accessing `publish_resolved.base_url` directly
    /// when the command requires a reachable collaborator.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no base URL is configured.
    pub fn require_publish_url(&self) -> Result<&str, ConfigError> {
        let url = self.publish_resolved.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("[publish] section with base_url required in config".into())
        })?;
        Ok(url)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_config_from(&start)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            build: BuildConfigRaw::default(),
            publish: None,
            render: RenderConfig::default(),
            site_resolved: SiteConfig {
                data_dir: base.join("data"),
            },
            build_resolved: BuildConfig {
                out_dir: base.join("dist"),
            },
            publish_resolved: PublishConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref base_url) = self.publish_resolved.base_url {
            require_non_empty(base_url, "publish.base_url")?;
            require_http_url(base_url, "publish.base_url")?;
        }
        if self.publish_resolved.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "publish.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.render.max_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Validates that `base_url` is provided when `[publish]` section exists.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            data_dir: resolve(self.site.data_dir.as_deref(), "data"),
        };
        self.build_resolved = BuildConfig {
            out_dir: resolve(self.build.out_dir.as_deref(), "dist"),
        };

        self.publish_resolved = match &self.publish {
            Some(publish) => {
                let base_url = publish.base_url.clone().ok_or_else(|| {
                    ConfigError::Validation(
                        "[publish] section requires base_url to be set".to_owned(),
                    )
                })?;
                PublishConfig {
                    base_url: Some(base_url),
                    timeout_secs: publish.timeout_secs.unwrap_or(30),
                }
            }
            None => PublishConfig::default(),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site_resolved.data_dir, PathBuf::from("/test/data"));
        assert_eq!(config.build_resolved.out_dir, PathBuf::from("/test/dist"));
        assert!(config.publish_resolved.base_url.is_none());
        assert_eq!(config.publish_resolved.timeout_secs, 30);
        assert_eq!(config.render.max_depth, 3);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.max_depth, 3);
    }

    #[test]
    fn test_parse_render_section() {
        let toml = r"
[render]
max_depth = 2
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.max_depth, 2);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
data_dir = "content"

[build]
out_dir = "public"

[publish]
base_url = "http://localhost:4000"
timeout_secs = 10
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.site_resolved.data_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.build_resolved.out_dir,
            PathBuf::from("/project/public")
        );
        assert_eq!(
            config.publish_resolved.base_url,
            Some("http://localhost:4000".to_owned())
        );
        assert_eq!(config.publish_resolved.timeout_secs, 10);
    }

    #[test]
    fn test_publish_section_requires_base_url() {
        let toml = r"
[publish]
timeout_secs = 10
";
        let mut config: Config = toml::from_str(toml).unwrap();
        let result = config.resolve_paths(Path::new("/project"));

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_no_publish_section_is_valid() {
        let toml = r#"
[site]
data_dir = "content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert!(config.publish_resolved.base_url.is_none());
        assert_eq!(config.publish_resolved.timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_bad_publish_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.publish_resolved.base_url = Some("ftp://nope".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("publish.base_url"));
    }

    #[test]
    fn test_apply_cli_settings_data_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            data_dir: Some(PathBuf::from("/elsewhere/data")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.site_resolved.data_dir,
            PathBuf::from("/elsewhere/data")
        );
        assert_eq!(config.build_resolved.out_dir, PathBuf::from("/test/dist")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_publish_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            publish_url: Some("http://localhost:9999".to_owned()),
            timeout_secs: Some(5),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.publish_resolved.base_url,
            Some("http://localhost:9999".to_owned())
        );
        assert_eq!(config.publish_resolved.timeout_secs, 5);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/vellum.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_discover_config_walks_up_to_nearest_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("site").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_config_from(&nested);

        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_config_prefers_closest_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let site = dir.path().join("site");
        let nested = site.join("pages");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(site.join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config_from(&nested);

        assert_eq!(found, Some(site.join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vellum.toml");
        std::fs::write(
            &path,
            r#"
[site]
data_dir = "content"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.site_resolved.data_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }
}
