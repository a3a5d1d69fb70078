//! Store trait and error types.
//!
//! Provides the core [`KvStore`] trait for abstracting collection persistence,
//! along with [`StoreError`] for unified error handling across backends.
//!
//! # Key Convention
//!
//! Keys are fixed, flat strings naming whole collections (see [`crate::keys`]).
//! Values are JSON documents; every write replaces the whole value under its
//! key. There are no partial updates and no transactions spanning keys, so
//! callers accept a last-writer-wins contract.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Semantic error categories for store operations.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Key or backing resource does not exist.
    NotFound,
    /// Permission denied by the backend.
    PermissionDenied,
    /// Backend is out of space or over quota.
    Quota,
    /// Stored value could not be parsed.
    Corrupt,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Key context (if applicable).
    pub key: Option<String>,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            key: None,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach key context.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a corrupt-value error for a key.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Corrupt)
            .with_key(key)
            .with_source(source)
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::QuotaExceeded => StoreErrorKind::Quota,
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (key: pages)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::Quota => "Quota exceeded",
            StoreErrorKind::Corrupt => "Corrupt value",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Key-value persistence port.
///
/// Provides a uniform interface for the content stores regardless of backend.
/// Implementations handle backend-specific details like file layout and
/// atomicity of single-key writes.
pub trait KvStore: Send + Sync {
    /// Read the raw JSON value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails (permission, quota).
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// List all keys currently present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Typed JSON access over any [`KvStore`].
pub trait KvStoreExt {
    /// Read and deserialize the value under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] with kind [`StoreErrorKind::Corrupt`] when the
    /// stored value is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::corrupt(key, e)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::corrupt(key, e))?;
        self.set_raw(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert!(err.key.is_none());
        assert!(err.path.as_deref().is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_store_error_with_key() {
        let err = StoreError::new(StoreErrorKind::Corrupt).with_key("menus");

        assert_eq!(err.key.as_deref(), Some("menus"));
    }

    #[test]
    fn test_store_error_with_path() {
        let err = StoreError::new(StoreErrorKind::NotFound).with_path("/data/pages.json");

        assert_eq!(err.path.as_deref(), Some(Path::new("/data/pages.json")));
    }

    #[test]
    fn test_store_error_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = StoreError::io(io_err, Some(PathBuf::from("/data/pages.json")));

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("/data/pages.json")));
    }

    #[test]
    fn test_store_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::io(io_err, None);

        assert_eq!(err.kind, StoreErrorKind::PermissionDenied);
    }

    #[test]
    fn test_store_error_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_store_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::new(StoreErrorKind::PermissionDenied)
            .with_backend("Fs")
            .with_key("pages")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Permission denied: denied (key: pages)"
        );
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
