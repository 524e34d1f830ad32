//! Runtime configuration.
//!
//! Configuration is read from an INI file and folded over typed defaults, so
//! a missing file or a sparse one still yields a runnable setup. The cache
//! backend is chosen here once at startup; everything downstream sees only
//! `Arc<dyn ObjectStore>`.
//!
//! ```ini
//! [canvas]
//! tile_side = 1024
//!
//! [cache]
//! backend = disk
//! directory = /var/cache/tilecanvas
//! max_size_bytes = 2147483648
//!
//! [precache]
//! interval_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::info;

use crate::cache::{DiskObjectStore, MemoryObjectStore, ObjectStore};

/// Default side length of a tile, in pixels.
pub const DEFAULT_TILE_SIDE: i64 = 1024;

/// Default memory cache capacity (256 MB).
pub const DEFAULT_CACHE_SIZE_BYTES: u64 = 256 * 1024 * 1024;

/// Default pause between precache cycles.
pub const DEFAULT_PRECACHE_INTERVAL_SECS: u64 = 60;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("failed to load config: {0}")]
    Load(#[from] ini::Error),

    /// A key has a value that cannot be used.
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Invalid {
            key,
            reason: reason.to_string(),
        }
    }
}

/// Which object store backs the tile cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// Size-bounded in-memory store.
    Memory { max_size_bytes: u64 },
    /// Files under a root directory.
    Disk { directory: PathBuf },
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::Memory {
            max_size_bytes: DEFAULT_CACHE_SIZE_BYTES,
        }
    }
}

/// Top-level configuration for a canvas deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Side length of the square tiles the canvas is partitioned into.
    pub tile_side: i64,

    /// Tile cache backend.
    pub cache: CacheBackend,

    /// Pause between precache cycles.
    pub precache_interval: Duration,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            tile_side: DEFAULT_TILE_SIDE,
            cache: CacheBackend::default(),
            precache_interval: Duration::from_secs(DEFAULT_PRECACHE_INTERVAL_SECS),
        }
    }
}

impl CanvasConfig {
    /// Load configuration from an INI file, with defaults for anything the
    /// file omits.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path)?;
        let config = Self::from_ini(&ini)?;
        info!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from INI text.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(canvas) = ini.section(Some("canvas")) {
            if let Some(raw) = canvas.get("tile_side") {
                let side: i64 = raw
                    .parse()
                    .map_err(|e| ConfigError::invalid("canvas.tile_side", e))?;
                if side <= 0 {
                    return Err(ConfigError::invalid(
                        "canvas.tile_side",
                        "must be positive",
                    ));
                }
                config.tile_side = side;
            }
        }

        if let Some(cache) = ini.section(Some("cache")) {
            let backend = cache.get("backend").unwrap_or("memory");
            config.cache = match backend {
                "memory" => {
                    let mut max_size_bytes = DEFAULT_CACHE_SIZE_BYTES;
                    if let Some(raw) = cache.get("max_size_bytes") {
                        max_size_bytes = raw
                            .parse()
                            .map_err(|e| ConfigError::invalid("cache.max_size_bytes", e))?;
                    }
                    CacheBackend::Memory { max_size_bytes }
                }
                "disk" => {
                    let directory = cache.get("directory").ok_or_else(|| {
                        ConfigError::invalid(
                            "cache.directory",
                            "required when backend = disk",
                        )
                    })?;
                    CacheBackend::Disk {
                        directory: PathBuf::from(directory),
                    }
                }
                other => {
                    return Err(ConfigError::invalid(
                        "cache.backend",
                        format!("unknown backend {other:?}, expected memory or disk"),
                    ));
                }
            };
        }

        if let Some(precache) = ini.section(Some("precache")) {
            if let Some(raw) = precache.get("interval_secs") {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| ConfigError::invalid("precache.interval_secs", e))?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        "precache.interval_secs",
                        "must be positive",
                    ));
                }
                config.precache_interval = Duration::from_secs(secs);
            }
        }

        Ok(config)
    }

    /// Construct the configured object store.
    pub fn build_object_store(&self) -> Arc<dyn ObjectStore> {
        match &self.cache {
            CacheBackend::Memory { max_size_bytes } => {
                Arc::new(MemoryObjectStore::new(*max_size_bytes, None))
            }
            CacheBackend::Disk { directory } => Arc::new(DiskObjectStore::new(directory.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.tile_side, 1024);
        assert_eq!(
            config.cache,
            CacheBackend::Memory {
                max_size_bytes: DEFAULT_CACHE_SIZE_BYTES
            }
        );
        assert_eq!(config.precache_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_empty_ini_uses_defaults() {
        let config = CanvasConfig::load_from_str("").unwrap();
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn test_full_ini() {
        let text = "\
[canvas]
tile_side = 256

[cache]
backend = disk
directory = /tmp/tiles

[precache]
interval_secs = 30
";
        let config = CanvasConfig::load_from_str(text).unwrap();
        assert_eq!(config.tile_side, 256);
        assert_eq!(
            config.cache,
            CacheBackend::Disk {
                directory: PathBuf::from("/tmp/tiles")
            }
        );
        assert_eq!(config.precache_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_memory_backend_with_size() {
        let text = "[cache]\nbackend = memory\nmax_size_bytes = 1024\n";
        let config = CanvasConfig::load_from_str(text).unwrap();
        assert_eq!(
            config.cache,
            CacheBackend::Memory {
                max_size_bytes: 1024
            }
        );
    }

    #[test]
    fn test_disk_backend_requires_directory() {
        let err = CanvasConfig::load_from_str("[cache]\nbackend = disk\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "cache.directory",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = CanvasConfig::load_from_str("[cache]\nbackend = s3\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "cache.backend",
                ..
            }
        ));
    }

    #[test]
    fn test_nonpositive_tile_side_is_rejected() {
        for bad in ["0", "-16"] {
            let text = format!("[canvas]\ntile_side = {bad}\n");
            let err = CanvasConfig::load_from_str(&text).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    key: "canvas.tile_side",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err =
            CanvasConfig::load_from_str("[precache]\ninterval_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[canvas]\ntile_side = 512").unwrap();

        let config = CanvasConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.tile_side, 512);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CanvasConfig::load_from_file("/nonexistent/canvas.ini").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_build_object_store_memory() {
        let config = CanvasConfig::default();
        // Just exercises the factory; the store itself is tested elsewhere.
        let _store = config.build_object_store();
    }
}
