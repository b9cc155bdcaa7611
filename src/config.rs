use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/voxlight.toml";
pub const DEFAULT_BLOCKS_PATH: &str = "config/blocks.json";

/// Runner settings read from TOML. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Block pack to load.
    pub blocks_path: PathBuf,
    /// Check the lighting fixed point around every batch.
    pub verify_invariant: bool,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            blocks_path: PathBuf::from(DEFAULT_BLOCKS_PATH),
            verify_invariant: true,
            log_filter: "warn".to_string(),
            metrics_path: None,
            events_path: None,
        }
    }
}

impl RunConfig {
    /// Read and parse a config file, reporting any failure.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        Self::or_default(path, Self::read(path))
    }

    /// Unwrap a [`RunConfig::read`] result, logging why defaults are used.
    ///
    /// A missing file at the default location is expected and only noted.
    pub fn or_default(path: &Path, result: Result<Self>) -> Self {
        match result {
            Ok(cfg) => cfg,
            Err(err) => {
                let missing = err
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
                if missing && path == Path::new(DEFAULT_CONFIG_PATH) {
                    info!("Run config not found at {}. Using defaults", path.display());
                } else {
                    warn!("{err:#}. Using defaults");
                }
                RunConfig::default()
            }
        }
    }
}
