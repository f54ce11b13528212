//! Tool configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Geometry of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Offset of the first window from the top-left corner of the screen, on
    /// both axes.
    pub origin: i32,
    /// Side of each (square) cascaded window.
    pub size: i32,
    /// Horizontal offset between consecutive windows, and the vertical offset
    /// when everything fits on screen.
    pub step: i32,
    /// Smallest vertical offset used when shrinking the cascade to fit.
    pub min_step: i32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            origin: 10,
            size: 750,
            step: 50,
            min_step: 5,
        }
    }
}

/// Stacking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StackConfig {
    /// Most windows stacked at once; larger sets are paged.
    pub page_size: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self { page_size: 8 }
    }
}

/// Tool options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Window titles never enumerated, on top of the built-in exclusions.
    pub excluded_titles: Vec<String>,
    /// Titles of the windows hosting a development session of this tool,
    /// excluded in debug builds only.
    pub dev_host_titles: Vec<String>,
    /// How long a window may take to answer the liveness probe.
    pub probe_timeout_ms: u64,
    pub cascade: CascadeConfig,
    pub stack: StackConfig,
    /// Directory holding the layout folders. Defaults to the executable's
    /// directory.
    pub storage_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_titles: Vec::new(),
            dev_host_titles: Vec::new(),
            probe_timeout_ms: 1000,
            cascade: CascadeConfig::default(),
            stack: StackConfig::default(),
            storage_root: None,
        }
    }
}

impl Config {
    /// Parse a configuration file.
    pub fn from_path(path: &Path) -> WinResult<Self> {
        let config_string = std::fs::read_to_string(path)?;

        let config = serde_json::from_str(&config_string).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })?;

        debug!("Parsed configuration file [{:?}]", path);
        Ok(config)
    }

    /// Parse a configuration file if there is one, falling back to defaults.
    pub fn load(path: Option<&Path>) -> WinResult<Self> {
        match path {
            Some(path) if path.exists() => Self::from_path(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "excluded_titles": ["Conky"], "cascade": { "step": 100 } }"#,
        )
        .unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.excluded_titles, vec!["Conky".to_owned()]);
        assert_eq!(config.cascade.step, 100);
        assert_eq!(config.cascade.size, 750);
        assert_eq!(config.stack.page_size, 8);
        assert_eq!(config.probe_timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn malformed_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match Config::from_path(&path) {
            Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
