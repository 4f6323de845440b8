use crate::error::{LoaderError, Result};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Loader configuration as read from the YAML document.
///
/// Every key lives under the `FALKORDB` namespace:
///
/// ```yaml
/// FALKORDB:
///   uri: falkor://localhost:6379
///   user: default
///   password: secret
///   graph_name: complaints
///   csv_file_path: data/complaints.csv
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "FALKORDB")]
    pub falkordb: GraphSettings,
}

#[derive(Clone, Deserialize)]
pub struct GraphSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub graph_name: String,
    pub csv_file_path: PathBuf,
    /// Overridden by `--label`
    #[serde(default)]
    pub node_label: Option<String>,
    /// Overridden by `--batch-size`
    #[serde(default)]
    pub batch_size: Option<usize>,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for GraphSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .field("graph_name", &self.graph_name)
            .field("csv_file_path", &self.csv_file_path)
            .field("node_label", &self.node_label)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Config {
    /// Read and validate the YAML document at `path`.
    ///
    /// Missing required keys fail here, before any connection is attempted.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LoaderError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::Config(format!("Failed to parse config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let settings = &self.falkordb;
        if settings.uri.trim().is_empty() {
            return Err(LoaderError::Config("FALKORDB.uri must not be empty".to_string()));
        }
        if settings.graph_name.trim().is_empty() {
            return Err(LoaderError::Config("FALKORDB.graph_name must not be empty".to_string()));
        }
        if settings.batch_size == Some(0) {
            return Err(LoaderError::Config("FALKORDB.batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
