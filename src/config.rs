//! Run configuration from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Locations probed by [`SchedulerConfig::load_default`], in order.
const DEFAULT_LOCATIONS: &[&str] = &["scheduler.toml", "config/scheduler.toml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Name of the site the run targets; informational in local runs.
    #[serde(default)]
    pub site: String,
    /// Schedule every session as a broadcast regardless of its own flag.
    #[serde(default)]
    pub schedule_broadcasts: bool,
    /// Where log and success files are written.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    /// Folder every Mediasite row files into. Anything that is not
    /// GUID-shaped is ignored.
    #[serde(default)]
    pub mediasite_folder_id: String,
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            site: String::new(),
            schedule_broadcasts: false,
            logs_dir: default_logs_dir(),
            mediasite_folder_id: String::new(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the first default location that exists, or
    /// fall back to the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        for location in DEFAULT_LOCATIONS {
            if Path::new(location).exists() {
                return Self::from_file(location);
            }
        }
        Ok(SchedulerConfig::default())
    }

    /// The configured Mediasite folder id, when it is GUID-shaped.
    pub fn mediasite_folder_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.mediasite_folder_id.trim()).ok()
    }
}
