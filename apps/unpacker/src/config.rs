//! Unpacker configuration.
//!
//! Read from TOML at `$QFILE_UNPACKER_CONFIG`, or
//! `~/.config/qubes/qfile-unpacker.toml`. A missing file means defaults.
//! `QFILE_BYTES_LIMIT` and `QFILE_FILES_LIMIT` override the quotas.

use std::path::{Path, PathBuf};

use anyhow::Context;
use qfile_receiver::{Confinement, Limits};
use serde::{Deserialize, Serialize};

/// Unpacker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Parent of the per-VM incoming directories.
    #[serde(default = "default_incoming_dir")]
    pub incoming_dir: String,

    /// Maximum declared bytes per session (0 = unlimited).
    #[serde(default)]
    pub bytes_limit: u64,

    /// Maximum entries per session (0 = unlimited).
    #[serde(default)]
    pub files_limit: u64,

    #[serde(default)]
    pub confinement: Confinement,

    /// Apply sender permissions and timestamps.
    #[serde(default)]
    pub preserve_metadata: bool,
}

fn default_incoming_dir() -> String {
    "~/QubesIncoming".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            incoming_dir: default_incoming_dir(),
            bytes_limit: 0,
            files_limit: 0,
            confinement: Confinement::default(),
            preserve_metadata: false,
        }
    }
}

impl Config {
    /// Loads the configuration file and applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("invalid {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(value) = lookup("QFILE_BYTES_LIMIT") {
            self.bytes_limit = value
                .trim()
                .parse()
                .with_context(|| format!("invalid QFILE_BYTES_LIMIT: {value}"))?;
        }
        if let Some(value) = lookup("QFILE_FILES_LIMIT") {
            self.files_limit = value
                .trim()
                .parse()
                .with_context(|| format!("invalid QFILE_FILES_LIMIT: {value}"))?;
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            bytes: self.bytes_limit,
            files: self.files_limit,
        }
    }
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("QFILE_UNPACKER_CONFIG") {
        return PathBuf::from(path);
    }
    home_dir()
        .join(".config")
        .join("qubes")
        .join("qfile-unpacker.toml")
}

/// Expands a `~` prefix to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}
