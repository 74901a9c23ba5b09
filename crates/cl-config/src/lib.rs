//! cl-config: topology and system description loading.
//!
//! Both stores are thin handles on a directory. `load` returns an immutable
//! config value and every query is a method on that value, so there is no
//! "currently loaded" state to share or invalidate.

pub mod system;
pub mod topology;

pub use system::{SystemConfig, SystemStore, SystemValue};
pub use topology::{TopologyConfig, TopologyStore};

use std::fmt;
use std::path::PathBuf;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which description family a config error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Topology,
    System,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topology => write!(f, "Topology"),
            Self::System => write!(f, "System"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{kind} config '{name}' not found at {}", path.display())]
    NotFound {
        kind: ConfigKind,
        name: String,
        path: PathBuf,
    },

    #[error("Invalid {kind} config '{name}': {reason}")]
    Invalid {
        kind: ConfigKind,
        name: String,
        reason: String,
    },

    #[error("Dimension {dim} out of range for topology '{name}' ({count} dimensions)")]
    DimensionOutOfRange {
        name: String,
        dim: usize,
        count: usize,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a named description file, mapping a missing file to `NotFound`.
pub(crate) fn read_description(
    kind: ConfigKind,
    name: &str,
    path: PathBuf,
) -> ConfigResult<String> {
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            kind,
            name: name.to_string(),
            path,
        }),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}
