//! Analysis configuration: where results and descriptions live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Root searched recursively for simulator result CSVs.
    pub results_dir: PathBuf,
    /// Directory of `<system>.txt` descriptions.
    pub system_dir: PathBuf,
    /// Directory of `<topology>.json` descriptions.
    pub topology_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("../result"),
            system_dir: PathBuf::from("../inputs/system"),
            topology_dir: PathBuf::from("../inputs/network/analytical"),
        }
    }
}

impl AnalysisConfig {
    /// Resolve relative directories against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        for dir in [
            &mut self.results_dir,
            &mut self.system_dir,
            &mut self.topology_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self
    }
}

/// Load an analysis config from YAML. Missing keys take their defaults and
/// relative paths are resolved against the file's directory.
pub fn load_config(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: AnalysisConfig =
        serde_yaml::from_str(&content).map_err(|e| AppError::ConfigFileParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.relative_to(base))
}
