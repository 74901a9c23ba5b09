//! System descriptions (`<name>.txt`, `key: value` lines).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::{ConfigError, ConfigKind, ConfigResult, read_description};

const CHUNKS_COUNT_KEY: &str = "preferred-dataset-splits";
const INTRA_SCHEDULING_KEY: &str = "intra-dimension-scheduling";
const INTER_SCHEDULING_KEY: &str = "inter-dimension-scheduling";

/// A raw value from a system description: integer when it parses as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SystemValue {
    Int(i64),
    Text(String),
}

impl SystemValue {
    fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(raw.to_string()))
    }
}

/// A parsed system description. Keys missing from the file stay `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SystemConfig {
    pub name: String,
    pub chunks_count: Option<u64>,
    pub intra_scheduling: Option<String>,
    pub inter_scheduling: Option<String>,
    entries: BTreeMap<String, SystemValue>,
}

impl SystemConfig {
    /// Parse description text. Only lines with exactly one `:` are read.
    pub fn parse(name: &str, content: &str) -> ConfigResult<Self> {
        let mut config = SystemConfig {
            name: name.to_string(),
            ..Default::default()
        };

        for line in content.lines() {
            let mut parts = line.split(':');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                CHUNKS_COUNT_KEY => {
                    let chunks = value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                        kind: ConfigKind::System,
                        name: name.to_string(),
                        reason: format!("{CHUNKS_COUNT_KEY} '{value}' is not an integer: {e}"),
                    })?;
                    config.chunks_count = Some(chunks);
                }
                INTRA_SCHEDULING_KEY => config.intra_scheduling = Some(value.to_string()),
                INTER_SCHEDULING_KEY => config.inter_scheduling = Some(value.to_string()),
                _ => {}
            }

            config
                .entries
                .insert(key.to_string(), SystemValue::parse(value));
        }

        Ok(config)
    }

    /// Any key from the description, recognized or not.
    pub fn get(&self, key: &str) -> Option<&SystemValue> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &SystemValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Directory of `<name>.txt` system descriptions.
#[derive(Debug, Clone)]
pub struct SystemStore {
    dir: PathBuf,
}

impl SystemStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.txt"))
    }

    pub fn load(&self, name: &str) -> ConfigResult<SystemConfig> {
        let content = read_description(ConfigKind::System, name, self.path_for(name))?;
        let config = SystemConfig::parse(name, &content)?;
        debug!(system = name, "loaded system");
        Ok(config)
    }
}
