//! Topology descriptions (`<name>.json`) and bandwidth queries.

use std::path::{Path, PathBuf};

use cl_core::{ensure_finite, link_bandwidth_mb_per_us};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::{ConfigError, ConfigKind, ConfigResult, read_description};

/// On-disk shape of a topology description. Keys not listed here are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopologyDef {
    #[serde(rename = "links-count")]
    pub links_count: Vec<u64>,
    #[serde(rename = "link-bandwidth")]
    pub link_bandwidth: Vec<f64>,
    #[serde(
        rename = "units-count",
        default,
        deserialize_with = "display_tokens"
    )]
    pub units_count: Vec<String>,
}

/// `units-count` is written either as strings or as bare numbers.
fn display_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let tokens = Vec::<Token>::deserialize(deserializer)?;
    Ok(tokens
        .into_iter()
        .map(|t| match t {
            Token::Int(v) => v.to_string(),
            Token::Float(v) => v.to_string(),
            Token::Text(s) => s,
        })
        .collect())
}

/// A validated topology. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyConfig {
    name: String,
    links_count: Vec<u64>,
    link_bandwidth: Vec<f64>,
    units_count: Vec<String>,
}

impl TopologyConfig {
    /// Validate a parsed description.
    ///
    /// `links-count` and `link-bandwidth` must have one entry per dimension
    /// and every bandwidth must be finite.
    pub fn from_def(name: &str, def: TopologyDef) -> ConfigResult<Self> {
        let invalid = |reason: String| ConfigError::Invalid {
            kind: ConfigKind::Topology,
            name: name.to_string(),
            reason,
        };

        if def.links_count.len() != def.link_bandwidth.len() {
            return Err(invalid(format!(
                "links-count and link-bandwidth length mismatch ({} vs {})",
                def.links_count.len(),
                def.link_bandwidth.len()
            )));
        }

        for bw in &def.link_bandwidth {
            ensure_finite(*bw, "link-bandwidth").map_err(|e| invalid(e.to_string()))?;
        }

        Ok(Self {
            name: name.to_string(),
            links_count: def.links_count,
            link_bandwidth: def.link_bandwidth,
            units_count: def.units_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension_count(&self) -> usize {
        self.links_count.len()
    }

    pub fn links_count(&self) -> &[u64] {
        &self.links_count
    }

    pub fn link_bandwidth(&self) -> &[f64] {
        &self.link_bandwidth
    }

    /// `units-count` tokens joined by `_`.
    pub fn units_count_label(&self) -> String {
        self.units_count.join("_")
    }

    /// Links count times per-link bandwidth at `dim`, in raw (GB/s) units.
    pub fn bandwidth_at_dim(&self, dim: usize) -> ConfigResult<f64> {
        let count = self.dimension_count();
        if dim >= count {
            return Err(ConfigError::DimensionOutOfRange {
                name: self.name.clone(),
                dim,
                count,
            });
        }
        Ok(self.links_count[dim] as f64 * self.link_bandwidth[dim])
    }

    /// Sum of `bandwidth_at_dim` over every dimension, in raw (GB/s) units.
    pub fn accumulated_bandwidth(&self) -> f64 {
        self.links_count
            .iter()
            .zip(&self.link_bandwidth)
            .map(|(&links, &bw)| links as f64 * bw)
            .sum()
    }

    /// `bandwidth_at_dim` converted to MB/us.
    pub fn bandwidth_at_dim_mb_per_us(&self, dim: usize) -> ConfigResult<f64> {
        self.bandwidth_at_dim(dim).map(link_bandwidth_mb_per_us)
    }

    /// `accumulated_bandwidth` converted to MB/us.
    pub fn accumulated_bandwidth_mb_per_us(&self) -> f64 {
        link_bandwidth_mb_per_us(self.accumulated_bandwidth())
    }
}

/// Directory of `<name>.json` topology descriptions.
#[derive(Debug, Clone)]
pub struct TopologyStore {
    dir: PathBuf,
}

impl TopologyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Read and validate the topology called `name`.
    pub fn load(&self, name: &str) -> ConfigResult<TopologyConfig> {
        let path = self.path_for(name);
        let content = read_description(ConfigKind::Topology, name, path.clone())?;
        let def: TopologyDef =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.clone(),
                source,
            })?;
        let config = TopologyConfig::from_def(name, def)?;
        debug!(
            topology = name,
            dims = config.dimension_count(),
            "loaded topology"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_core::{Tolerances, nearly_equal};

    fn def(links: Vec<u64>, bw: Vec<f64>) -> TopologyDef {
        TopologyDef {
            links_count: links,
            link_bandwidth: bw,
            units_count: vec!["4".to_string(), "4".to_string()],
        }
    }

    #[test]
    fn two_dim_bandwidth() {
        let topo = TopologyConfig::from_def("t", def(vec![2, 4], vec![100.0, 50.0])).unwrap();
        assert_eq!(topo.bandwidth_at_dim(0).unwrap(), 200.0);
        assert_eq!(topo.bandwidth_at_dim(1).unwrap(), 200.0);
        assert_eq!(topo.accumulated_bandwidth(), 400.0);
        assert!(nearly_equal(
            topo.accumulated_bandwidth_mb_per_us(),
            400.0 * 1024.0 / 1e6,
            Tolerances::default()
        ));
    }

    #[test]
    fn empty_topology_has_zero_bandwidth() {
        let topo = TopologyConfig::from_def("empty", def(vec![], vec![])).unwrap();
        assert_eq!(topo.dimension_count(), 0);
        assert_eq!(topo.accumulated_bandwidth(), 0.0);
    }

    #[test]
    fn length_mismatch_is_invalid() {
        let err = TopologyConfig::from_def("bad", def(vec![1, 2, 3], vec![10.0, 20.0])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn non_finite_bandwidth_is_invalid() {
        let err = TopologyConfig::from_def("nan", def(vec![1], vec![f64::NAN])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn dimension_out_of_range() {
        let topo = TopologyConfig::from_def("t", def(vec![2, 4], vec![100.0, 50.0])).unwrap();
        let err = topo.bandwidth_at_dim(2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DimensionOutOfRange { dim: 2, count: 2, .. }
        ));
    }

    #[test]
    fn units_count_accepts_numbers_and_strings() {
        let from_numbers: TopologyDef = serde_json::from_str(
            r#"{"links-count": [1, 1], "link-bandwidth": [1, 2], "units-count": [8, 2]}"#,
        )
        .unwrap();
        assert_eq!(from_numbers.units_count, vec!["8", "2"]);

        let from_strings: TopologyDef = serde_json::from_str(
            r#"{"topology-name": "Hierarchical", "links-count": [1], "link-bandwidth": [1.5], "units-count": ["16"]}"#,
        )
        .unwrap();
        let topo = TopologyConfig::from_def("x", from_strings).unwrap();
        assert_eq!(topo.units_count_label(), "16");
    }
}
