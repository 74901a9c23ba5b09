//! Dataset loading service: assemble, then enrich.

use cl_config::{SystemStore, TopologyStore};
use cl_dataset::{DatasetKind, ResultTable, assemble};
use cl_metrics::enrich;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AppResult;

/// Builds report-ready tables from one results tree and its descriptions.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    config: AnalysisConfig,
    topologies: TopologyStore,
    systems: SystemStore,
}

impl DatasetLoader {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            config: config.clone(),
            topologies: TopologyStore::new(&config.topology_dir),
            systems: SystemStore::new(&config.system_dir),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Assemble every `kind` result file and attach derived columns.
    pub fn load_dataset(&self, kind: DatasetKind) -> AppResult<ResultTable> {
        info!(kind = %kind, root = %self.config.results_dir.display(), "loading dataset");
        let table = assemble(&self.config.results_dir, kind)?;
        let table = enrich(table, kind, &self.topologies, &self.systems)?;
        Ok(table)
    }
}
