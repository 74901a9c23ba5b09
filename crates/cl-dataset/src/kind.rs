use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which simulator report a dataset is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// One row per run: total and per-dimension payload, communication time.
    EndToEnd,
    /// One row per run and dimension: chunk latencies by `DimensionIndex`.
    LayerWise,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::EndToEnd, DatasetKind::LayerWise];

    /// File name the simulator writes for this report.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::EndToEnd => "backend_end_to_end.csv",
            Self::LayerWise => "backend_dim_info.csv",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndToEnd => write!(f, "end_to_end"),
            Self::LayerWise => write!(f, "layer_wise"),
        }
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end_to_end" => Ok(Self::EndToEnd),
            "layer_wise" => Ok(Self::LayerWise),
            other => Err(format!("unknown dataset kind '{other}'")),
        }
    }
}
