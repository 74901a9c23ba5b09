//! cl-metrics: derived analysis columns.
//!
//! Joins an assembled [`cl_dataset::ResultTable`] with topology and system
//! descriptions and computes bandwidth utilization, optimal communication
//! time, dimension classification and scheduling policies.

pub mod dimension;
pub mod enrich;
pub mod utilization;

pub use dimension::{classify_token, dimension_count, dimension_token};
pub use enrich::enrich;
pub use utilization::{bw_utilization, optimal_comms_time};

use cl_config::ConfigError;

pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(thiserror::Error, Debug)]
pub enum MetricsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Row {row}: missing numeric value for '{column}'")]
    MissingValue { row: usize, column: String },

    #[error("Row {row}: '{column}' is not finite ({value})")]
    NonFinite {
        row: usize,
        column: String,
        value: f64,
    },

    #[error(
        "Row {row}: dimension index {index} out of range for topology '{topology}' ({count} dimensions)"
    )]
    DimensionOutOfRange {
        row: usize,
        topology: String,
        index: i64,
        count: usize,
    },
}
