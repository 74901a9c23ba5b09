//! Service layer for commlens.
//!
//! Ties the pipeline together for report generators: read an
//! [`AnalysisConfig`], then ask a [`DatasetLoader`] for an enriched table of
//! either dataset kind.

pub mod config;
pub mod error;
pub mod loader;

pub use cl_dataset::{DatasetKind, ResultRow, ResultTable, Value};
pub use config::{AnalysisConfig, load_config};
pub use error::{AppError, AppResult};
pub use loader::DatasetLoader;
