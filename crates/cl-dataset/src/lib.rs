//! cl-dataset: simulator result ingestion.
//!
//! Decodes run identifiers, walks result directories and merges every
//! matching CSV into one [`ResultTable`].

pub mod assemble;
pub mod columns;
pub mod kind;
pub mod query;
pub mod run_name;
pub mod table;

pub use assemble::{assemble, read_result_file};
pub use kind::DatasetKind;
pub use query::{GroupShare, GroupTotal};
pub use run_name::{RunRecord, UnitsCount, decode, decode_file_stem};
pub use table::{DerivedColumns, DimensionClass, ResultRow, ResultTable, Value};

use std::path::PathBuf;

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type AssembleResult<T> = Result<T, AssembleError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Malformed run identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum AssembleError {
    #[error("Search root does not exist: {}", path.display())]
    SearchRootMissing { path: PathBuf },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{} has no '{}' column", path.display(), columns::RUN_NAME)]
    MissingIdentifierColumn { path: PathBuf },

    #[error("{}:{line}: {source}", path.display())]
    Decode {
        path: PathBuf,
        line: u64,
        source: DecodeError,
    },
}
