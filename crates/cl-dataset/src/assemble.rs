//! Result file discovery and merging.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::columns::RUN_NAME;
use crate::kind::DatasetKind;
use crate::run_name::decode;
use crate::table::{ResultRow, ResultTable, Value};
use crate::{AssembleError, AssembleResult};

/// Merge every `kind` result file below `search_root` into one table.
///
/// A file with an undecodable run identifier aborts the whole assembly.
pub fn assemble(search_root: &Path, kind: DatasetKind) -> AssembleResult<ResultTable> {
    if !search_root.exists() {
        return Err(AssembleError::SearchRootMissing {
            path: search_root.to_path_buf(),
        });
    }

    let mut table = ResultTable::default();
    let mut files = 0usize;

    for entry in WalkDir::new(search_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name().to_str() != Some(kind.file_name()) {
            continue;
        }

        let loaded = read_result_file(entry.path())?;
        files += 1;
        table.append(loaded);
    }

    info!(
        root = %search_root.display(),
        kind = %kind,
        files,
        rows = table.len(),
        "assembled dataset"
    );
    Ok(table)
}

/// Read one result CSV, decoding its `RunName` column.
///
/// Rows whose cells are all empty are dropped before decoding.
pub fn read_result_file(path: &Path) -> AssembleResult<ResultTable> {
    let csv_err = |source: csv::Error| AssembleError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let id_index = headers
        .iter()
        .position(|h| h == RUN_NAME)
        .ok_or_else(|| AssembleError::MissingIdentifierColumn {
            path: path.to_path_buf(),
        })?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            dropped += 1;
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        let identifier = record.get(id_index).unwrap_or_default();
        let run = decode(identifier).map_err(|source| AssembleError::Decode {
            path: path.to_path_buf(),
            line,
            source,
        })?;

        let values: BTreeMap<String, Value> = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| *i != id_index)
            .filter_map(|(_, (header, cell))| {
                Value::from_cell(cell).map(|value| (header.clone(), value))
            })
            .collect();

        rows.push(ResultRow::new(run, values));
    }

    if dropped > 0 {
        debug!(path = %path.display(), dropped, "dropped blank rows");
    }
    info!(path = %path.display(), rows = rows.len(), "loaded result file");

    let raw_columns = headers
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != id_index)
        .map(|(_, h)| h)
        .collect();
    Ok(ResultTable::new(raw_columns, rows))
}
