//! Table enrichment.
//!
//! Every distinct topology and system named in the table is loaded once up
//! front; a missing or invalid description fails the whole call before any
//! row is touched. Rows are then enriched independently and in parallel.

use std::collections::HashMap;

use cl_config::{ConfigResult, SystemConfig, SystemStore, TopologyConfig, TopologyStore};
use cl_core::{as_integer, ensure_finite};
use cl_dataset::columns::{self, bw_utilization_dim, payload_size_dim};
use cl_dataset::{DatasetKind, ResultRow, ResultTable};
use rayon::prelude::*;
use tracing::info;

use crate::dimension::{classify_token, dimension_count, dimension_token};
use crate::utilization::{bw_utilization, optimal_comms_time};
use crate::{MetricsError, MetricsResult};

/// Configs shared read-only by every row. Every name a row refers to is
/// loaded before any row is enriched.
struct Lookups {
    kind: DatasetKind,
    payload_dims: Vec<usize>,
    topologies: HashMap<String, TopologyConfig>,
    systems: HashMap<String, SystemConfig>,
}

fn load_distinct<'n, T>(
    names: impl Iterator<Item = &'n str>,
    load: impl Fn(&str) -> ConfigResult<T>,
) -> ConfigResult<HashMap<String, T>> {
    let mut loaded = HashMap::new();
    for name in names {
        if !loaded.contains_key(name) {
            loaded.insert(name.to_string(), load(name)?);
        }
    }
    Ok(loaded)
}

/// Attach derived columns to every row of `table`.
///
/// Any lookup failure aborts the call; no partially enriched table is
/// returned.
pub fn enrich(
    table: ResultTable,
    kind: DatasetKind,
    topology_store: &TopologyStore,
    system_store: &SystemStore,
) -> MetricsResult<ResultTable> {
    let payload_dims = table.payload_dimensions();
    let (raw_columns, rows) = table.into_parts();

    let topologies = match kind {
        DatasetKind::EndToEnd => load_distinct(rows.iter().map(|r| r.run.topology.as_str()), |n| {
            topology_store.load(n)
        })?,
        DatasetKind::LayerWise => HashMap::new(),
    };
    let systems = load_distinct(rows.iter().map(|r| r.run.system.as_str()), |n| {
        system_store.load(n)
    })?;

    let lookups = Lookups {
        kind,
        payload_dims,
        topologies,
        systems,
    };

    let rows = rows
        .into_par_iter()
        .enumerate()
        .map(|(index, row)| enrich_row(index, row, &lookups))
        .collect::<MetricsResult<Vec<_>>>()?;

    info!(
        kind = %kind,
        rows = rows.len(),
        topologies = lookups.topologies.len(),
        systems = lookups.systems.len(),
        "enriched dataset"
    );
    Ok(ResultTable::new(raw_columns, rows))
}

fn required(row: &ResultRow, index: usize, column: &str) -> MetricsResult<f64> {
    row.number(column).ok_or_else(|| MetricsError::MissingValue {
        row: index,
        column: column.to_string(),
    })
}

/// A computed metric, rejected when it is not finite.
fn finite(index: usize, column: &str, value: f64) -> MetricsResult<f64> {
    ensure_finite(value, "derived metric").map_err(|_| MetricsError::NonFinite {
        row: index,
        column: column.to_string(),
        value,
    })
}

fn enrich_row(index: usize, mut row: ResultRow, lookups: &Lookups) -> MetricsResult<ResultRow> {
    row.derived.physical_topology = Some(row.run.physical_topology());
    row.derived.npus_count = Some(row.run.npus_count());

    match lookups.kind {
        DatasetKind::EndToEnd => attach_bandwidth(index, &mut row, lookups)?,
        DatasetKind::LayerWise => attach_dimension(index, &mut row)?,
    }

    let system = &lookups.systems[row.run.system.as_str()];
    row.derived.intra_scheduling = system.intra_scheduling.clone();
    row.derived.inter_scheduling = system.inter_scheduling.clone();
    row.derived.chunks_count = system.chunks_count;

    Ok(row)
}

fn attach_bandwidth(index: usize, row: &mut ResultRow, lookups: &Lookups) -> MetricsResult<()> {
    let topology = &lookups.topologies[row.run.topology.as_str()];
    let comms_time = required(row, index, columns::COMMS_TIME)?;
    let total_payload = required(row, index, columns::TOTAL_PAYLOAD_SIZE)?;

    let total = finite(
        index,
        columns::BW_UTILIZATION_TOTAL,
        bw_utilization(
            total_payload,
            comms_time,
            topology.accumulated_bandwidth_mb_per_us(),
        ),
    )?;
    let optimal = finite(
        index,
        columns::COMMS_TIME_OPTIMAL,
        optimal_comms_time(total, comms_time),
    )?;

    let mut per_dim = Vec::new();
    for &dim in &lookups.payload_dims {
        let Some(payload) = row.number(&payload_size_dim(dim)) else {
            continue;
        };
        if payload > 0.0 {
            let bandwidth = topology.bandwidth_at_dim_mb_per_us(dim)?;
            let util = bw_utilization(payload, comms_time, bandwidth);
            per_dim.push((dim, finite(index, &bw_utilization_dim(dim), util)?));
        }
    }

    row.derived.acc_bw = Some(topology.accumulated_bandwidth());
    row.derived.bw_utilization_total = Some(total);
    row.derived.comms_time_optimal = Some(optimal);
    row.derived.bw_utilization_dim.extend(per_dim);
    Ok(())
}

fn attach_dimension(index: usize, row: &mut ResultRow) -> MetricsResult<()> {
    let raw = required(row, index, columns::DIMENSION_INDEX)?;
    let dim_index = as_integer(raw).ok_or_else(|| MetricsError::MissingValue {
        row: index,
        column: columns::DIMENSION_INDEX.to_string(),
    })?;

    let topology = &row.run.topology;
    let token = usize::try_from(dim_index)
        .ok()
        .and_then(|i| dimension_token(topology, i))
        .ok_or_else(|| MetricsError::DimensionOutOfRange {
            row: index,
            topology: topology.clone(),
            index: dim_index,
            count: dimension_count(topology),
        })?;

    row.derived.dimension = classify_token(token);
    row.derived.dimension_index = Some(dim_index);
    Ok(())
}
