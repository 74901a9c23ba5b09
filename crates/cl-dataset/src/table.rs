//! Result table data types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::columns;
use crate::run_name::RunRecord;

/// One cell. Raw simulator cells are `Float` when numeric, `Text` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Parse a raw CSV cell. Empty cells have no value.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        Some(
            cell.parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Text(cell.to_string())),
        )
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

/// Coarse dimension type, taken from the prefix of a topology name token
/// (`tRing_nDirect_ppSwitch` has dimensions `t`, `n`, `pp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DimensionClass {
    #[serde(rename = "pp")]
    Pp,
    #[serde(rename = "p")]
    P,
    #[serde(rename = "n")]
    N,
    #[serde(rename = "t")]
    T,
}

impl DimensionClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pp => "pp",
            Self::P => "p",
            Self::N => "n",
            Self::T => "t",
        }
    }
}

impl fmt::Display for DimensionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns computed after assembly. `None` means the column is absent for
/// the row, never zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedColumns {
    pub physical_topology: Option<String>,
    pub npus_count: Option<u64>,
    /// Accumulated topology bandwidth in raw description units.
    pub acc_bw: Option<f64>,
    pub bw_utilization_total: Option<f64>,
    pub bw_utilization_dim: BTreeMap<usize, f64>,
    pub comms_time_optimal: Option<f64>,
    pub dimension_index: Option<i64>,
    pub dimension: Option<DimensionClass>,
    pub intra_scheduling: Option<String>,
    pub inter_scheduling: Option<String>,
    pub chunks_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub run: RunRecord,
    /// Raw simulator cells keyed by header. Empty cells are left out.
    pub values: BTreeMap<String, Value>,
    pub derived: DerivedColumns,
}

impl ResultRow {
    pub fn new(run: RunRecord, values: BTreeMap<String, Value>) -> Self {
        Self {
            run,
            values,
            derived: DerivedColumns::default(),
        }
    }

    /// Raw numeric cell.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(Value::as_f64)
    }

    /// Look up any published column: decoded, derived or raw.
    pub fn get(&self, column: &str) -> Option<Value> {
        let d = &self.derived;
        match column {
            columns::ROW => Some(self.run.row.as_str().into()),
            columns::WORKLOAD => Some(self.run.workload.as_str().into()),
            columns::SYSTEM => Some(self.run.system.as_str().into()),
            columns::TOPOLOGY => Some(self.run.topology.as_str().into()),
            columns::COMM_SCALE => Some(Value::Int(self.run.comm_scale as i64)),
            columns::UNITS_COUNT => Some(self.run.units_count.to_string().into()),
            columns::PASSES => Some(Value::Int(self.run.passes as i64)),
            columns::PHYSICAL_TOPOLOGY => d.physical_topology.as_deref().map(Value::from),
            columns::NPUS_COUNT => d.npus_count.map(|v| Value::Int(v as i64)),
            columns::ACC_BW => d.acc_bw.map(Value::Float),
            columns::BW_UTILIZATION_TOTAL => d.bw_utilization_total.map(Value::Float),
            columns::COMMS_TIME_OPTIMAL | columns::COMMS_TIME_BW => {
                d.comms_time_optimal.map(Value::Float)
            }
            columns::DIMENSION_INDEX if d.dimension_index.is_some() => {
                d.dimension_index.map(Value::Int)
            }
            columns::DIMENSION => d.dimension.map(|c| c.as_str().into()),
            columns::INTRA_SCHEDULING => d.intra_scheduling.as_deref().map(Value::from),
            columns::INTER_SCHEDULING => d.inter_scheduling.as_deref().map(Value::from),
            columns::CHUNKS_COUNT => d.chunks_count.map(|v| Value::Int(v as i64)),
            other => {
                if let Some(dim) = columns::dim_suffix(other, columns::BW_UTILIZATION_DIM_PREFIX) {
                    return d.bw_utilization_dim.get(&dim).copied().map(Value::Float);
                }
                self.values.get(other).cloned()
            }
        }
    }
}

/// Rows merged from every matching result file.
///
/// `raw_columns` is the union of raw CSV headers in first-seen order, minus
/// the identifier column. Row order carries no meaning.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultTable {
    raw_columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(raw_columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self { raw_columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn raw_columns(&self) -> &[String] {
        &self.raw_columns
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<ResultRow>) {
        (self.raw_columns, self.rows)
    }

    /// Append another table, extending the header with unseen columns.
    pub fn append(&mut self, other: ResultTable) {
        for column in other.raw_columns {
            if !self.raw_columns.contains(&column) {
                self.raw_columns.push(column);
            }
        }
        self.rows.extend(other.rows);
    }

    /// Dimension indices of every `PayloadSize_Dim{d}` column, in header order.
    pub fn payload_dimensions(&self) -> Vec<usize> {
        self.raw_columns
            .iter()
            .filter_map(|c| columns::dim_suffix(c, columns::PAYLOAD_SIZE_DIM_PREFIX))
            .collect()
    }

    /// Every column name a row may answer to: raw headers, decoded fields and
    /// the derived columns present on at least one row.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.raw_columns.clone();
        names.extend(columns::RUN_COLUMNS.iter().map(|c| c.to_string()));

        let derived = [
            columns::PHYSICAL_TOPOLOGY,
            columns::NPUS_COUNT,
            columns::ACC_BW,
            columns::BW_UTILIZATION_TOTAL,
            columns::COMMS_TIME_OPTIMAL,
            columns::DIMENSION,
            columns::INTRA_SCHEDULING,
            columns::INTER_SCHEDULING,
            columns::CHUNKS_COUNT,
        ];
        for name in derived {
            if self.rows.iter().any(|r| r.get(name).is_some()) {
                names.push(name.to_string());
            }
        }

        let mut dims: Vec<usize> = self
            .rows
            .iter()
            .flat_map(|r| r.derived.bw_utilization_dim.keys().copied())
            .collect();
        dims.sort_unstable();
        dims.dedup();
        names.extend(dims.into_iter().map(columns::bw_utilization_dim));

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_name::decode;

    fn row(values: &[(&str, Value)]) -> ResultRow {
        let run = decode(
            "run-r1-workload-w.txt-system-s.txt-network-tRing_nSwitch.json-commscale-4-unitscount-2 8-passes-3",
        )
        .unwrap();
        ResultRow::new(
            run,
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn cell_parsing() {
        assert_eq!(Value::from_cell(""), None);
        assert_eq!(Value::from_cell("  "), None);
        assert_eq!(Value::from_cell("12.5"), Some(Value::Float(12.5)));
        assert_eq!(Value::from_cell("7"), Some(Value::Float(7.0)));
        assert_eq!(Value::from_cell("FIFO"), Some(Value::Text("FIFO".into())));
    }

    #[test]
    fn get_resolves_decoded_raw_and_derived() {
        let mut r = row(&[("CommsTime", Value::Float(4.0))]);
        r.derived.bw_utilization_dim.insert(1, 0.25);
        r.derived.comms_time_optimal = Some(2.0);

        assert_eq!(r.get("Workload"), Some(Value::Text("w".into())));
        assert_eq!(r.get("CommScale"), Some(Value::Int(4)));
        assert_eq!(r.get("UnitsCount"), Some(Value::Text("2_8".into())));
        assert_eq!(r.get("CommsTime"), Some(Value::Float(4.0)));
        assert_eq!(r.get("BW_Utilization_Dim1"), Some(Value::Float(0.25)));
        assert_eq!(r.get("BW_Utilization_Dim0"), None);
        assert_eq!(r.get("CommsTime_BW"), r.get("CommsTime_Optimal"));
        assert_eq!(r.get("Dimension"), None);
    }

    #[test]
    fn append_unions_headers() {
        let mut a = ResultTable::new(
            vec!["CommsTime".into(), "PayloadSize_Dim0".into()],
            vec![row(&[])],
        );
        let b = ResultTable::new(
            vec!["CommsTime".into(), "PayloadSize_Dim1".into()],
            vec![row(&[]), row(&[])],
        );
        a.append(b);
        assert_eq!(a.len(), 3);
        assert_eq!(
            a.raw_columns(),
            &["CommsTime", "PayloadSize_Dim0", "PayloadSize_Dim1"]
        );
        assert_eq!(a.payload_dimensions(), vec![0, 1]);
    }

    #[test]
    fn column_names_include_present_derived_only() {
        let mut r = row(&[]);
        r.derived.npus_count = Some(16);
        r.derived.bw_utilization_dim.insert(2, 0.1);
        let table = ResultTable::new(vec!["CommsTime".into()], vec![r]);
        let names = table.column_names();
        assert!(names.contains(&"NPUsCount".to_string()));
        assert!(names.contains(&"BW_Utilization_Dim2".to_string()));
        assert!(!names.contains(&"Dimension".to_string()));
        assert!(names.contains(&"Passes".to_string()));
    }
}
