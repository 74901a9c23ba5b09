//! Selection and grouping over an assembled table.
//!
//! Reports split the table by configuration (one figure per workload, comm
//! scale, pass count, ...) and pivot latencies by topology and dimension,
//! either as totals or as each dimension's share of its topology's total.
//! These helpers keep first-seen order so grouped output follows the order
//! rows were merged in.

use crate::table::{ResultTable, Value};

/// Sum of a numeric column over one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: Vec<Value>,
    pub total: f64,
    pub count: usize,
}

/// A group total as a fraction of the total over every group sharing its
/// leading key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupShare {
    pub key: Vec<Value>,
    pub total: f64,
    pub share: f64,
}

impl ResultTable {
    /// Distinct values of `column` in first-seen order. Rows without the
    /// column are skipped.
    pub fn unique(&self, column: &str) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for value in self.rows().iter().filter_map(|r| r.get(column)) {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        seen
    }

    /// Rows whose `column` equals `value`.
    pub fn filter_eq(&self, column: &str, value: &Value) -> ResultTable {
        let rows = self
            .rows()
            .iter()
            .filter(|r| r.get(column).as_ref() == Some(value))
            .cloned()
            .collect();
        ResultTable::new(self.raw_columns().to_vec(), rows)
    }

    /// Sum of `value_column` grouped by `keys`, groups in first-seen order.
    ///
    /// Rows missing a key or a numeric value are left out.
    pub fn sum_by(&self, keys: &[&str], value_column: &str) -> Vec<GroupTotal> {
        let mut groups: Vec<GroupTotal> = Vec::new();

        for row in self.rows() {
            let Some(key) = keys
                .iter()
                .map(|k| row.get(k))
                .collect::<Option<Vec<Value>>>()
            else {
                continue;
            };
            let Some(value) = row.get(value_column).and_then(|v| v.as_f64()) else {
                continue;
            };

            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => {
                    group.total += value;
                    group.count += 1;
                }
                None => groups.push(GroupTotal {
                    key,
                    total: value,
                    count: 1,
                }),
            }
        }

        groups
    }

    /// [`sum_by`](Self::sum_by), with each total divided by the sum of the
    /// totals sharing its first key (per topology, the fraction spent in
    /// each dimension). A first key whose totals sum to zero gives shares
    /// of zero.
    pub fn share_by(&self, keys: &[&str], value_column: &str) -> Vec<GroupShare> {
        let totals = self.sum_by(keys, value_column);

        let mut leading: Vec<(Option<&Value>, f64)> = Vec::new();
        for group in &totals {
            let lead = group.key.first();
            match leading.iter_mut().find(|(k, _)| *k == lead) {
                Some((_, sum)) => *sum += group.total,
                None => leading.push((lead, group.total)),
            }
        }

        totals
            .iter()
            .map(|group| {
                let lead = group.key.first();
                let sum = leading
                    .iter()
                    .find(|(k, _)| *k == lead)
                    .map_or(0.0, |(_, s)| *s);
                GroupShare {
                    key: group.key.clone(),
                    total: group.total,
                    share: if sum == 0.0 { 0.0 } else { group.total / sum },
                }
            })
            .collect()
    }
}
