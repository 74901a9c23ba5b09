//! Run identifier decoding.
//!
//! The simulator names every run with a `-` separated string such as
//!
//! ```text
//! run-row14-workload-microAllReduce.txt-system-ring_ring.txt-network-ring64_ring64.json-commscale-2-unitscount-4 4-passes-10
//! ```
//!
//! Tokens alternate between a label and a value. Positions are fixed, so the
//! grammar is written down once as [`SCHEMA`] and every identifier is checked
//! against it before a [`RunRecord`] is produced.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{DecodeError, DecodeResult};

pub const DELIMITER: char = '-';

/// What a token position holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Field label, not interpreted.
    Label,
    Row,
    Workload,
    System,
    Topology,
    CommScale,
    UnitsCount,
    Passes,
}

const SCHEMA: [Slot; 14] = [
    Slot::Label,
    Slot::Row,
    Slot::Label,
    Slot::Workload,
    Slot::Label,
    Slot::System,
    Slot::Label,
    Slot::Topology,
    Slot::Label,
    Slot::CommScale,
    Slot::Label,
    Slot::UnitsCount,
    Slot::Label,
    Slot::Passes,
];

/// Per-dimension unit counts as embedded in an identifier.
///
/// Renders as the embedded text with spaces replaced by `_` (`4 4` is
/// `4_4`); the parsed integers are only used for [`UnitsCount::npus`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitsCount {
    label: String,
    units: Vec<u64>,
}

impl UnitsCount {
    pub fn new(units: Vec<u64>) -> Self {
        let label = units
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("_");
        Self { label, units }
    }

    /// Parse whitespace or `_` separated integers, keeping the text as given.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let units = raw
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u64>()
                    .map_err(|e| format!("units count token '{t}' is not an integer: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if units.is_empty() {
            return Err("units count is empty".to_string());
        }
        Ok(Self {
            label: raw.replace(' ', "_"),
            units,
        })
    }

    pub fn dims(&self) -> &[u64] {
        &self.units
    }

    /// Total processing units: the product over dimensions.
    pub fn npus(&self) -> u64 {
        self.units.iter().product()
    }
}

impl fmt::Display for UnitsCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for UnitsCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Experiment configuration recovered from a run identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub row: String,
    pub workload: String,
    pub system: String,
    pub topology: String,
    pub comm_scale: u64,
    pub units_count: UnitsCount,
    pub passes: u64,
}

impl RunRecord {
    pub fn npus_count(&self) -> u64 {
        self.units_count.npus()
    }

    /// `<topology> (<units>)`, unique per topology and unit shape.
    pub fn physical_topology(&self) -> String {
        format!("{} ({})", self.topology, self.units_count)
    }
}

#[derive(Default)]
struct RecordBuilder {
    row: Option<String>,
    workload: Option<String>,
    system: Option<String>,
    topology: Option<String>,
    comm_scale: Option<u64>,
    units_count: Option<UnitsCount>,
    passes: Option<u64>,
}

impl RecordBuilder {
    fn fill(&mut self, slot: Slot, token: &str) -> Result<(), String> {
        match slot {
            Slot::Label => {}
            Slot::Row => self.row = Some(token.to_string()),
            Slot::Workload => self.workload = Some(strip_extension(token).to_string()),
            Slot::System => self.system = Some(strip_extension(token).to_string()),
            Slot::Topology => self.topology = Some(strip_extension(token).to_string()),
            Slot::CommScale => self.comm_scale = Some(parse_integer(token, "commscale")?),
            Slot::UnitsCount => self.units_count = Some(UnitsCount::parse(token)?),
            Slot::Passes => self.passes = Some(parse_integer(token, "passes")?),
        }
        Ok(())
    }

    fn finish(self) -> Option<RunRecord> {
        Some(RunRecord {
            row: self.row?,
            workload: self.workload?,
            system: self.system?,
            topology: self.topology?,
            comm_scale: self.comm_scale?,
            units_count: self.units_count?,
            passes: self.passes?,
        })
    }
}

fn strip_extension(token: &str) -> &str {
    token.split_once('.').map_or(token, |(stem, _)| stem)
}

fn parse_integer(token: &str, what: &str) -> Result<u64, String> {
    token
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("{what} '{token}' is not an integer: {e}"))
}

/// Where an identifier was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// A `RunName` cell in a result CSV.
    Cell,
    /// A per-run file name; the passes token carries a `_` suffix.
    FileStem,
}

/// Decode a run identifier into a [`RunRecord`].
///
/// Tokens past the last schema position are ignored.
pub fn decode(identifier: &str) -> DecodeResult<RunRecord> {
    decode_from(identifier, Source::Cell)
}

/// Decode the stem of a per-run file such as
/// `run-...-passes-10_activity`, where the passes token is followed by a
/// `_` separated suffix.
pub fn decode_file_stem(stem: &str) -> DecodeResult<RunRecord> {
    decode_from(stem.trim(), Source::FileStem)
}

fn decode_from(identifier: &str, source: Source) -> DecodeResult<RunRecord> {
    let malformed = |reason: String| DecodeError::MalformedIdentifier {
        identifier: identifier.to_string(),
        reason,
    };

    let tokens: Vec<&str> = identifier.split(DELIMITER).collect();
    if tokens.len() < SCHEMA.len() {
        return Err(malformed(format!(
            "expected at least {} tokens, found {}",
            SCHEMA.len(),
            tokens.len()
        )));
    }

    let mut builder = RecordBuilder::default();
    for (slot, &token) in SCHEMA.iter().zip(&tokens) {
        let token = match (slot, source) {
            (Slot::Passes, Source::FileStem) => token.split('_').next().unwrap_or(token),
            _ => token,
        };
        builder.fill(*slot, token).map_err(&malformed)?;
    }

    builder
        .finish()
        .ok_or_else(|| malformed("schema left a field unfilled".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "run-row14-workload-microAllReduce.txt-system-ring_ring.txt-network-ring64_ring64.json-commscale-2-unitscount-4 4-passes-10";

    #[test]
    fn decodes_reference_identifier() {
        let record = decode(EXAMPLE).unwrap();
        assert_eq!(
            record,
            RunRecord {
                row: "row14".to_string(),
                workload: "microAllReduce".to_string(),
                system: "ring_ring".to_string(),
                topology: "ring64_ring64".to_string(),
                comm_scale: 2,
                units_count: UnitsCount::new(vec![4, 4]),
                passes: 10,
            }
        );
        assert_eq!(record.units_count.to_string(), "4_4");
        assert_eq!(record.npus_count(), 16);
        assert_eq!(record.physical_topology(), "ring64_ring64 (4_4)");
    }

    #[test]
    fn three_dimensional_units() {
        let id = "run-equal-workload-microAllReduce.txt-system-ring_direct_switch.txt-network-tRing_nDirect_ppSwitch.json-commscale-64-unitscount-2 8 4-passes-1";
        let record = decode(id).unwrap();
        assert_eq!(record.topology, "tRing_nDirect_ppSwitch");
        assert_eq!(record.units_count.to_string(), "2_8_4");
        assert_eq!(record.npus_count(), 64);
    }

    #[test]
    fn too_few_tokens() {
        let err = decode("run-row14-workload-x.txt").unwrap_err();
        let DecodeError::MalformedIdentifier { identifier, reason } = err;
        assert_eq!(identifier, "run-row14-workload-x.txt");
        assert!(reason.contains("at least 14"));
    }

    #[test]
    fn non_numeric_comm_scale() {
        let id = EXAMPLE.replace("commscale-2", "commscale-two");
        let err = decode(&id).unwrap_err();
        assert!(err.to_string().contains("commscale"));
    }

    #[test]
    fn non_numeric_units() {
        let id = EXAMPLE.replace("unitscount-4 4", "unitscount-4 x");
        assert!(decode(&id).is_err());
    }

    #[test]
    fn empty_units() {
        let id = EXAMPLE.replace("unitscount-4 4", "unitscount- ");
        assert!(decode(&id).is_err());
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        let id = format!("{EXAMPLE}-extra-token");
        assert_eq!(decode(&id).unwrap().passes, 10);
    }

    #[test]
    fn units_count_keeps_embedded_text() {
        let id = EXAMPLE.replace("unitscount-4 4", "unitscount-04 4");
        let record = decode(&id).unwrap();
        assert_eq!(record.units_count.to_string(), "04_4");
        assert_eq!(record.npus_count(), 16);
        assert_eq!(record.physical_topology(), "ring64_ring64 (04_4)");

        let id = EXAMPLE.replace("unitscount-4 4", "unitscount-4  4");
        assert_eq!(decode(&id).unwrap().units_count.to_string(), "4__4");
    }

    #[test]
    fn file_stem_drops_passes_suffix() {
        let stem = format!("{EXAMPLE}_activity");
        let record = decode_file_stem(&stem).unwrap();
        assert_eq!(record.passes, 10);
        assert_eq!(record, decode(EXAMPLE).unwrap());
        assert!(decode(&stem).is_err());
    }

    #[test]
    fn names_without_extension_are_kept() {
        let id = EXAMPLE.replace("microAllReduce.txt", "microAllReduce");
        assert_eq!(decode(&id).unwrap().workload, "microAllReduce");
    }
}
