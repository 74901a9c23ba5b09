//! Published column names.

// Raw simulator columns
pub const RUN_NAME: &str = "RunName";
pub const COMMS_TIME: &str = "CommsTime";
pub const TOTAL_PAYLOAD_SIZE: &str = "TotalPayloadSize";
pub const PAYLOAD_SIZE_DIM_PREFIX: &str = "PayloadSize_Dim";
pub const DIMENSION_INDEX: &str = "DimensionIndex";
pub const AVERAGE_CHUNK_LATENCY: &str = "AverageChunkLatency";

// Decoded from the run identifier
pub const ROW: &str = "Row";
pub const WORKLOAD: &str = "Workload";
pub const SYSTEM: &str = "System";
pub const TOPOLOGY: &str = "Topology";
pub const COMM_SCALE: &str = "CommScale";
pub const UNITS_COUNT: &str = "UnitsCount";
pub const PASSES: &str = "Passes";

pub const RUN_COLUMNS: [&str; 7] = [
    ROW,
    WORKLOAD,
    SYSTEM,
    TOPOLOGY,
    COMM_SCALE,
    UNITS_COUNT,
    PASSES,
];

// Derived
pub const PHYSICAL_TOPOLOGY: &str = "PhysicalTopology";
pub const NPUS_COUNT: &str = "NPUsCount";
pub const ACC_BW: &str = "AccBW";
pub const BW_UTILIZATION_TOTAL: &str = "BW_Utilization_Total";
pub const BW_UTILIZATION_DIM_PREFIX: &str = "BW_Utilization_Dim";
pub const COMMS_TIME_OPTIMAL: &str = "CommsTime_Optimal";
pub const COMMS_TIME_BW: &str = "CommsTime_BW";
pub const DIMENSION: &str = "Dimension";
pub const INTRA_SCHEDULING: &str = "IntraScheduling";
pub const INTER_SCHEDULING: &str = "InterScheduling";
pub const CHUNKS_COUNT: &str = "ChunksCount";

/// Parse the dimension index out of `<prefix><d>`.
pub fn dim_suffix(column: &str, prefix: &str) -> Option<usize> {
    column.strip_prefix(prefix)?.parse().ok()
}

pub fn payload_size_dim(dim: usize) -> String {
    format!("{PAYLOAD_SIZE_DIM_PREFIX}{dim}")
}

pub fn bw_utilization_dim(dim: usize) -> String {
    format!("{BW_UTILIZATION_DIM_PREFIX}{dim}")
}
