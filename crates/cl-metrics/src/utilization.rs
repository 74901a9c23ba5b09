//! Bandwidth utilization formulas.
//!
//! Payload sizes are reported in MB and communication times in us, so
//! bandwidths passed here must already be in MB/us
//! (see [`cl_core::link_bandwidth_mb_per_us`]).

/// Achieved bandwidth over theoretical bandwidth.
pub fn bw_utilization(payload_mb: f64, comms_time_us: f64, bandwidth_mb_per_us: f64) -> f64 {
    (payload_mb / comms_time_us) / bandwidth_mb_per_us
}

/// Communication time scaled by total utilization.
pub fn optimal_comms_time(bw_utilization_total: f64, comms_time_us: f64) -> f64 {
    bw_utilization_total * comms_time_us
}
