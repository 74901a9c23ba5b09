// cl-core/src/units.rs

use uom::si::f64::InformationRate as UomInformationRate;

/// Canonical bandwidth type (uom information rate, f64).
pub type Bandwidth = UomInformationRate;

const MICROSECONDS_PER_SECOND: f64 = 1e6;

/// Link bandwidth as written in topology descriptions (GB/s, binary prefix).
#[inline]
pub fn gib_per_s(v: f64) -> Bandwidth {
    use uom::si::information_rate::gibibyte_per_second;
    Bandwidth::new::<gibibyte_per_second>(v)
}

/// Express a bandwidth in MB per microsecond, the basis simulator reports
/// use for payload size over communication time.
#[inline]
pub fn mb_per_us(bw: Bandwidth) -> f64 {
    use uom::si::information_rate::mebibyte_per_second;
    bw.get::<mebibyte_per_second>() / MICROSECONDS_PER_SECOND
}

/// Convert a raw topology bandwidth figure (GB/s) to MB/us.
///
/// Equivalent to `raw * 1024 / 1e6`.
#[inline]
pub fn link_bandwidth_mb_per_us(raw_gb_per_s: f64) -> f64 {
    mb_per_us(gib_per_s(raw_gb_per_s))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn conversion_is_linear(a in 0.0_f64..1e6, b in 0.0_f64..1e6) {
            let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
            let sum = link_bandwidth_mb_per_us(a + b);
            let parts = link_bandwidth_mb_per_us(a) + link_bandwidth_mb_per_us(b);
            prop_assert!(nearly_equal(sum, parts, tol));
        }
    }
}
