//! cl-core: shared foundation for commlens.
//!
//! Contains:
//! - units (link bandwidth conversion via uom information-rate types)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::CoreError;
pub use numeric::*;
pub use units::*;
