// src/version/mod.rs
mod coerce;
mod range;

pub use coerce::coerce;
pub use range::{is_valid_range, RangeParseError, RangeSet};
