// src/compat/mod.rs
// Compatibility decisions against the declared service -> range map.
use std::collections::BTreeMap;

use crate::version::{coerce, RangeSet};

/// Declared compatibility constraints: service name -> accepted version
/// range expression. Ordered so validation errors and serialized output are
/// deterministic.
pub type CompatibilityMap = BTreeMap<String, String>;

/// Decide whether `(name, version)` satisfies the range declared for `name`.
///
/// Fails closed: an unknown name, an unparseable declared range, or a
/// version string with no extractable numeric version all report `false`.
pub fn is_compatible_with(map: &CompatibilityMap, name: &str, version: &str) -> bool {
    let Some(declared) = map.get(name) else {
        return false;
    };
    let Ok(range) = RangeSet::parse(declared) else {
        return false;
    };
    let Some(version) = coerce(version) else {
        return false;
    };
    range.matches(&version)
}
