//! Raster value predicates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which raster values count as a hit.
///
/// In TOML an exact value is a bare number (`value = 80`) and a range is an
/// inline table (`value = { min = 0.0, max = 6.28 }`). Both range bounds are
/// inclusive and either may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    Exact(f64),
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl ValueSpec {
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        ValueSpec::Range { min, max }
    }

    /// Whether `value` is a hit. NaN (nodata) never matches.
    pub fn matches(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match *self {
            ValueSpec::Exact(v) => value == v,
            ValueSpec::Range { min, max } => {
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
        }
    }
}

impl From<f64> for ValueSpec {
    fn from(v: f64) -> Self {
        ValueSpec::Exact(v)
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpec::Exact(v) => write!(f, "{}", v),
            ValueSpec::Range { min, max } => {
                let bound = |b: &Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
                write!(f, "({}-{})", bound(min), bound(max))
            }
        }
    }
}
