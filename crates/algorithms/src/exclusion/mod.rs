//! Exclusion accumulation over an eligibility mask
//!
//! - **calculator**: the per-region mask and its vector/raster exclusions
//! - **value**: raster value predicates
//! - **preview**: PNG rendering of a mask

mod calculator;
pub mod preview;
mod value;

pub use calculator::{
    ExclusionCalculator, ExclusionReport, RasterExclusion, VectorExclusion, AVAILABLE, EXCLUDED,
    OUTSIDE,
};
pub use value::ValueSpec;
