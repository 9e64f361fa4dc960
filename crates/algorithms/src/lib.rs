//! # landex Algorithms
//!
//! Land-eligibility analysis for landex.
//!
//! ## Modules
//!
//! - **rasterize**: burn vector geometries onto a grid
//! - **mask**: buffer boolean masks by a Euclidean radius
//! - **warp**: nearest-neighbour and coverage resampling between grids
//! - **exclusion**: the eligibility mask and its vector/raster exclusions
//! - **placement**: item distribution at a minimum separation
//! - **workflow**: configurable per-country pipeline and directory layout

pub mod exclusion;
pub mod mask;
pub(crate) mod maybe_rayon;
pub mod placement;
pub mod rasterize;
pub mod warp;
pub mod workflow;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::exclusion::{
        ExclusionCalculator, ExclusionReport, RasterExclusion, ValueSpec, VectorExclusion,
        AVAILABLE, EXCLUDED, OUTSIDE,
    };
    pub use crate::mask::{grow, Grow, GrowParams};
    pub use crate::placement::{distribute_items, DistributeItems, PlacementParams};
    pub use crate::rasterize::rasterize;
    pub use crate::warp::{warp_coverage, warp_nearest, GridSpec};
    pub use crate::workflow::{run, CountryReport, Layout, Step, StepReport, Workflow};
    pub use landex_core::prelude::*;
}
