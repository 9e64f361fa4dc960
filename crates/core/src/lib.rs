//! # landex Core
//!
//! Data model and file formats shared by the landex crates: georeferenced
//! grids ([`Raster`], [`GeoTransform`]), the handful of projections a
//! country analysis needs ([`CRS`], [`Transformer`]), vector features and
//! readers/writers for GeoTIFF masks, GeoJSON layers, point shapefiles and
//! the per-country SRS cache.

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::{Transformer, CRS};
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};

pub mod prelude {
    pub use crate::crs::{Transformer, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// A named grid operation with defaultable parameters.
///
/// Implementors are stateless; everything they need arrives through
/// `input` and `params`.
pub trait Algorithm {
    type Input;
    type Output;
    type Params: Default;
    type Error: std::error::Error;

    fn name(&self) -> &'static str;

    /// One-line summary shown in logs
    fn description(&self) -> &'static str;

    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
