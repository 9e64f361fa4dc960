//! I/O operations for reading and writing geospatial data

mod geojson_io;
mod geotiff;
mod shp;
mod srs_cache;

pub use geojson_io::read_geojson;
pub use geotiff::{
    read_geotiff, read_geotiff_from_buffer, read_geotiff_native, write_geotiff, write_geotiff_to_buffer,
    AnyRaster, GeoTiffOptions, SampleFormat,
};
pub use shp::write_point_shapefile;
pub use srs_cache::{load_srs, store_srs};

use crate::error::{Error, Result};
use std::path::Path;

/// Refuse to clobber an existing output unless `overwrite` is set.
pub(crate) fn check_writable(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(Error::OutputExists(path.to_path_buf()));
    }
    Ok(())
}
