//! Resampling rasters onto the analysis grid

use crate::maybe_rayon::*;
use landex_core::{Error, GeoTransform, Raster, RasterElement, Result, Transformer, CRS};
use ndarray::Array2;

/// Shape and georeferencing of a north-up grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub transform: GeoTransform,
    pub rows: usize,
    pub cols: usize,
    pub crs: CRS,
}

impl GridSpec {
    pub fn new(transform: GeoTransform, rows: usize, cols: usize, crs: CRS) -> Self {
        Self {
            transform,
            rows,
            cols,
            crs,
        }
    }

    /// Grid of `raster`, using `fallback` when the raster has no CRS
    pub fn of_raster<T: RasterElement>(raster: &Raster<T>, fallback: &CRS) -> Self {
        Self::new(
            *raster.transform(),
            raster.rows(),
            raster.cols(),
            raster.crs().cloned().unwrap_or_else(|| fallback.clone()),
        )
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Nearest-neighbour warp of `source` onto `target`.
///
/// Each target cell takes the source value under its center. Cells whose
/// center falls outside the source, or on a nodata value, become NaN.
/// A source without a CRS is taken to share the target's.
pub fn warp_nearest<T: RasterElement>(source: &Raster<T>, target: &GridSpec) -> Result<Raster<f64>> {
    let source_crs = source.crs().unwrap_or(&target.crs);
    let to_source = Transformer::new(&target.crs, source_crs)?;
    let nodata = source.nodata();
    let (rows, cols) = target.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| {
                    let (x, y) = target.transform.pixel_to_geo(col, row);
                    let (sx, sy) = to_source.transform(x, y);
                    source
                        .sample(sx, sy)
                        .filter(|v| !v.is_nodata(nodata))
                        .and_then(<T as RasterElement>::to_f64)
                        .unwrap_or(f64::NAN)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    let mut out = Raster::from_array(array).with_georef(target.transform, Some(target.crs.clone()));
    out.set_nodata(Some(f64::NAN));
    Ok(out)
}

/// Fraction of each target cell covered by `indicator`.
///
/// Each target cell is sampled at `samples` x `samples` evenly spaced points,
/// each looked up in the source grid. Points outside the source count as
/// uncovered.
pub fn warp_coverage(
    indicator: &Array2<bool>,
    source: &GridSpec,
    target: &GridSpec,
    samples: usize,
) -> Result<Array2<f32>> {
    if indicator.dim() != source.shape() {
        return Err(Error::SizeMismatch {
            er: source.rows,
            ec: source.cols,
            ar: indicator.nrows(),
            ac: indicator.ncols(),
        });
    }
    if samples == 0 {
        return Err(Error::InvalidParameter {
            name: "samples",
            value: "0".to_string(),
            reason: "at least one sample per axis is required".to_string(),
        });
    }

    let to_source = Transformer::new(&target.crs, &source.crs)?;
    let (rows, cols) = target.shape();
    let step = 1.0 / samples as f64;
    let total = (samples * samples) as f32;

    let data: Vec<f32> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| {
                    let mut covered = 0usize;
                    for i in 0..samples {
                        for j in 0..samples {
                            let fc = col as f64 + (j as f64 + 0.5) * step;
                            let fr = row as f64 + (i as f64 + 0.5) * step;
                            let (x, y) = target.transform.fractional_to_geo(fc, fr);
                            let (sx, sy) = to_source.transform(x, y);
                            let hit = source
                                .transform
                                .cell_index(sx, sy, source.rows, source.cols)
                                .is_some_and(|cell| indicator[cell]);
                            if hit {
                                covered += 1;
                            }
                        }
                    }
                    covered as f32 / total
                })
                .collect::<Vec<_>>()
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}
