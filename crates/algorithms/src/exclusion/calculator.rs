//! Per-region eligibility mask and the exclusions applied to it

use super::preview;
use super::value::ValueSpec;
use crate::mask::{crop, pad_cells, Grow, GrowParams};
use crate::placement::{DistributeItems, PlacementParams};
use crate::rasterize::{rasterize, rasterize_outlined};
use crate::warp::{warp_coverage, warp_nearest, GridSpec};
use geo::{BoundingRect, Coord, Geometry, MapCoords, Point, Rect};
use landex_core::io::{
    read_geojson, read_geotiff_native, write_geotiff, write_point_shapefile, AnyRaster, GeoTiffOptions,
};
use landex_core::{Algorithm, Error, GeoTransform, Raster, RasterElement, Result, Transformer, CRS};
use ndarray::Array2;
use std::path::Path;
use tracing::{debug, warn};

/// Cell value of eligible land
pub const AVAILABLE: u8 = 100;
/// Cell value of excluded land
pub const EXCLUDED: u8 = 0;
/// Cell value outside the region (also the mask nodata)
pub const OUTSIDE: u8 = 255;

/// Sub-cell samples per axis when resampling an indicator onto the grid
const COVERAGE_SAMPLES: usize = 3;
/// Covered fraction at which a resampled cell counts as hit
const COVERAGE_THRESHOLD: f32 = 0.5;

/// Options for excluding by vector features
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorExclusion {
    /// Distance in map units around each feature that is also excluded
    pub buffer: f64,
    /// Exclude everything *not* hit instead
    pub invert: bool,
}

/// Options for excluding by raster values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterExclusion {
    pub value: ValueSpec,
    /// Warp the source onto the grid before testing `value`
    pub prewarp: bool,
    pub buffer: f64,
    pub invert: bool,
}

impl RasterExclusion {
    pub fn new(value: impl Into<ValueSpec>) -> Self {
        Self {
            value: value.into(),
            prewarp: false,
            buffer: 0.0,
            invert: false,
        }
    }

    pub fn prewarp(mut self, prewarp: bool) -> Self {
        self.prewarp = prewarp;
        self
    }

    pub fn buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

/// Outcome of a single exclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionReport {
    /// Cells turned from eligible to excluded by this call
    pub cells_removed: usize,
    /// Eligible cells left afterwards
    pub eligible_cells: usize,
}

/// Eligibility mask over one region at a fixed pixel size.
///
/// Cells start eligible inside the region and outside elsewhere. Exclusions
/// only ever move cells from [`AVAILABLE`] to [`EXCLUDED`], so the final mask
/// does not depend on the order they are applied in.
#[derive(Debug, Clone)]
pub struct ExclusionCalculator {
    mask: Raster<u8>,
    grid: GridSpec,
    pixel_size: f64,
    region_cells: usize,
}

impl ExclusionCalculator {
    /// Mask over the region in the GeoJSON at `region`, in `srs`.
    pub fn new<P: AsRef<Path>>(region: P, srs: &CRS, pixel_size: f64) -> Result<Self> {
        let (features, crs) = read_geojson(region)?;
        let geometries: Vec<Geometry<f64>> = features.into_iter().filter_map(|f| f.geometry).collect();
        Self::from_geometries(&geometries, &crs, srs, pixel_size)
    }

    /// Mask over `geometries` (given in `geometry_crs`), built in `srs`.
    pub fn from_geometries(
        geometries: &[Geometry<f64>],
        geometry_crs: &CRS,
        srs: &CRS,
        pixel_size: f64,
    ) -> Result<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "pixel_size",
                value: pixel_size.to_string(),
                reason: "must be a finite, positive distance".to_string(),
            });
        }

        let region = reproject(geometries, geometry_crs, srs)?;
        let envelope = envelope(&region).ok_or_else(|| Error::Vector("region has no geometry".to_string()))?;

        let bounds = (envelope.min().x, envelope.min().y, envelope.max().x, envelope.max().y);
        let (transform, rows, cols) = GeoTransform::snapped(bounds, pixel_size);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let inside = rasterize(&region, &transform, rows, cols);
        let data = inside.mapv(|hit| if hit { AVAILABLE } else { OUTSIDE });
        let region_cells = inside.iter().filter(|&&hit| hit).count();
        if region_cells == 0 {
            return Err(Error::Algorithm("region covers no cell centers".to_string()));
        }

        let mut mask = Raster::from_array(data).with_georef(transform, Some(srs.clone()));
        mask.set_nodata(Some(OUTSIDE));
        debug!("Grid {} x {} at {} ({} region cells)", rows, cols, pixel_size, region_cells);

        Ok(Self {
            mask,
            grid: GridSpec::new(transform, rows, cols, srs.clone()),
            pixel_size,
            region_cells,
        })
    }

    /// Exclude the features of the GeoJSON at `path`.
    pub fn exclude_vector<P: AsRef<Path>>(&mut self, path: P, params: &VectorExclusion) -> Result<ExclusionReport> {
        let (features, crs) = read_geojson(path)?;
        let geometries: Vec<Geometry<f64>> = features.into_iter().filter_map(|f| f.geometry).collect();
        self.exclude_geometries(&geometries, &crs, params)
    }

    /// Exclude `geometries`, given in `crs`.
    ///
    /// Without a buffer a polygon hits the cells whose centers it covers. With
    /// one, its rings are burnt too, so parts narrower than a cell still seed
    /// the buffer.
    pub fn exclude_geometries(
        &mut self,
        geometries: &[Geometry<f64>],
        crs: &CRS,
        params: &VectorExclusion,
    ) -> Result<ExclusionReport> {
        let features = reproject(geometries, crs, &self.grid.crs)?;
        let (padded, pad, radius) = self.padded_grid(params.buffer)?;

        let hit = if params.buffer > 0.0 {
            rasterize_outlined(&features, &padded.transform, padded.rows, padded.cols)
        } else {
            rasterize(&features, &padded.transform, padded.rows, padded.cols)
        };
        self.apply_padded(hit, pad, radius, params.invert)
    }

    /// Exclude cells by the values of the GeoTIFF at `path`.
    pub fn exclude_raster<P: AsRef<Path>>(&mut self, path: P, params: &RasterExclusion) -> Result<ExclusionReport> {
        let source = read_geotiff_native(path, None)?;
        self.exclude_source(&source, params)
    }

    /// Exclude cells by the values of a raster read at its stored sample type.
    pub fn exclude_source(&mut self, source: &AnyRaster, params: &RasterExclusion) -> Result<ExclusionReport> {
        match source {
            AnyRaster::U8(r) => self.exclude_raster_data(r, params),
            AnyRaster::U16(r) => self.exclude_raster_data(r, params),
            AnyRaster::U32(r) => self.exclude_raster_data(r, params),
            AnyRaster::I8(r) => self.exclude_raster_data(r, params),
            AnyRaster::I16(r) => self.exclude_raster_data(r, params),
            AnyRaster::I32(r) => self.exclude_raster_data(r, params),
            AnyRaster::F32(r) => self.exclude_raster_data(r, params),
            AnyRaster::F64(r) => self.exclude_raster_data(r, params),
        }
    }

    /// Exclude cells by the values of an in-memory raster.
    pub fn exclude_raster_data<T: RasterElement>(
        &mut self,
        source: &Raster<T>,
        params: &RasterExclusion,
    ) -> Result<ExclusionReport> {
        if source.crs().is_none() {
            warn!("Raster has no CRS, assuming {}", self.grid.crs);
        }
        let (padded, pad, radius) = self.padded_grid(params.buffer)?;
        let spec = params.value;

        let hit = if params.prewarp {
            let warped = warp_nearest(source, &padded)?;
            warped.data().mapv(|v| spec.matches(v))
        } else {
            let nodata = source.nodata();
            let indicator = source.data().mapv(|v| {
                !v.is_nodata(nodata) && RasterElement::to_f64(v).is_some_and(|f| spec.matches(f))
            });
            let source_grid = GridSpec::of_raster(source, &self.grid.crs);
            warp_coverage(&indicator, &source_grid, &padded, COVERAGE_SAMPLES)?
                .mapv(|fraction| fraction >= COVERAGE_THRESHOLD)
        };

        self.apply_padded(hit, pad, radius, params.invert)
    }

    /// Analysis grid widened by the buffer reach, with `(pad, radius_cells)`
    fn padded_grid(&self, buffer: f64) -> Result<(GridSpec, usize, f64)> {
        if !buffer.is_finite() || buffer < 0.0 {
            return Err(Error::InvalidParameter {
                name: "buffer",
                value: buffer.to_string(),
                reason: "must be a finite, non-negative distance".to_string(),
            });
        }
        let radius = buffer / self.pixel_size;
        let pad = pad_cells(radius);
        let grid = GridSpec::new(
            self.grid.transform.padded(pad),
            self.grid.rows + 2 * pad,
            self.grid.cols + 2 * pad,
            self.grid.crs.clone(),
        );
        Ok((grid, pad, radius))
    }

    fn apply_padded(&mut self, hit: Array2<bool>, pad: usize, radius: f64, invert: bool) -> Result<ExclusionReport> {
        let grown = Grow.execute(hit, GrowParams { radius })?;
        let hit = crop(&grown, pad, self.grid.rows, self.grid.cols);
        Ok(self.apply(&hit, invert))
    }

    /// Mark eligible cells excluded where `hit` (or, inverted, where not)
    fn apply(&mut self, hit: &Array2<bool>, invert: bool) -> ExclusionReport {
        let mut removed = 0;
        for (cell, &h) in self.mask.data_mut().iter_mut().zip(hit.iter()) {
            if *cell == AVAILABLE && h != invert {
                *cell = EXCLUDED;
                removed += 1;
            }
        }

        let report = ExclusionReport {
            cells_removed: removed,
            eligible_cells: self.eligible_cells(),
        };
        debug!("Removed {} cells, {} eligible", report.cells_removed, report.eligible_cells);
        report
    }

    /// Number of eligible cells
    pub fn eligible_cells(&self) -> usize {
        self.mask.count(AVAILABLE)
    }

    /// Number of cells inside the region
    pub fn region_cells(&self) -> usize {
        self.region_cells
    }

    /// Eligible area in squared map units
    pub fn area_available(&self) -> f64 {
        self.eligible_cells() as f64 * self.pixel_size * self.pixel_size
    }

    /// Eligible share of the region, in percent
    pub fn percent_available(&self) -> f64 {
        100.0 * self.eligible_cells() as f64 / self.region_cells as f64
    }

    /// The current mask
    pub fn availability(&self) -> &Raster<u8> {
        &self.mask
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// Write the mask as a UInt8 GeoTIFF with nodata 255.
    pub fn save<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<()> {
        write_geotiff(&self.mask, path, Some(GeoTiffOptions::uint8().overwrite(overwrite)))
    }

    /// Write a PNG preview of the mask.
    pub fn draw<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        preview::render(&self.mask)
            .save_with_format(path.as_ref(), image::ImageFormat::Png)
            .map_err(|e| Error::Other(format!("Cannot write preview: {}", e)))
    }

    /// Place items on the eligible cells at least `separation` apart and
    /// write them as a point shapefile in the grid's CRS.
    pub fn distribute_items<P: AsRef<Path>>(
        &self,
        separation: f64,
        output: P,
        overwrite: bool,
    ) -> Result<Vec<Point<f64>>> {
        let points = DistributeItems.execute(self.mask.clone(), PlacementParams { separation })?;
        write_point_shapefile(output, &points, Some(&self.grid.crs), overwrite)?;
        Ok(points)
    }
}

/// Move `geometries` from `from` into `to`
fn reproject(geometries: &[Geometry<f64>], from: &CRS, to: &CRS) -> Result<Vec<Geometry<f64>>> {
    let transformer = Transformer::new(from, to)?;
    if transformer.is_identity() {
        return Ok(geometries.to_vec());
    }
    Ok(geometries
        .iter()
        .map(|g| {
            g.map_coords(|c| {
                let (x, y) = transformer.transform(c.x, c.y);
                Coord { x, y }
            })
        })
        .collect())
}

fn envelope(geometries: &[Geometry<f64>]) -> Option<Rect<f64>> {
    geometries
        .iter()
        .filter_map(|g| g.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{line_string, polygon};
    use landex_core::io::read_geotiff;
    use tempfile::TempDir;

    fn utm() -> CRS {
        CRS::from_epsg(32648)
    }

    /// 1 km square at 100 m: 10 x 10 eligible cells
    fn square_calculator() -> ExclusionCalculator {
        let region: Geometry<f64> = polygon![
            (x: 500_000.0, y: 2_000_000.0),
            (x: 501_000.0, y: 2_000_000.0),
            (x: 501_000.0, y: 2_001_000.0),
            (x: 500_000.0, y: 2_001_000.0),
            (x: 500_000.0, y: 2_000_000.0),
        ]
        .into();
        ExclusionCalculator::from_geometries(&[region], &utm(), &utm(), 100.0).unwrap()
    }

    #[test]
    fn region_starts_fully_eligible() {
        let calc = square_calculator();
        assert_eq!(calc.grid().shape(), (10, 10));
        assert_eq!(calc.region_cells(), 100);
        assert_eq!(calc.eligible_cells(), 100);
        assert_relative_eq!(calc.area_available(), 1_000_000.0);
        assert_relative_eq!(calc.percent_available(), 100.0);
    }

    #[test]
    fn triangle_region_marks_outside() {
        let region: Geometry<f64> = polygon![
            (x: 0.0, y: 0.0), (x: 1000.0, y: 0.0), (x: 0.0, y: 1000.0), (x: 0.0, y: 0.0)
        ]
        .into();
        let calc = ExclusionCalculator::from_geometries(&[region], &utm(), &utm(), 100.0).unwrap();
        let mask = calc.availability();

        assert_eq!(mask.get(9, 0).unwrap(), AVAILABLE);
        assert_eq!(mask.get(0, 9).unwrap(), OUTSIDE);
        assert_eq!(mask.nodata(), Some(OUTSIDE));
        // Cells strictly below the diagonal: 9 + 8 + ... + 0
        assert_eq!(calc.region_cells(), 45);
    }

    #[test]
    fn rejects_bad_pixel_size() {
        let region: Geometry<f64> = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        for pixel in [0.0, -5.0, f64::NAN] {
            let err = ExclusionCalculator::from_geometries(&[region.clone()], &utm(), &utm(), pixel).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "pixel_size", .. }));
        }
    }

    #[test]
    fn empty_region_is_an_error() {
        assert!(ExclusionCalculator::from_geometries(&[], &utm(), &utm(), 100.0).is_err());
    }

    #[test]
    fn vector_buffer_excludes_disk() {
        let mut calc = square_calculator();
        // Point on the center of cell (5, 5)
        let pt: Geometry<f64> = Point::new(500_550.0, 2_000_450.0).into();

        let report = calc
            .exclude_geometries(&[pt], &utm(), &VectorExclusion { buffer: 250.0, invert: false })
            .unwrap();
        assert_eq!(report.cells_removed, 21);
        assert_eq!(report.eligible_cells, 79);
        assert_eq!(calc.availability().get(5, 5).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(3, 5).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(3, 3).unwrap(), AVAILABLE);
    }

    #[test]
    fn buffered_polygon_smaller_than_a_cell_excludes_disk() {
        // 30 x 30 m inside cell (5, 5), clear of its center
        let speck: Geometry<f64> = polygon![
            (x: 500_510.0, y: 2_000_410.0),
            (x: 500_540.0, y: 2_000_410.0),
            (x: 500_540.0, y: 2_000_440.0),
            (x: 500_510.0, y: 2_000_440.0),
            (x: 500_510.0, y: 2_000_410.0),
        ]
        .into();

        let mut unbuffered = square_calculator();
        let report = unbuffered
            .exclude_geometries(&[speck.clone()], &utm(), &VectorExclusion::default())
            .unwrap();
        assert_eq!(report.cells_removed, 0);

        let mut calc = square_calculator();
        let report = calc
            .exclude_geometries(&[speck], &utm(), &VectorExclusion { buffer: 250.0, invert: false })
            .unwrap();
        assert_eq!(report.cells_removed, 21);
        assert_eq!(calc.availability().get(5, 5).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(5, 7).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(5, 8).unwrap(), AVAILABLE);
    }

    #[test]
    fn buffered_strip_between_centers_excludes_band() {
        // 60 m wide, spanning columns 5 and 6 without covering either center
        let strip: Geometry<f64> = polygon![
            (x: 500_560.0, y: 1_999_000.0),
            (x: 500_620.0, y: 1_999_000.0),
            (x: 500_620.0, y: 2_002_000.0),
            (x: 500_560.0, y: 2_002_000.0),
            (x: 500_560.0, y: 1_999_000.0),
        ]
        .into();

        let mut calc = square_calculator();
        let report = calc
            .exclude_geometries(&[strip], &utm(), &VectorExclusion { buffer: 250.0, invert: false })
            .unwrap();
        // Columns 3..=8 lie within 2.5 cells of columns 5 or 6
        assert_eq!(report.cells_removed, 60);
        for row in 0..10 {
            assert_eq!(calc.availability().get(row, 2).unwrap(), AVAILABLE);
            assert_eq!(calc.availability().get(row, 3).unwrap(), EXCLUDED);
            assert_eq!(calc.availability().get(row, 8).unwrap(), EXCLUDED);
            assert_eq!(calc.availability().get(row, 9).unwrap(), AVAILABLE);
        }
    }

    #[test]
    fn buffer_reaches_in_from_outside_the_grid() {
        let mut calc = square_calculator();
        // Coastline 50 m west of the grid
        let coast: Geometry<f64> = line_string![
            (x: 499_950.0, y: 1_999_000.0),
            (x: 499_950.0, y: 2_002_000.0),
        ]
        .into();

        let report = calc
            .exclude_geometries(&[coast], &utm(), &VectorExclusion { buffer: 250.0, invert: false })
            .unwrap();
        // The line sits in padding column -1; columns 0 and 1 are within 2.5 cells
        assert_eq!(report.cells_removed, 20);
        assert_eq!(calc.availability().get(4, 1).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(4, 2).unwrap(), AVAILABLE);
    }

    #[test]
    fn inverted_vector_keeps_only_hits() {
        let mut calc = square_calculator();
        let keep: Geometry<f64> = polygon![
            (x: 500_000.0, y: 2_000_000.0),
            (x: 500_300.0, y: 2_000_000.0),
            (x: 500_300.0, y: 2_001_000.0),
            (x: 500_000.0, y: 2_001_000.0),
            (x: 500_000.0, y: 2_000_000.0),
        ]
        .into();

        calc.exclude_geometries(&[keep], &utm(), &VectorExclusion { buffer: 0.0, invert: true })
            .unwrap();
        assert_eq!(calc.eligible_cells(), 30);
    }

    #[test]
    fn raster_exclusion_with_and_without_prewarp() {
        // Source at 50 m, class 80 in the top-left 400 x 400 m
        let mut source: Raster<u8> = Raster::filled(20, 20, 10)
            .with_georef(GeoTransform::new(500_000.0, 2_001_000.0, 50.0, -50.0), Some(utm()));
        for r in 0..8 {
            for c in 0..8 {
                source.set(r, c, 80).unwrap();
            }
        }

        let mut warped = square_calculator();
        let report = warped
            .exclude_raster_data(&source, &RasterExclusion::new(80.0).prewarp(true))
            .unwrap();
        assert_eq!(report.cells_removed, 16);

        let mut resampled = square_calculator();
        let report = resampled
            .exclude_raster_data(&source, &RasterExclusion::new(80.0))
            .unwrap();
        assert_eq!(report.cells_removed, 16);
        assert_eq!(warped.availability().data(), resampled.availability().data());
    }

    #[test]
    fn raster_file_is_tested_at_its_stored_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clc.tif");
        let mut source: Raster<u8> = Raster::filled(10, 10, 10)
            .with_georef(GeoTransform::new(500_000.0, 2_001_000.0, 100.0, -100.0), Some(utm()));
        for c in 0..10 {
            source.set(0, c, 90).unwrap();
        }
        write_geotiff(&source, &path, Some(GeoTiffOptions::uint8())).unwrap();

        let mut calc = square_calculator();
        let report = calc
            .exclude_raster(&path, &RasterExclusion::new(90.0).prewarp(true))
            .unwrap();
        assert_eq!(report.cells_removed, 10);
        assert_eq!(calc.availability().get(0, 4).unwrap(), EXCLUDED);
        assert_eq!(calc.availability().get(1, 4).unwrap(), AVAILABLE);
    }

    #[test]
    fn raster_nodata_never_matches() {
        let mut source: Raster<f32> = Raster::filled(10, 10, -9999.0)
            .with_georef(GeoTransform::new(500_000.0, 2_001_000.0, 100.0, -100.0), Some(utm()));
        source.set_nodata(Some(-9999.0));

        let mut calc = square_calculator();
        let report = calc
            .exclude_raster_data(&source, &RasterExclusion::new(ValueSpec::range(None, Some(0.0))).prewarp(true))
            .unwrap();
        assert_eq!(report.cells_removed, 0);
    }

    #[test]
    fn raster_without_crs_uses_grid_crs() {
        let source: Raster<u8> = Raster::filled(10, 10, 1)
            .with_georef(GeoTransform::new(500_000.0, 2_001_000.0, 100.0, -100.0), None);

        let mut calc = square_calculator();
        calc.exclude_raster_data(&source, &RasterExclusion::new(1.0)).unwrap();
        assert_eq!(calc.eligible_cells(), 0);
    }

    #[test]
    fn exclusions_never_restore_cells() {
        let mut calc = square_calculator();
        let pt: Geometry<f64> = Point::new(500_550.0, 2_000_450.0).into();
        calc.exclude_geometries(&[pt.clone()], &utm(), &VectorExclusion::default())
            .unwrap();
        let before = calc.eligible_cells();

        let report = calc
            .exclude_geometries(&[pt], &utm(), &VectorExclusion { buffer: 0.0, invert: true })
            .unwrap();
        assert!(report.eligible_cells <= before);
        assert_eq!(calc.availability().get(5, 5).unwrap(), EXCLUDED);
    }

    #[test]
    fn save_respects_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mask.tif");
        let calc = square_calculator();

        calc.save(&path, false).unwrap();
        assert!(matches!(calc.save(&path, false), Err(Error::OutputExists(_))));
        calc.save(&path, true).unwrap();

        let back: Raster<u8> = read_geotiff(&path, None).unwrap();
        assert_eq!(back.shape(), (10, 10));
        assert_eq!(back.nodata(), Some(OUTSIDE));
        assert_eq!(back.crs().and_then(CRS::epsg), Some(32648));
    }

    #[test]
    fn draw_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preview.png");
        square_calculator().draw(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
