//! Georeferenced cell grid

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::Array2;

/// Cell values on a north-up grid, indexed `(row, col)` from the top-left.
///
/// The affine transform places the grid on the map and the optional CRS
/// says which map. `nodata` marks cells that carry no value; for the
/// exclusion mask these are the cells outside the region.
///
/// ```ignore
/// use landex_core::Raster;
///
/// let mut mask: Raster<u8> = Raster::filled(100, 100, 100);
/// mask.set(10, 20, 0)?;
/// assert_eq!(mask.count(100), 9_999);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Grid of zeros, not yet georeferenced
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Grid over `data`, which must hold exactly `rows * cols` values in
    /// row-major order.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        Array2::from_shape_vec((rows, cols), data)
            .map(Self::from_array)
            .map_err(|e| Error::Other(e.to_string()))
    }

    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    pub fn with_georef(mut self, transform: GeoTransform, crs: Option<CRS>) -> Self {
        self.transform = transform;
        self.crs = crs;
        self
    }

    /// Same placement and nodata as `self`, every cell set to `fill`
    pub fn like(&self, fill: T) -> Self {
        Self {
            data: Array2::from_elem(self.data.dim(), fill),
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: self.nodata,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        let (rows, cols) = self.shape();
        Error::IndexOutOfBounds { row, col, rows, cols }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        match self.data.get((row, col)) {
            Some(&value) => Ok(value),
            None => Err(self.out_of_bounds(row, col)),
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(self.out_of_bounds(row, col));
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Value of the cell containing map coordinate `(x, y)`, if inside the grid
    pub fn sample(&self, x: f64, y: f64) -> Option<T> {
        let (rows, cols) = self.shape();
        self.transform
            .cell_index(x, y, rows, cols)
            .map(|index| self.data[index])
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Width of a cell in map units
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Map extent as `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Map coordinate of the centre of cell `(row, col)`
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Cells holding exactly `value`
    pub fn count(&self, value: T) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }

    /// Range and mean of the cells that are not nodata
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut stats = RasterStatistics {
            min: None,
            max: None,
            mean: None,
            valid_count: 0,
            nodata_count: 0,
        };
        let mut sum = 0.0;

        for &value in self.data.iter().filter(|&&v| !self.is_nodata(v)) {
            let Some(v) = RasterElement::to_f64(value) else { continue };
            if stats.min.map_or(true, |m| value < m) {
                stats.min = Some(value);
            }
            if stats.max.map_or(true, |m| value > m) {
                stats.max = Some(value);
            }
            sum += v;
            stats.valid_count += 1;
        }

        stats.mean = (stats.valid_count > 0).then(|| sum / stats.valid_count as f64);
        stats.nodata_count = self.len() - stats.valid_count;
        stats
    }
}

/// Summary of the valid cells of a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_has_requested_shape() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.len(), 20_000);
    }

    #[test]
    fn set_rejects_cells_outside_the_grid() {
        let mut mask: Raster<u8> = Raster::filled(10, 10, 100);
        mask.set(5, 5, 0).unwrap();
        assert_eq!(mask.get(5, 5).unwrap(), 0);
        assert_eq!(mask.count(100), 99);
        assert!(matches!(mask.set(10, 0, 1), Err(Error::IndexOutOfBounds { row: 10, .. })));
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Raster::from_vec(vec![1u8; 5], 2, 3).is_err());
        let raster = Raster::from_vec(vec![1u8, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(raster.get(1, 0).unwrap(), 4);
    }

    #[test]
    fn sample_finds_the_containing_cell() {
        let mut raster: Raster<u8> = Raster::new(2, 2)
            .with_georef(GeoTransform::new(0.0, 20.0, 10.0, -10.0), None);
        raster.set(1, 0, 7).unwrap();
        assert_eq!(raster.sample(5.0, 5.0), Some(7));
        assert_eq!(raster.sample(15.0, 15.0), Some(0));
        assert_eq!(raster.sample(25.0, 5.0), None);
    }

    #[test]
    fn statistics_ignore_outside_cells() {
        let mut mask: Raster<u8> = Raster::filled(4, 4, 255);
        mask.set_nodata(Some(255));
        mask.set(0, 0, 100).unwrap();
        mask.set(0, 1, 0).unwrap();
        mask.set(1, 1, 100).unwrap();

        let stats = mask.statistics();
        assert_eq!(stats.min, Some(0));
        assert_eq!(stats.max, Some(100));
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 13);
        assert!((stats.mean.unwrap() - 200.0 / 3.0).abs() < 1e-12);
    }
}
