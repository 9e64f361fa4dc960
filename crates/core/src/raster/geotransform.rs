//! Placement of a north-up grid on the map

use serde::{Deserialize, Serialize};

/// Upper-left corner and cell steps of a grid without rotation.
///
/// Cell `(row, col)` spans `origin_x + col * pixel_width` to the next
/// column edge, and likewise in y with `pixel_height`, which is negative
/// when rows run southward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Grid covering `(min_x, min_y, max_x, max_y)` with square cells of
    /// `pixel_size`, its edges snapped outward to multiples of the pixel size.
    ///
    /// Returns the transform together with `(rows, cols)`.
    pub fn snapped(bounds: (f64, f64, f64, f64), pixel_size: f64) -> (Self, usize, usize) {
        let (min_x, min_y, max_x, max_y) = bounds;
        let x0 = (min_x / pixel_size).floor() * pixel_size;
        let y0 = (min_y / pixel_size).floor() * pixel_size;
        let x1 = (max_x / pixel_size).ceil() * pixel_size;
        let y1 = (max_y / pixel_size).ceil() * pixel_size;

        let cols = ((x1 - x0) / pixel_size).round().max(0.0) as usize;
        let rows = ((y1 - y0) / pixel_size).round().max(0.0) as usize;

        (Self::new(x0, y1, pixel_size, -pixel_size), rows, cols)
    }

    /// Map coordinate of the centre of cell `(row, col)`
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.fractional_to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Map coordinate at fractional pixel position `(col, row)`; integer
    /// positions are cell corners
    pub fn fractional_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Inverse of [`fractional_to_geo`](Self::fractional_to_geo); NaN for a
    /// degenerate transform
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        if self.pixel_width.abs() < 1e-12 || self.pixel_height.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Index `(row, col)` of the cell containing `(x, y)` in a
    /// `rows` x `cols` grid, or `None` outside the grid
    pub fn cell_index(&self, x: f64, y: f64, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let (col, row) = self.geo_to_pixel(x, y);
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col.floor() as usize, row.floor() as usize);
        (row < rows && col < cols).then_some((row, col))
    }

    /// Cell width; landex grids always have square cells
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// The same grid shifted outward by `pad` cells on every side
    pub fn padded(&self, pad: usize) -> Self {
        let (x, y) = self.fractional_to_geo(-(pad as f64), -(pad as f64));
        Self::new(x, y, self.pixel_width, self.pixel_height)
    }

    /// Extent `(min_x, min_y, max_x, max_y)` of a `width` x `height` grid
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.fractional_to_geo(0.0, 0.0);
        let (x1, y1) = self.fractional_to_geo(width as f64, height as f64);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cell_centres_invert() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        let (x, y) = gt.pixel_to_geo(5, 10);
        assert_relative_eq!(x, 155.0);
        assert_relative_eq!(y, 95.0);

        let (col, row) = gt.geo_to_pixel(x, y);
        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn bounds_of_south_running_grid() {
        let gt = GeoTransform::new(500_000.0, 2_002_000.0, 100.0, -100.0);
        assert_eq!(gt.bounds(20, 10), (500_000.0, 2_001_000.0, 502_000.0, 2_002_000.0));
    }

    #[test]
    fn snapped_grid_covers_bounds() {
        let (gt, rows, cols) = GeoTransform::snapped((1_050.0, 2_010.0, 1_320.0, 2_190.0), 100.0);

        assert_relative_eq!(gt.origin_x, 1_000.0);
        assert_relative_eq!(gt.origin_y, 2_200.0);
        assert_eq!((rows, cols), (2, 4));
        assert_eq!(gt.bounds(cols, rows), (1_000.0, 2_000.0, 1_400.0, 2_200.0));
    }

    #[test]
    fn cell_index_stays_inside() {
        let gt = GeoTransform::new(0.0, 30.0, 10.0, -10.0);
        assert_eq!(gt.cell_index(5.0, 25.0, 3, 3), Some((0, 0)));
        assert_eq!(gt.cell_index(29.9, 0.1, 3, 3), Some((2, 2)));
        assert_eq!(gt.cell_index(30.0, 15.0, 3, 3), None);
        assert_eq!(gt.cell_index(-0.1, 15.0, 3, 3), None);
        assert_eq!(gt.cell_index(f64::NAN, 15.0, 3, 3), None);
    }

    #[test]
    fn padding_moves_origin_outward() {
        let gt = GeoTransform::new(0.0, 30.0, 10.0, -10.0).padded(2);
        assert_eq!((gt.origin_x, gt.origin_y), (-20.0, 50.0));
    }
}
