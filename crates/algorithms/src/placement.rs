//! Item placement on an eligibility mask
//!
//! Greedy row-major scan from the top-left cell. An item goes on the center
//! of every eligible cell not yet blocked, and each item blocks all cells
//! whose centers lie closer than the separation distance.

use crate::exclusion::AVAILABLE;
use geo::Point;
use landex_core::{Algorithm, Error, Raster, Result};
use ndarray::Array2;
use tracing::debug;

/// Parameters for item placement
#[derive(Debug, Clone)]
pub struct PlacementParams {
    /// Minimum distance between items, in map units
    pub separation: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self { separation: 224.0 }
    }
}

/// Item placement algorithm
#[derive(Debug, Clone, Default)]
pub struct DistributeItems;

impl Algorithm for DistributeItems {
    type Input = Raster<u8>;
    type Output = Vec<Point<f64>>;
    type Params = PlacementParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "DistributeItems"
    }

    fn description(&self) -> &'static str {
        "Greedy placement of items on eligible cells at a minimum separation"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        distribute_items(&input, &params)
    }
}

/// Place items on the cells of `mask` equal to [`AVAILABLE`].
///
/// Points are returned in scan order, at cell centers in the mask's CRS.
/// No two points are closer than `params.separation`.
pub fn distribute_items(mask: &Raster<u8>, params: &PlacementParams) -> Result<Vec<Point<f64>>> {
    let separation = params.separation;
    if !separation.is_finite() || separation <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "separation",
            value: separation.to_string(),
            reason: "must be a finite, positive distance".to_string(),
        });
    }
    let cell = mask.cell_size();
    if cell.is_nan() || cell <= 0.0 {
        return Err(Error::Algorithm("mask has no valid cell size".to_string()));
    }

    let stamp = blocking_offsets(separation / cell);
    let (rows, cols) = mask.shape();
    let data = mask.data();
    let mut blocked = Array2::from_elem((rows, cols), false);
    let mut points = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            if data[(row, col)] != AVAILABLE || blocked[(row, col)] {
                continue;
            }
            let (x, y) = mask.pixel_to_geo(col, row);
            points.push(Point::new(x, y));

            for &(dr, dc) in &stamp {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols {
                    blocked[(r as usize, c as usize)] = true;
                }
            }
        }
    }

    debug!("Placed {} items at separation {}", points.len(), separation);
    Ok(points)
}

/// Offsets of the cells lying strictly closer than `radius` cells.
///
/// Only offsets that a later scan position can reach are kept: the rest of
/// the current row and every row below.
fn blocking_offsets(radius: f64) -> Vec<(isize, isize)> {
    let reach = radius.ceil() as isize;
    let r2 = radius * radius;
    let mut offsets = Vec::new();
    for dr in 0..=reach {
        for dc in -reach..=reach {
            if dr == 0 && dc <= 0 {
                continue;
            }
            if ((dr * dr + dc * dc) as f64) < r2 {
                offsets.push((dr, dc));
            }
        }
    }
    offsets
}
