//! Boolean mask growth (buffering)
//!
//! Grows a hit mask by a Euclidean radius measured between cell centers:
//! an output cell is hit when its center lies within `radius` cells of the
//! center of any input hit cell. Only edge cells (hit cells with at least one
//! un-hit 8-neighbour) need to scatter their disk, since the nearest hit cell
//! to any un-hit cell is always an edge cell.

use crate::maybe_rayon::*;
use landex_core::{Algorithm, Error, Result};
use ndarray::{s, Array2};

/// Parameters for mask growth
#[derive(Debug, Clone, Default)]
pub struct GrowParams {
    /// Radius in cells (map distance divided by pixel size)
    pub radius: f64,
}

/// Mask growth algorithm
#[derive(Debug, Clone, Default)]
pub struct Grow;

impl Algorithm for Grow {
    type Input = Array2<bool>;
    type Output = Array2<bool>;
    type Params = GrowParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Grow"
    }

    fn description(&self) -> &'static str {
        "Grow a boolean mask by a Euclidean radius between cell centers"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        grow(&input, params.radius)
    }
}

/// Offsets `(dr, dc)` of every cell whose center lies within `radius` cells
pub fn disk_offsets(radius: f64) -> Vec<(isize, isize)> {
    let reach = radius.floor() as isize;
    let r2 = radius * radius;
    let mut offsets = Vec::new();
    for dr in -reach..=reach {
        for dc in -reach..=reach {
            if ((dr * dr + dc * dc) as f64) <= r2 {
                offsets.push((dr, dc));
            }
        }
    }
    offsets
}

/// Grow `mask` by `radius` cells.
///
/// A radius below one cell leaves the mask unchanged. Hits never spill past
/// the array, so callers that need features just outside the grid should pad
/// first (see [`pad_cells`] and [`crop`]).
pub fn grow(mask: &Array2<bool>, radius: f64) -> Result<Array2<bool>> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::InvalidParameter {
            name: "radius",
            value: radius.to_string(),
            reason: "must be a finite, non-negative number of cells".to_string(),
        });
    }
    if radius < 1.0 {
        return Ok(mask.clone());
    }

    let (rows, cols) = mask.dim();
    let edges: Vec<(usize, usize)> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .filter(|&col| mask[(row, col)] && is_edge(mask, row, col))
                .map(|col| (row, col))
                .collect::<Vec<_>>()
        })
        .collect();

    let offsets = disk_offsets(radius);
    let mut out = mask.clone();
    for (row, col) in edges {
        for &(dr, dc) in &offsets {
            let r = row as isize + dr;
            let c = col as isize + dc;
            if r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols {
                out[(r as usize, c as usize)] = true;
            }
        }
    }
    Ok(out)
}

/// Whether a hit cell touches an un-hit cell or the array border
fn is_edge(mask: &Array2<bool>, row: usize, col: usize) -> bool {
    let (rows, cols) = mask.dim();
    if row == 0 || col == 0 || row + 1 == rows || col + 1 == cols {
        return true;
    }
    for r in row - 1..=row + 1 {
        for c in col - 1..=col + 1 {
            if !mask[(r, c)] {
                return true;
            }
        }
    }
    false
}

/// Cells of padding needed so features within `radius` of the grid still count
pub fn pad_cells(radius: f64) -> usize {
    if radius.is_finite() && radius >= 1.0 {
        radius.ceil() as usize
    } else {
        0
    }
}

/// Cut the `rows` x `cols` interior back out of a grid padded by `pad`
pub fn crop(padded: &Array2<bool>, pad: usize, rows: usize, cols: usize) -> Array2<bool> {
    padded.slice(s![pad..pad + rows, pad..pad + cols]).to_owned()
}
