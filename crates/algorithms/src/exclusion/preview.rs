//! PNG preview of an eligibility mask

use super::calculator::{AVAILABLE, OUTSIDE};
use image::{Rgba, RgbaImage};
use landex_core::Raster;

/// Longest side of a rendered preview, in pixels
pub const MAX_SIDE: usize = 2048;

const ELIGIBLE: Rgba<u8> = Rgba([46, 139, 87, 255]);
const EXCLUDED: Rgba<u8> = Rgba([170, 170, 170, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Render `mask` as RGBA: eligible green, excluded grey, outside transparent.
///
/// Masks larger than [`MAX_SIDE`] are downsampled by nearest neighbour.
pub fn render(mask: &Raster<u8>) -> RgbaImage {
    let (rows, cols) = mask.shape();
    let (width, height) = preview_size(rows, cols);
    let data = mask.data();

    RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        let col = (x as usize * cols) / width;
        let row = (y as usize * rows) / height;
        match data[(row, col)] {
            AVAILABLE => ELIGIBLE,
            OUTSIDE => TRANSPARENT,
            _ => EXCLUDED,
        }
    })
}

/// Output `(width, height)` keeping the aspect ratio within [`MAX_SIDE`]
fn preview_size(rows: usize, cols: usize) -> (usize, usize) {
    let longest = rows.max(cols);
    if longest <= MAX_SIDE {
        return (cols, rows);
    }
    let scale = |n: usize| ((n * MAX_SIDE) / longest).max(1);
    (scale(cols), scale(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::calculator::EXCLUDED as EXCLUDED_CELL;

    #[test]
    fn colors_by_cell_state() {
        let mut mask = Raster::filled(2, 3, AVAILABLE);
        mask.set(0, 1, EXCLUDED_CELL).unwrap();
        mask.set(1, 2, OUTSIDE).unwrap();

        let img = render(&mask);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(0, 0), ELIGIBLE);
        assert_eq!(*img.get_pixel(1, 0), EXCLUDED);
        assert_eq!(img.get_pixel(2, 1)[3], 0);
    }

    #[test]
    fn large_masks_are_downsampled() {
        assert_eq!(preview_size(100, 4096), (2048, 50));
        assert_eq!(preview_size(3000, 10), (6, 2048));
        assert_eq!(preview_size(5000, 1), (1, 2048));
    }
}
