use image::{GenericImageView, RgbaImage};

use crate::error::Result;
use crate::model::{GridSpec, Tile};

/// Cuts `source` into `rows * cols` equally sized tiles in row-major order.
///
/// Each tile owns a copy of its pixels. When the image size is not a multiple
/// of the grid, the trailing columns and rows are left out of every tile.
pub fn slice(source: &RgbaImage, grid: GridSpec) -> Result<Vec<Tile>> {
    let (cell_width, cell_height) = grid.cell_size(source.width(), source.height())?;

    let mut tiles = Vec::with_capacity(grid.tile_count());
    let mut index = 0;

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            index += 1;
            let left = col * cell_width;
            let top = row * cell_height;

            tiles.push(Tile {
                index,
                origin: (left, top),
                image: source.view(left, top, cell_width, cell_height).to_image(),
            });
        }
    }

    log::debug!(
        "Sliced {}x{} image into {} tiles of {}x{}",
        source.width(),
        source.height(),
        tiles.len(),
        cell_width,
        cell_height
    );

    Ok(tiles)
}
