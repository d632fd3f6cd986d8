use image::RgbaImage;

use crate::error::{Result, SplitError};

pub const DEFAULT_TOLERANCE: u8 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { rows: 4, cols: 4 }
    }
}

impl GridSpec {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Cell size for a `width`x`height` source. Trailing pixels that do not
    /// fill a whole cell are dropped.
    pub fn cell_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let invalid = |reason| SplitError::InvalidGridSpec {
            rows: self.rows,
            cols: self.cols,
            width,
            height,
            reason,
        };

        if self.rows == 0 || self.cols == 0 {
            return Err(invalid("rows and cols must be at least 1"));
        }

        let cell_width = width / self.cols;
        let cell_height = height / self.rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(invalid("grid is finer than the image, cells would be empty"));
        }

        Ok((cell_width, cell_height))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalConfig {
    pub enabled: bool,
    pub tolerance: u8,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RemovalConfig {
    pub fn enabled(tolerance: u8) -> Self {
        Self {
            enabled: true,
            tolerance,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    /// 1-based, row-major.
    pub index: usize,
    pub origin: (u32, u32),
    pub image: RgbaImage,
}

impl Tile {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
