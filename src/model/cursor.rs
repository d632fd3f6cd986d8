use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::error::{Result, SplitError};
use crate::pipeline::cur;

pub const CURSOR_EXTENSION: &str = "cur";
pub const RASTER_EXTENSION: &str = "png";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hotspot {
    pub x: u32,
    pub y: u32,
}

impl Hotspot {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Rejects a hotspot that does not fall inside `[0, width) x [0, height)`.
    pub fn validate(self, width: u32, height: u32) -> Result<Self> {
        if self.x < width && self.y < height {
            Ok(self)
        } else {
            Err(SplitError::HotspotOutOfBounds {
                x: self.x,
                y: self.y,
                width,
                height,
            })
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Self {
        Self {
            x: self.x.min(width.saturating_sub(1)),
            y: self.y.min(height.saturating_sub(1)),
        }
    }
}

pub fn cursor_filename(index: usize) -> String {
    format!("cursor_{:02}.{}", index, CURSOR_EXTENSION)
}

pub fn raster_filename(index: usize) -> String {
    format!("cursor_{:02}.{}", index, RASTER_EXTENSION)
}

/// One encoded cursor. Owns the tile pixels it was built from so the payload
/// can be rebuilt after a hotspot edit without slicing again.
#[derive(Clone, Debug)]
pub struct CursorArtifact {
    pub index: usize,
    pub filename: String,
    payload: Vec<u8>,
    image: RgbaImage,
    hotspot: Hotspot,
}

impl CursorArtifact {
    pub fn new(index: usize, image: RgbaImage, hotspot: Hotspot) -> Result<Self> {
        let payload = cur::encode(&image, hotspot)?;
        Ok(Self {
            index,
            filename: cursor_filename(index),
            payload,
            image,
            hotspot,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn hotspot(&self) -> Hotspot {
        self.hotspot
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Moves the hotspot and re-encodes the payload. The previous payload is
    /// kept if the new hotspot is rejected.
    pub fn set_hotspot(&mut self, hotspot: Hotspot) -> Result<()> {
        let hotspot = hotspot.validate(self.width(), self.height())?;
        self.payload = cur::encode(&self.image, hotspot)?;
        self.hotspot = hotspot;
        Ok(())
    }

    pub fn raster_filename(&self) -> String {
        raster_filename(self.index)
    }

    /// Lossless PNG rendition of the same pixels, for previews.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}
