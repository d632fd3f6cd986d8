// Pixel buffer helpers. A pixel buffer is a plain `RgbaImage`: row-major,
// four u8 channels per pixel.

use image::RgbaImage;

use crate::error::{Result, SplitError};

pub type PixelBuffer = RgbaImage;

pub fn from_raw_rgba(width: u32, height: u32, samples: Vec<u8>) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SplitError::InvalidPixelBuffer(format!(
            "dimensions must be positive, got {}x{}",
            width, height
        )));
    }

    let expected = width as usize * height as usize * 4;
    if samples.len() != expected {
        return Err(SplitError::InvalidPixelBuffer(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            expected,
            width,
            height,
            samples.len()
        )));
    }

    RgbaImage::from_raw(width, height, samples)
        .ok_or_else(|| SplitError::InvalidPixelBuffer("buffer rejected by image".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rgba() {
        let buffer = from_raw_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(buffer.get_pixel(1, 0).0, [5, 6, 7, 8]);
    }

    #[test]
    fn test_from_raw_rgba_rejects_bad_length() {
        assert!(matches!(
            from_raw_rgba(2, 2, vec![0; 15]),
            Err(SplitError::InvalidPixelBuffer(_))
        ));
        assert!(from_raw_rgba(0, 2, Vec::new()).is_err());
    }
}
