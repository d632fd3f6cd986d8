use byteorder::{LittleEndian, ReadBytesExt};
use image::{Rgba, RgbaImage};
use std::io::Cursor;

use super::{BPP, DIB_HEADER_SIZE, DIR_ENTRY_SIZE, HEADER_SIZE, ICO_TYPE_CUR, and_mask_row_bytes, can_parse};
use crate::error::{Result, SplitError};
use crate::model::Hotspot;

#[derive(Debug, Clone)]
pub struct DecodedCursor {
    pub image: RgbaImage,
    pub hotspot: Hotspot,
    pub and_mask: Vec<u8>,
}

impl DecodedCursor {
    pub fn mask_is_clear(&self) -> bool {
        self.and_mask.iter().all(|&b| b == 0)
    }
}

#[derive(Debug)]
struct IconDirEntry {
    width: u8,
    height: u8,
    _color_count: u8,
    _reserved: u8,
    hotspot_x: u16,
    hotspot_y: u16,
    size_bytes: u32,
    offset: u32,
}

fn malformed(msg: impl Into<String>) -> SplitError {
    SplitError::MalformedCursor(msg.into())
}

/// Parses the first image of a 32bpp uncompressed `.cur` file.
pub fn decode(data: &[u8]) -> Result<DecodedCursor> {
    if !can_parse(data) {
        return Err(malformed("missing cursor magic"));
    }
    if data.len() < (HEADER_SIZE + DIR_ENTRY_SIZE) as usize {
        return Err(malformed(format!(
            "{} bytes is too short for the cursor header",
            data.len()
        )));
    }

    let mut cursor = Cursor::new(data);
    let reserved = cursor.read_u16::<LittleEndian>()?;
    let ico_type = cursor.read_u16::<LittleEndian>()?;
    let image_count = cursor.read_u16::<LittleEndian>()?;

    if reserved != 0 {
        return Err(malformed("invalid reserved field in cursor header"));
    }
    if ico_type != ICO_TYPE_CUR {
        return Err(malformed(format!("type {} is not a cursor", ico_type)));
    }
    if image_count == 0 {
        return Err(malformed("cursor contains no images"));
    }

    let entry = read_dir_entry(&mut cursor)?;

    let offset = entry.offset as usize;
    let end = offset
        .checked_add(entry.size_bytes as usize)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| malformed("image data extends beyond file bounds"))?;

    let (image, and_mask) = parse_dib(&data[offset..end])?;

    // directory sizes are stored mod 256
    if image.width() % 256 != entry.width as u32 || image.height() % 256 != entry.height as u32 {
        return Err(malformed(format!(
            "directory entry says {}x{}, bitmap is {}x{}",
            entry.width,
            entry.height,
            image.width(),
            image.height()
        )));
    }

    Ok(DecodedCursor {
        image,
        hotspot: Hotspot::new(entry.hotspot_x as u32, entry.hotspot_y as u32),
        and_mask,
    })
}

fn read_dir_entry(cursor: &mut Cursor<&[u8]>) -> Result<IconDirEntry> {
    Ok(IconDirEntry {
        width: cursor.read_u8()?,
        height: cursor.read_u8()?,
        _color_count: cursor.read_u8()?,
        _reserved: cursor.read_u8()?,
        hotspot_x: cursor.read_u16::<LittleEndian>()?,
        hotspot_y: cursor.read_u16::<LittleEndian>()?,
        size_bytes: cursor.read_u32::<LittleEndian>()?,
        offset: cursor.read_u32::<LittleEndian>()?,
    })
}

fn parse_dib(dib: &[u8]) -> Result<(RgbaImage, Vec<u8>)> {
    if dib.len() < DIB_HEADER_SIZE as usize {
        return Err(malformed("bitmap header is truncated"));
    }

    let mut cursor = Cursor::new(dib);

    let header_size = cursor.read_u32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let double_height = cursor.read_i32::<LittleEndian>()?;
    let _planes = cursor.read_u16::<LittleEndian>()?;
    let bits_per_pixel = cursor.read_u16::<LittleEndian>()?;
    let compression = cursor.read_u32::<LittleEndian>()?;

    if header_size != DIB_HEADER_SIZE {
        return Err(malformed(format!("unsupported DIB header size {}", header_size)));
    }
    if bits_per_pixel != BPP || compression != 0 {
        return Err(malformed(format!(
            "only uncompressed 32bpp bitmaps are supported, got {}bpp compression {}",
            bits_per_pixel, compression
        )));
    }
    if width <= 0 || double_height <= 0 || double_height % 2 != 0 {
        return Err(malformed(format!(
            "bad bitmap dimensions {}x{}",
            width, double_height
        )));
    }

    let width = width as u32;
    let height = (double_height / 2) as u32;
    let pixel_bytes = width as usize * height as usize * 4;
    let mask_bytes = and_mask_row_bytes(width) * height as usize;

    let pixels_start = DIB_HEADER_SIZE as usize;
    let mask_start = pixels_start + pixel_bytes;
    if dib.len() < mask_start + mask_bytes {
        return Err(malformed("bitmap data is truncated"));
    }

    let mut image = RgbaImage::new(width, height);
    for (i, bgra) in dib[pixels_start..mask_start].chunks_exact(4).enumerate() {
        let x = i as u32 % width;
        let y = height - 1 - i as u32 / width;
        image.put_pixel(x, y, Rgba([bgra[2], bgra[1], bgra[0], bgra[3]]));
    }

    Ok((image, dib[mask_start..mask_start + mask_bytes].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::cur::encode;

    #[test]
    fn test_round_trip_recovers_pixels_and_hotspot() {
        let img = RgbaImage::from_fn(37, 5, |x, y| {
            Rgba([x as u8 * 3, y as u8 * 40, (x + y) as u8, if x % 2 == 0 { 0 } else { 255 }])
        });
        let data = encode(&img, Hotspot::new(36, 4)).unwrap();
        let decoded = decode(&data).unwrap();

        assert_eq!(decoded.image.dimensions(), (37, 5));
        assert_eq!(decoded.hotspot, Hotspot::new(36, 4));
        assert_eq!(decoded.image, img);
        assert_eq!(decoded.and_mask.len(), 8 * 5);
        assert!(decoded.mask_is_clear());
    }

    #[test]
    fn test_rejects_icon_type() {
        let img = RgbaImage::new(2, 2);
        let mut data = encode(&img, Hotspot::default()).unwrap();
        data[2] = 1;
        assert!(matches!(decode(&data), Err(SplitError::MalformedCursor(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let img = RgbaImage::new(4, 4);
        let data = encode(&img, Hotspot::default()).unwrap();
        assert!(matches!(
            decode(&data[..data.len() - 1]),
            Err(SplitError::MalformedCursor(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_header() {
        for len in [4, 5, 6, 21] {
            let mut data = vec![0, 0, 2, 0, 1, 0];
            data.resize(len.max(6), 0);
            data.truncate(len);
            assert!(
                matches!(decode(&data), Err(SplitError::MalformedCursor(_))),
                "{} bytes",
                len
            );
        }
    }

    #[test]
    fn test_rejects_nonzero_reserved() {
        let img = RgbaImage::new(2, 2);
        let mut data = encode(&img, Hotspot::default()).unwrap();
        data[1] = 1;
        assert!(matches!(decode(&data), Err(SplitError::MalformedCursor(_))));
    }

    #[test]
    fn test_rejects_short_bitmap_header() {
        let img = RgbaImage::new(2, 2);
        let mut data = encode(&img, Hotspot::default()).unwrap();
        data[14..18].copy_from_slice(&10u32.to_le_bytes());
        assert!(matches!(decode(&data), Err(SplitError::MalformedCursor(_))));
    }
}
