use byteorder::{LittleEndian, WriteBytesExt};
use image::RgbaImage;
use std::io::Write;

use super::{BPP, DIB_HEADER_SIZE, DIR_ENTRY_SIZE, HEADER_SIZE, ICO_TYPE_CUR, and_mask_row_bytes};
use crate::error::{Result, SplitError};
use crate::model::Hotspot;

/// Serializes a single-image 32bpp `.cur` file.
///
/// Layout: ICONDIR (6) | ICONDIRENTRY (16) | BITMAPINFOHEADER (40) |
/// bottom-up BGRA pixels | zeroed AND mask.
pub fn encode(image: &RgbaImage, hotspot: Hotspot) -> Result<Vec<u8>> {
    let width = image.width();
    let height = image.height();

    if width == 0 || height == 0 {
        return Err(SplitError::EncodingInvariant(format!(
            "cannot encode an empty {}x{} image",
            width, height
        )));
    }

    let hotspot_x = u16::try_from(hotspot.x).map_err(|_| {
        SplitError::EncodingInvariant(format!("hotspot x {} does not fit in 16 bits", hotspot.x))
    })?;
    let hotspot_y = u16::try_from(hotspot.y).map_err(|_| {
        SplitError::EncodingInvariant(format!("hotspot y {} does not fit in 16 bits", hotspot.y))
    })?;

    let dib_width = i32::try_from(width)
        .map_err(|_| SplitError::EncodingInvariant(format!("width {} overflows i32", width)))?;
    let dib_height = height
        .checked_mul(2)
        .and_then(|h| i32::try_from(h).ok())
        .ok_or_else(|| {
            SplitError::EncodingInvariant(format!("doubled height {} overflows i32", height))
        })?;

    let pixel_bytes = width as usize * height as usize * 4;
    let mask_bytes = and_mask_row_bytes(width) * height as usize;
    let data_size = DIB_HEADER_SIZE as usize + pixel_bytes + mask_bytes;
    let data_size_field = u32::try_from(data_size).map_err(|_| {
        SplitError::EncodingInvariant(format!("image data size {} overflows u32", data_size))
    })?;
    let data_offset = HEADER_SIZE + DIR_ENTRY_SIZE;

    let mut output = Vec::with_capacity(data_offset as usize + data_size);

    // ICONDIR
    output.write_u16::<LittleEndian>(0)?; // reserved
    output.write_u16::<LittleEndian>(ICO_TYPE_CUR)?;
    output.write_u16::<LittleEndian>(1)?; // image count

    // ICONDIRENTRY, 0 in the size bytes means 256
    output.write_u8((width % 256) as u8)?;
    output.write_u8((height % 256) as u8)?;
    output.write_u8(0)?; // palette colors
    output.write_u8(0)?; // reserved
    output.write_u16::<LittleEndian>(hotspot_x)?;
    output.write_u16::<LittleEndian>(hotspot_y)?;
    output.write_u32::<LittleEndian>(data_size_field)?;
    output.write_u32::<LittleEndian>(data_offset)?;

    // BITMAPINFOHEADER, height counts the XOR image and the AND mask
    output.write_u32::<LittleEndian>(DIB_HEADER_SIZE)?;
    output.write_i32::<LittleEndian>(dib_width)?;
    output.write_i32::<LittleEndian>(dib_height)?;
    output.write_u16::<LittleEndian>(1)?; // planes
    output.write_u16::<LittleEndian>(BPP)?;
    output.write_u32::<LittleEndian>(0)?; // BI_RGB
    output.write_u32::<LittleEndian>(0)?; // image size, unset for BI_RGB
    output.write_i32::<LittleEndian>(0)?; // x pixels per meter
    output.write_i32::<LittleEndian>(0)?; // y pixels per meter
    output.write_u32::<LittleEndian>(0)?; // colors used
    output.write_u32::<LittleEndian>(0)?; // important colors

    write_bgra_bottom_up(image, &mut output)?;

    // Alpha carries transparency, the mask is all zeros.
    output.resize(output.len() + mask_bytes, 0);

    let expected = data_offset as usize + data_size;
    if output.len() != expected {
        return Err(SplitError::EncodingInvariant(format!(
            "wrote {} bytes but header declares {}",
            output.len(),
            expected
        )));
    }

    Ok(output)
}

fn write_bgra_bottom_up<W: Write>(image: &RgbaImage, out: &mut W) -> Result<()> {
    for row in image.rows().rev() {
        for pixel in row {
            let [r, g, b, a] = pixel.0;
            out.write_all(&[b, g, r, a])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn u16_at(data: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([data[offset], data[offset + 1]])
    }

    fn u32_at(data: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_two_by_two_red_layout() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let data = encode(&img, Hotspot::new(1, 1)).unwrap();

        assert_eq!(data.len(), 86);
        assert_eq!(&data[0..6], &[0, 0, 2, 0, 1, 0]);
        assert_eq!(data[6], 2);
        assert_eq!(data[7], 2);
        assert_eq!(data[8], 0);
        assert_eq!(data[9], 0);
        assert_eq!(u16_at(&data, 10), 1);
        assert_eq!(u16_at(&data, 12), 1);
        assert_eq!(u32_at(&data, 14), 40 + 16 + 8);
        assert_eq!(u32_at(&data, 18), 22);

        assert_eq!(u32_at(&data, 22), 40);
        assert_eq!(u32_at(&data, 26), 2);
        assert_eq!(u32_at(&data, 30), 4);
        assert_eq!(u16_at(&data, 34), 1);
        assert_eq!(u16_at(&data, 36), 32);
        assert!(data[38..62].iter().all(|&b| b == 0));

        for px in data[62..78].chunks(4) {
            assert_eq!(px, &[0, 0, 255, 255]);
        }
        assert!(data[78..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rows_written_bottom_up() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(0, 1, Rgba([5, 6, 7, 8]));

        let data = encode(&img, Hotspot::default()).unwrap();
        assert_eq!(&data[62..66], &[7, 6, 5, 8]);
        assert_eq!(&data[66..70], &[3, 2, 1, 4]);
    }

    #[test]
    fn test_size_field_matches_payload() {
        for (w, h) in [(1, 1), (31, 7), (32, 32), (33, 5), (64, 17)] {
            let img = RgbaImage::new(w, h);
            let data = encode(&img, Hotspot::default()).unwrap();
            let mask = ((w as usize + 31) / 32) * 4 * h as usize;
            let size = 40 + (w * h * 4) as usize + mask;

            assert_eq!(u32_at(&data, 14) as usize, size, "{}x{}", w, h);
            assert_eq!(u32_at(&data, 18), 22);
            assert_eq!(data.len(), 22 + size);
        }
    }

    #[test]
    fn test_256_wide_encodes_as_zero() {
        let img = RgbaImage::new(256, 1);
        let data = encode(&img, Hotspot::default()).unwrap();
        assert_eq!(data[6], 0);
        assert_eq!(data[7], 1);
        assert_eq!(u32_at(&data, 26), 256);
    }

    #[test]
    fn test_hotspot_wider_than_u16_rejected() {
        let img = RgbaImage::new(1, 1);
        let err = encode(&img, Hotspot::new(70_000, 0)).unwrap_err();
        assert!(matches!(err, SplitError::EncodingInvariant(_)));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let img = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8, y as u8, 9, 200]));
        let a = encode(&img, Hotspot::new(4, 2)).unwrap();
        let b = encode(&img, Hotspot::new(4, 2)).unwrap();
        assert_eq!(a, b);
    }
}
