// Windows .cur container: single image, 32bpp BGRA with a zeroed AND mask.

pub mod reader;
pub mod writer;

pub use reader::{DecodedCursor, decode};
pub use writer::encode;

pub const ICO_TYPE_CUR: u16 = 2;
pub const HEADER_SIZE: u32 = 6;
pub const DIR_ENTRY_SIZE: u32 = 16;
pub const DIB_HEADER_SIZE: u32 = 40;
pub const BPP: u16 = 32;

const MAGIC: &[u8] = &[0x00, 0x00, 0x02, 0x00];

pub fn can_parse(data: &[u8]) -> bool {
    data.len() >= 4 && &data[0..4] == MAGIC
}

/// AND mask row length: one bit per pixel, padded to a 4-byte boundary.
pub fn and_mask_row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(32) * 4
}
