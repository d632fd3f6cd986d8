pub mod cursor;
pub mod grid;
pub mod pixel;

pub use cursor::{CursorArtifact, Hotspot};
pub use grid::{GridSpec, RemovalConfig, Tile};
pub use pixel::PixelBuffer;
