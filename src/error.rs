use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("invalid grid {rows}x{cols} for a {width}x{height} image: {reason}")]
    InvalidGridSpec {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("invalid pixel buffer: {0}")]
    InvalidPixelBuffer(String),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cursor encoding invariant violated: {0}")]
    EncodingInvariant(String),

    #[error("hotspot ({x}, {y}) is outside the {width}x{height} cursor")]
    HotspotOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("malformed cursor file: {0}")]
    MalformedCursor(String),

    #[error("no tile with index {0}")]
    UnknownTile(usize),

    #[error("split cancelled after {completed} of {total} tiles")]
    Cancelled { completed: usize, total: usize },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
