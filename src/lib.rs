// Library exports for sprite2cur

pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod pipeline;
pub mod pipeline_worker;

pub use error::{Result, SplitError};
pub use model::{CursorArtifact, GridSpec, Hotspot, PixelBuffer, RemovalConfig, Tile};
pub use pipeline::{
    HotspotPolicy,
    HotspotRule,
    SplitOptions,
    process,
};
