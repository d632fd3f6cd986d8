pub mod background;
pub mod converter;
pub mod cur;
pub mod export;
pub mod hotspot;
pub mod slicer;

pub use converter::{SplitOptions, apply_hotspot_edits, process, process_with_options, split_file};
pub use hotspot::{HotspotPolicy, HotspotRule};

#[cfg(test)]
mod pipeline_test;
