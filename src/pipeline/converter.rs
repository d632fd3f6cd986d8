// Sprite sheet to cursor set: slice, strip background, pick hotspots, encode.

use image::RgbaImage;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::background::remove_background;
use super::hotspot::HotspotPolicy;
use super::slicer;
use crate::error::{Result, SplitError};
use crate::model::{CursorArtifact, GridSpec, Hotspot, RemovalConfig, Tile};

#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    pub grid: GridSpec,
    pub removal: RemovalConfig,
    pub hotspots: HotspotPolicy,
    /// 0 lets rayon pick.
    pub thread_count: usize,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SplitOptions {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn with_removal(mut self, removal: RemovalConfig) -> Self {
        self.removal = removal;
        self
    }

    pub fn with_hotspot_policy(mut self, policy: HotspotPolicy) -> Self {
        self.hotspots = policy;
        self
    }

    pub fn with_thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

pub fn process(
    source: &RgbaImage,
    grid: GridSpec,
    removal: RemovalConfig,
) -> Result<Vec<CursorArtifact>> {
    process_with_options(source, &SplitOptions::new(grid).with_removal(removal))
}

pub fn process_with_options(
    source: &RgbaImage,
    options: &SplitOptions,
) -> Result<Vec<CursorArtifact>> {
    process_with_progress(source, options, |_, _| {})
}

/// Runs every tile through the pipeline on a rayon pool. Output is in tile
/// index order regardless of scheduling. `progress(0, total)` is called once
/// the grid has been sliced, then `progress(done, total)` from worker threads
/// as tiles finish.
pub fn process_with_progress<F>(
    source: &RgbaImage,
    options: &SplitOptions,
    progress: F,
) -> Result<Vec<CursorArtifact>>
where
    F: Fn(usize, usize) + Sync,
{
    let tiles = slicer::slice(source, options.grid)?;
    let total = tiles.len();
    let completed = AtomicUsize::new(0);
    progress(0, total);

    log::info!(
        "Splitting {}x{} image into {} cursors (background removal: {})",
        source.width(),
        source.height(),
        total,
        if options.removal.enabled {
            format!("tolerance {}", options.removal.tolerance)
        } else {
            "off".to_string()
        }
    );

    let run = || {
        tiles
            .into_par_iter()
            .map(|tile| {
                if options.is_cancelled() {
                    return Ok(None);
                }
                let artifact = process_tile(tile, options)?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                progress(done, total);
                Ok(Some(artifact))
            })
            .collect::<Result<Vec<Option<CursorArtifact>>>>()
    };

    let results = if options.thread_count > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.thread_count)
            .build()?
            .install(run)?
    } else {
        run()?
    };

    let artifacts: Vec<CursorArtifact> = results.into_iter().flatten().collect();
    if artifacts.len() < total {
        log::warn!("Split cancelled with {} of {} tiles done", artifacts.len(), total);
        return Err(SplitError::Cancelled {
            completed: artifacts.len(),
            total,
        });
    }

    Ok(artifacts)
}

fn process_tile(mut tile: Tile, options: &SplitOptions) -> Result<CursorArtifact> {
    if options.removal.enabled {
        let cleared = remove_background(&mut tile.image, options.removal.tolerance);
        log::debug!("Tile {}: cleared {} background pixels", tile.index, cleared);
    }

    let hotspot = options
        .hotspots
        .assign(tile.index, tile.width(), tile.height());

    CursorArtifact::new(tile.index, tile.image, hotspot)
}

/// Decodes an image file and splits it.
pub fn split_file(path: &Path, options: &SplitOptions) -> Result<Vec<CursorArtifact>> {
    let source = image::open(path)
        .map_err(|source| SplitError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    process_with_options(&source, options)
}

/// Moves hotspots of already encoded cursors; only the encoder runs again.
pub fn apply_hotspot_edits(
    artifacts: &mut [CursorArtifact],
    edits: &[(usize, Hotspot)],
) -> Result<()> {
    for &(index, hotspot) in edits {
        let artifact = artifacts
            .iter_mut()
            .find(|a| a.index == index)
            .ok_or(SplitError::UnknownTile(index))?;
        artifact.set_hotspot(hotspot)?;
        log::info!(
            "Moved hotspot of {} to ({}, {})",
            artifact.filename, hotspot.x, hotspot.y
        );
    }
    Ok(())
}
