use image::ImageFormat;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::CursorArtifact;

pub const MANIFEST_NAME: &str = "cursors.conf";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub write_png: bool,
    pub write_manifest: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            write_png: true,
            write_manifest: true,
        }
    }
}

pub fn format_manifest_line(artifact: &CursorArtifact) -> String {
    let hotspot = artifact.hotspot();
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        artifact.index,
        artifact.width(),
        artifact.height(),
        hotspot.x,
        hotspot.y,
        artifact.filename
    )
}

pub fn write_manifest(path: &Path, artifacts: &[CursorArtifact]) -> Result<()> {
    let mut file = fs::File::create(path)?;
    writeln!(file, "#index\twidth\theight\txhot\tyhot\tfile")?;
    for artifact in artifacts {
        writeln!(file, "{}", format_manifest_line(artifact))?;
    }
    Ok(())
}

/// Writes every `.cur` payload, plus PNG previews and a hotspot manifest when
/// enabled. Returns the paths written, in tile order.
pub fn write_artifacts(
    artifacts: &[CursorArtifact],
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for artifact in artifacts {
        let cur_path = output_dir.join(&artifact.filename);
        fs::write(&cur_path, artifact.payload())?;
        written.push(cur_path);

        if options.write_png {
            let png_path = output_dir.join(artifact.raster_filename());
            artifact.image().save_with_format(&png_path, ImageFormat::Png)?;
            written.push(png_path);
        }
    }

    if options.write_manifest && !artifacts.is_empty() {
        let manifest_path = output_dir.join(MANIFEST_NAME);
        write_manifest(&manifest_path, artifacts)?;
        written.push(manifest_path);
    }

    log::info!("Wrote {} files to {}", written.len(), output_dir.display());
    Ok(written)
}
