use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use sprite2cur::config::Config;
use sprite2cur::event::SplitMsg;
use sprite2cur::model::Hotspot;
use sprite2cur::pipeline::export::write_artifacts;
use sprite2cur::pipeline::{apply_hotspot_edits, cur};
use sprite2cur::pipeline_worker::SplitWorker;

#[derive(Parser)]
#[command(name = "sprite2cur", version, about = "Slice a sprite sheet into Windows .cur cursors")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a sprite sheet into cursor_NN.cur files
    Split {
        image: PathBuf,

        /// TOML config with defaults for the flags below
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        rows: Option<u32>,

        #[arg(long)]
        cols: Option<u32>,

        /// Flood fill the background from the top-left pixel of each tile
        #[arg(long)]
        remove_bg: bool,

        /// Colour distance (0-255) still treated as background
        #[arg(long)]
        tolerance: Option<u8>,

        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long)]
        threads: Option<usize>,

        /// Skip the PNG previews
        #[arg(long)]
        no_png: bool,

        /// Override a hotspot, as INDEX:X:Y (repeatable)
        #[arg(long = "hotspot", value_parser = parse_hotspot_edit)]
        hotspots: Vec<(usize, Hotspot)>,
    },

    /// Move the hotspot of an existing cursor file
    Hotspot {
        file: PathBuf,
        x: u32,
        y: u32,

        /// Clamp into the image instead of failing
        #[arg(long)]
        clamp: bool,
    },

    /// Print size and hotspot of a cursor file
    Inspect { file: PathBuf },

    /// Write the default config to a file
    InitConfig { path: PathBuf },
}

fn parse_hotspot_edit(s: &str) -> std::result::Result<(usize, Hotspot), String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [index, x, y] = parts.as_slice() else {
        return Err(format!("expected INDEX:X:Y, got '{}'", s));
    };
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("'{}': {}", v, e));

    let index = parse(*index)? as usize;
    if index == 0 {
        return Err("tile indices start at 1".to_string());
    }
    Ok((index, Hotspot::new(parse(*x)?, parse(*y)?)))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Split {
            image,
            config,
            rows,
            cols,
            remove_bg,
            tolerance,
            out,
            threads,
            no_png,
            hotspots,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load_from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => Config::default(),
            };
            cfg.rows = rows.unwrap_or(cfg.rows);
            cfg.cols = cols.unwrap_or(cfg.cols);
            cfg.remove_background |= remove_bg;
            cfg.tolerance = tolerance.unwrap_or(cfg.tolerance);
            cfg.output_dir = out.unwrap_or(cfg.output_dir);
            cfg.thread_count = threads.unwrap_or(cfg.thread_count);
            cfg.write_png &= !no_png;

            split(&image, &cfg, &hotspots)
        }
        Command::Hotspot { file, x, y, clamp } => set_hotspot(&file, Hotspot::new(x, y), clamp),
        Command::Inspect { file } => inspect(&file),
        Command::InitConfig { path } => {
            Config::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn split(image: &Path, cfg: &Config, edits: &[(usize, Hotspot)]) -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let worker = SplitWorker::new(tx);
    let handle = worker.start_split_file(image.to_path_buf(), cfg.split_options());
    drop(worker);

    let mut artifacts = None;
    for msg in rx {
        match msg {
            SplitMsg::Started(total) => log::info!("Processing {} tiles", total),
            SplitMsg::Progress(done, total) => log::debug!("{}/{} tiles encoded", done, total),
            SplitMsg::LogMessage(line) => log::info!("{}", line),
            SplitMsg::Completed(result) => artifacts = Some(result),
            SplitMsg::Failed(e) => bail!("Failed to split {}: {}", image.display(), e),
        }
    }
    let _ = handle.join();

    let mut artifacts = artifacts.context("Worker exited without a result")?;
    apply_hotspot_edits(&mut artifacts, edits)?;

    write_artifacts(&artifacts, &cfg.output_dir, &cfg.export_options())
        .with_context(|| format!("Failed to write cursors to {}", cfg.output_dir.display()))?;

    for artifact in &artifacts {
        let hotspot = artifact.hotspot();
        println!(
            "{}  {}x{}  hotspot ({}, {})",
            artifact.filename,
            artifact.width(),
            artifact.height(),
            hotspot.x,
            hotspot.y
        );
    }
    Ok(())
}

fn set_hotspot(file: &Path, hotspot: Hotspot, clamp: bool) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let decoded = cur::decode(&data).with_context(|| format!("Failed to parse {}", file.display()))?;

    let (width, height) = decoded.image.dimensions();
    let hotspot = if clamp {
        hotspot.clamp(width, height)
    } else {
        hotspot.validate(width, height)?
    };

    let encoded = cur::encode(&decoded.image, hotspot)?;
    fs::write(file, encoded).with_context(|| format!("Failed to write {}", file.display()))?;
    log::info!(
        "Hotspot of {} moved from ({}, {}) to ({}, {})",
        file.display(),
        decoded.hotspot.x,
        decoded.hotspot.y,
        hotspot.x,
        hotspot.y
    );
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let decoded = cur::decode(&data).with_context(|| format!("Failed to parse {}", file.display()))?;
    let transparent = decoded.image.pixels().filter(|p| p[3] == 0).count();

    println!("{}", file.display());
    println!("  size:        {}x{}", decoded.image.width(), decoded.image.height());
    println!("  hotspot:     ({}, {})", decoded.hotspot.x, decoded.hotspot.y);
    println!("  transparent: {} px", transparent);
    println!("  AND mask:    {}", if decoded.mask_is_clear() { "clear" } else { "set" });
    Ok(())
}
