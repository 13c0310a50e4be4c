//! Perceptual Fingerprint CLI
//!
//! Command-line front end for fingerprinting, comparing and resizing
//! image files.

use clap::{Parser, Subcommand};
use image::{ExtendedColorType, ImageFormat};
use perceptual_fingerprint::{
    buffer::{CanonicalImageBuffer, ChannelOrder},
    config::{ConfigError, FileConfig},
    decode::{DecodeError, Decoder},
    resize, Fingerprinter, PerceptualHash, ResizeTarget,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "perceptual-fingerprint",
    version,
    about = "Perceptual hashing and resizing for image files"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Always use the tolerant decoder
    #[arg(long, global = true)]
    robust: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SHA-256 and perceptual hash of image files
    Hash {
        /// Files or directories to hash
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Print the Hamming distance between two images
    Compare { first: PathBuf, second: PathBuf },

    /// Shrink an image to fit within a box
    Thumbnail {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },

    /// Scale an image to an exact size for display
    Zoom {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Media type selecting the quality preference (default: guessed from input)
        #[arg(long)]
        mime: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("{failed} of {total} files could not be hashed")]
    Incomplete { failed: usize, total: usize },
}

#[derive(Serialize)]
struct HashRecord<'a> {
    path: &'a Path,
    sha256: String,
    phash: PerceptualHash,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if cli.robust {
        config.decode.prefer_robust_decoder = true;
    }
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Hash {
            paths,
            recursive,
            json,
        } => hash_files(&config, &paths, recursive, json),
        Command::Compare { first, second } => compare(&config, &first, &second),
        Command::Thumbnail {
            input,
            output,
            width,
            height,
        } => {
            let target = target(width, height)?;
            let buffer = Decoder::new(config.decode).decode(&input)?;
            let out = resize::thumbnail(&buffer, target);
            info!(
                "thumbnail {}x{} -> {}x{}",
                buffer.width(),
                buffer.height(),
                out.width(),
                out.height()
            );
            save(&out, &output)
        }
        Command::Zoom {
            input,
            output,
            width,
            height,
            mime,
        } => {
            let target = target(width, height)?;
            let mime = mime.unwrap_or_else(|| guess_mime(&input));
            let quality = config.zoom.for_mime(&mime);
            let buffer = Decoder::new(config.decode).decode(&input)?;
            let out = resize::zoom(&buffer, target, quality);
            info!(
                %mime,
                scale_up = %quality.scale_up,
                scale_down = %quality.scale_down,
                "zoom {}x{} -> {}x{}",
                buffer.width(),
                buffer.height(),
                out.width(),
                out.height()
            );
            save(&out, &output)
        }
    }
}

fn hash_files(
    config: &FileConfig,
    paths: &[PathBuf],
    recursive: bool,
    json: bool,
) -> Result<(), CliError> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let fingerprinter = Fingerprinter::new(config.decode);
    let (files, walk_errors) = collect_files(paths, recursive);
    let total = files.len() + walk_errors;
    let mut failed = walk_errors;
    let mut hashed = 0;

    for (i, path) in files.iter().enumerate() {
        if !running.load(Ordering::SeqCst) {
            warn!("Interrupted, {} files not processed", files.len() - i);
            break;
        }

        match hash_one(&fingerprinter, path) {
            Ok(record) if json => match serde_json::to_string(&record) {
                Ok(line) => {
                    println!("{line}");
                    hashed += 1;
                }
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    failed += 1;
                }
            },
            Ok(record) => {
                println!("{}  {}  {}", record.sha256, record.phash, path.display());
                hashed += 1;
            }
            Err(e) => {
                warn!("{}", e);
                failed += 1;
            }
        }
    }

    info!("Hashed {} of {} files", hashed, total);
    if failed > 0 {
        return Err(CliError::Incomplete { failed, total });
    }
    Ok(())
}

fn hash_one<'a>(fingerprinter: &Fingerprinter, path: &'a Path) -> Result<HashRecord<'a>, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sha256 = Sha256::digest(&bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    let phash = fingerprinter.fingerprint(path)?;

    Ok(HashRecord {
        path,
        sha256,
        phash,
    })
}

/// Expands directories into the image files they contain.
///
/// Explicit file arguments are kept whatever their extension. Returns
/// the files and the number of directory entries that could not be
/// read; each of those is logged.
fn collect_files(paths: &[PathBuf], recursive: bool) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut errors = 0;
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path).follow_links(true).sort_by_file_name();
        let walker = if recursive { walker } else { walker.max_depth(1) };
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && ImageFormat::from_path(entry.path()).is_ok()
                    {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    errors += 1;
                }
            }
        }
    }
    (files, errors)
}

fn compare(config: &FileConfig, first: &Path, second: &Path) -> Result<(), CliError> {
    let fingerprinter = Fingerprinter::new(config.decode);
    let a = fingerprinter.fingerprint(first)?;
    let b = fingerprinter.fingerprint(second)?;

    println!("{}  {}", a, first.display());
    println!("{}  {}", b, second.display());
    println!("distance: {}", a.distance(&b));
    Ok(())
}

fn target(width: u32, height: u32) -> Result<ResizeTarget, CliError> {
    ResizeTarget::new(width, height).ok_or(CliError::InvalidSize { width, height })
}

fn guess_mime(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}

fn save(buffer: &CanonicalImageBuffer, path: &Path) -> Result<(), CliError> {
    let color = match buffer.channel_order() {
        ChannelOrder::Gray => ExtendedColorType::L8,
        ChannelOrder::Rgb => ExtendedColorType::Rgb8,
        ChannelOrder::Rgba => ExtendedColorType::Rgba8,
    };
    image::save_buffer(path, buffer.samples(), buffer.width(), buffer.height(), color)?;
    info!("Wrote {}", path.display());
    Ok(())
}
