//! AppIcon CLI Tool
//!
//! Command-line interface for listing app icon sets and regenerating them
//! from one master image.

use anyhow::{bail, Context, Result};
use appicon_core::{find_app_icon_sets, AssetManifest};
use appicon_resizer::{resize_all, BitmapFormat, ResizeConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "appicon")]
#[command(about = "Regenerate every app icon variant of an asset catalog from one image")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List app icon sets and the sizes they require
    List {
        /// Folder to search for .appiconset folders
        root: PathBuf,
    },

    /// Resize a master image into every app icon set found
    Generate {
        /// Master image, ideally 1024x1024 or larger
        source: PathBuf,

        /// Folder to search for .appiconset folders
        root: PathBuf,

        /// Output image format
        #[arg(long, value_enum, default_value = "png")]
        format: FormatArg,

        /// Only print what would be written
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Tiff,
    Bmp,
}

impl From<FormatArg> for BitmapFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => BitmapFormat::Png,
            FormatArg::Jpeg => BitmapFormat::Jpeg,
            FormatArg::Tiff => BitmapFormat::Tiff,
            FormatArg::Bmp => BitmapFormat::Bmp,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::List { root } => list_icon_sets(&root)?,

        Commands::Generate {
            source,
            root,
            format,
            dry_run,
        } => {
            let config = ResizeConfig {
                format: format.into(),
                ..ResizeConfig::default()
            };
            generate_icon_sets(&source, &root, &config, dry_run)?
        }
    }

    Ok(())
}

/// Set up tracing/logging based on verbosity level
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

fn find_icon_sets(root: &Path) -> Result<Vec<PathBuf>> {
    let icon_sets = find_app_icon_sets(root);
    if icon_sets.is_empty() {
        bail!("No .appiconset folder found in {}", root.display());
    }
    Ok(icon_sets)
}

fn list_icon_sets(root: &Path) -> Result<()> {
    for path in find_icon_sets(root)? {
        let manifest = AssetManifest::open(&path);
        let sizes = manifest.sizes();

        println!("\n=== {} ===", path.display());
        if !manifest.is_loaded() {
            println!("  Contents.json missing or unreadable");
            continue;
        }
        println!("Sizes: {}", sizes.len());
        for size in &sizes {
            let role = match (&size.role, &size.subtype) {
                (Some(role), Some(subtype)) => format!(" ({} {})", role, subtype),
                (Some(role), None) => format!(" ({})", role),
                (None, Some(subtype)) => format!(" ({})", subtype),
                (None, None) => String::new(),
            };
            let pixels = match size.pixel_size() {
                Some(edge) => format!("{}x{} px", edge, edge),
                None => "invalid pixel size".to_string(),
            };
            println!("  {}: {}{}", size.canonical_name(), pixels, role);
        }
    }

    Ok(())
}

fn generate_icon_sets(
    source: &Path,
    root: &Path,
    config: &ResizeConfig,
    dry_run: bool,
) -> Result<()> {
    let icon_sets = find_icon_sets(root)?;

    println!("Loading master image: {}", source.display());
    let original = image::open(source)
        .with_context(|| format!("Failed to open {}", source.display()))?;
    if original.width() != original.height() {
        tracing::warn!(
            width = original.width(),
            height = original.height(),
            "master image is not square, icons will be stretched"
        );
    }

    for path in icon_sets {
        let mut manifest = AssetManifest::open(&path);
        let sizes = manifest.sizes();

        println!("\n{}: {} sizes", path.display(), sizes.len());
        if sizes.is_empty() {
            tracing::warn!(path = %path.display(), "no sizes to generate, skipping");
            continue;
        }

        let images = resize_all(&original, &sizes, config)
            .with_context(|| format!("Failed to resize icons for {}", path.display()))?;

        if dry_run {
            for image in &images {
                println!(
                    "  would write {} ({}x{})",
                    image.filename(),
                    image.bitmap().width(),
                    image.bitmap().height()
                );
            }
            continue;
        }

        for image in &images {
            image
                .save(&path)
                .with_context(|| format!("Failed to save {}", image.filename()))?;
        }

        let summary = manifest
            .update(&images)
            .with_context(|| format!("Failed to update {}", manifest.contents_path().display()))?;

        println!(
            "  Wrote {} images, {} entries updated ({} without image, {} malformed removed)",
            images.len(),
            summary.written(),
            summary.unmatched,
            summary.dropped
        );
    }

    println!("\nDone");

    Ok(())
}
