use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use map_editor_core::{
    EditorConfig, GridKind, MapEditor, RasterImage, SourceLocation, WorldPoint, WorldRect, ui,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Binary `P5` grayscale raster
    Pgm,
    /// JSON occupancy grid (`{"info": {...}, "data": [...]}`)
    RosMap,
    /// JSON live costmap
    LiveCostmap,
    /// PNG or JPEG image
    Image,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path or file:// URL of the map to open
    source: String,

    /// Source format; guessed from the extension when omitted
    #[arg(short, long, value_enum)]
    kind: Option<SourceKind>,

    /// Initial display rotation in degrees
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    /// Crop a world-space rectangle (origin at the map center, y up) before
    /// opening the editor
    #[arg(
        long,
        value_name = "MINX,MINY,MAXX,MAXY",
        value_parser = parse_rect,
        allow_hyphen_values = true
    )]
    crop: Option<WorldRect>,

    /// Print the result and exit without opening a window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Installs the global subscriber on stderr; stdout carries the results.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let span_events = if verbose > 0 { FmtSpan::CLOSE } else { FmtSpan::NONE };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::uptime())
                .with_span_events(span_events),
        )
        .init();
}

fn parse_rect(text: &str) -> std::result::Result<WorldRect, String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in {text:?}: {e}"))?;

    match values.as_slice() {
        [min_x, min_y, max_x, max_y] => Ok(WorldRect::from_corners(
            WorldPoint::new(*min_x, *min_y),
            WorldPoint::new(*max_x, *max_y),
        )),
        _ => Err(format!("expected four comma-separated numbers, got {text:?}")),
    }
}

fn guess_kind(location: &SourceLocation) -> SourceKind {
    if location.looks_like_pgm() {
        SourceKind::Pgm
    } else if location.looks_like_json() {
        SourceKind::RosMap
    } else {
        SourceKind::Image
    }
}

async fn load(
    editor: &MapEditor,
    location: &SourceLocation,
    kind: SourceKind,
) -> Result<RasterImage> {
    let image = match kind {
        SourceKind::Pgm => editor.load_pgm(location).await?,
        SourceKind::Image => editor.load_encoded(location).await?,
        SourceKind::RosMap | SourceKind::LiveCostmap => {
            let bytes = location.read().await?;
            let json = String::from_utf8(bytes).context("Grid payload is not UTF-8")?;
            let grid = if kind == SourceKind::RosMap {
                GridKind::RosMap
            } else {
                GridKind::LiveCostmap
            };
            editor.load_grid_json(grid, &json).await?
        }
    };
    Ok(image)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(args.verbose);

    let config = EditorConfig::load().context("Failed to load configuration")?;
    let editor = MapEditor::new(config).context("Failed to start decode queue")?;

    let location = SourceLocation::parse(&args.source)?;
    let kind = args.kind.unwrap_or_else(|| guess_kind(&location));
    info!(source = %location, ?kind, "Opening map");

    let mut image = load(&editor, &location, kind)
        .await
        .with_context(|| format!("Failed to load {}", location))?;
    println!("Loaded {}x{} px from {}", image.width(), image.height(), location);

    let mut rotation = args.rotation;
    if let Some(selection) = args.crop {
        match editor.crop(Some(&image), rotation, selection) {
            Some(cropped) => {
                println!("Cropped to {}x{} px", cropped.width(), cropped.height());
                image = cropped;
                rotation = 0.0;
            }
            None => {
                warn!(?selection, "Crop rejected");
                if args.headless {
                    bail!("Crop selection was rejected");
                }
            }
        }
    }

    if args.headless {
        return Ok(());
    }

    let config = editor.config().clone();
    // The window must own the main thread
    let outcome = tokio::task::block_in_place(|| ui::run_editor_ui(image, rotation, config))?;
    println!(
        "Editor closed: {}x{} px, rotation {}°, {} crop(s)",
        outcome.image.width(),
        outcome.image.height(),
        outcome.rotation_degrees,
        outcome.crops
    );

    Ok(())
}
