//! Map preview rendering service.
//!
//! Renders a batch of requests with:
//! - Geometry looked up from a local JSON store
//! - Viewports fitted to the geometry (or taken from a map link)
//! - Mosaics composed from a local `{z}/{x}/{y}.png` tile tree
//! - Per-user rate limiting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use map_render::assets::{http_client, load_note_icons};
use map_render::{
    load_app_config, GeometryStore, RateLimiter, RenderPipeline, RenderRequest, StoreResolver,
};
use renderer::{DirectoryTileSource, TileRasterizer};

#[derive(Parser, Debug)]
#[command(name = "map-render")]
#[command(about = "Draw map elements and notes onto tile mosaics")]
struct Args {
    /// JSON file with an array of render requests
    requests: PathBuf,

    /// Service configuration file
    #[arg(long, env = "MAP_RENDER_CONFIG", default_value = "config/map-render.yaml")]
    config: PathBuf,

    /// JSON geometry store used to resolve element references
    #[arg(long, env = "MAP_GEOMETRY_STORE")]
    store: Option<PathBuf>,

    /// Tile directory (overrides the configured one)
    #[arg(long, env = "MAP_TILE_DIR")]
    tiles: Option<PathBuf>,

    /// Log level (overrides the configured one)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Draw canvas-centre and projected-centre markers
    #[arg(long)]
    debug_alignment: bool,
}

fn init_tracing(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = load_app_config(&args.config)?;
    let log_level = args.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&log_level, args.json_logs)?;

    info!(config = ?args.config, "Starting map renderer");

    if args.debug_alignment {
        config.stroke.debug_alignment = true;
    }
    let tile_dir = args.tiles.clone().unwrap_or_else(|| config.tiles.directory.clone());

    let mut rasterizer = TileRasterizer::new(config.rendering.clone(), config.output_template())
        .with_palette(config.palette()?)
        .with_stroke(config.stroke.clone());
    match &config.symbols {
        Some(symbols) => {
            let client = http_client(&config.http)?;
            rasterizer = rasterizer.with_icons(load_note_icons(symbols, &client).await?);
        }
        None => warn!("No note symbols configured, requests with notes will fail"),
    }

    let store = match &args.store {
        Some(path) => GeometryStore::load(path)
            .with_context(|| format!("Failed to load geometry store {:?}", path))?,
        None => GeometryStore::default(),
    };

    let content = tokio::fs::read_to_string(&args.requests)
        .await
        .with_context(|| format!("Failed to read requests from {:?}", args.requests))?;
    let requests: Vec<RenderRequest> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse requests in {:?}", args.requests))?;

    let mut pipeline = RenderPipeline::new(
        rasterizer,
        DirectoryTileSource::new(&tile_dir),
        StoreResolver::new(store),
        RateLimiter::from_config(&config.rate_limit),
    )
    .with_extra_per_element(std::time::Duration::from_secs_f64(
        config.rate_limit.extra_per_element,
    ));

    info!(count = requests.len(), tiles = ?tile_dir, "Processing render requests");

    let mut rendered = 0usize;
    for (index, request) in requests.iter().enumerate() {
        match pipeline.process(request) {
            Ok(outcome) => {
                rendered += 1;
                info!(
                    index,
                    user = %request.user,
                    fragment = %outcome.fragment,
                    path = %outcome.path.display(),
                    missing_tiles = outcome.missing_tiles,
                    "Rendered map"
                );
            }
            Err(e) if e.is_user_error() => {
                warn!(index, user = %request.user, error = %e, "Request rejected");
            }
            Err(e) => {
                error!(index, user = %request.user, error = %e, "Render failed");
            }
        }
    }

    info!(
        rendered,
        failed = requests.len() - rendered,
        "Finished render batch"
    );
    Ok(())
}
