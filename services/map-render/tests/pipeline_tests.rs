//! End-to-end tests for the render pipeline: store lookup, viewport fitting,
//! mosaic composition from a tile directory, and rate limiting.

use std::time::Duration;

use image::Rgba;
use map_common::MapError;
use map_render::config::parse_app_config;
use map_render::{GeometryStore, RateLimiter, RenderPipeline, RenderRequest, StoreResolver};
use renderer::{tile_placements, DirectoryTileSource, NoteIcons, OutputTemplate, TileRasterizer};
use test_utils::{small_config, solid_tile, temp_test_dir, test_icon, tile_path};
use map_common::GeoPoint;
use viewport::{compute_bounds, simplify, tile_range_for, ViewportPlanner};

const STORE: &str = r#"{
    "elements": {
        "way/1": [[[59.4365, 24.7520], [59.4372, 24.7545], [59.4378, 24.7531]]],
        "way/2": [[[59.4360, 24.7500], [59.4362, 24.7510]]]
    },
    "notes": {
        "42": { "lat": 59.4370, "lon": 24.7536, "solved": false }
    },
    "changesets": {}
}"#;

fn request(user: &str, elements: &[&str]) -> RenderRequest {
    RenderRequest {
        user: user.to_string(),
        elements: elements.iter().map(|e| e.to_string()).collect(),
        url: None,
    }
}

fn pipeline(
    tiles: &std::path::Path,
    output: &std::path::Path,
    limiter: RateLimiter,
) -> RenderPipeline<DirectoryTileSource> {
    let icons = NoteIcons::from_images(test_icon(8, 8, [200, 0, 0]), test_icon(8, 8, [0, 200, 0]));
    let rasterizer = TileRasterizer::new(
        small_config(),
        OutputTemplate::new(format!("{}/map_{{t}}.png", output.display())),
    )
    .with_icons(icons);

    RenderPipeline::new(
        rasterizer,
        DirectoryTileSource::new(tiles),
        StoreResolver::new(GeometryStore::from_json(STORE).unwrap()),
        limiter,
    )
}

fn generous_limiter() -> RateLimiter {
    RateLimiter::new(Duration::from_secs(60), 100)
}

#[test]
fn test_renders_elements_from_store() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let mut pipeline = pipeline(tiles.path(), output.path(), generous_limiter());

    let outcome = pipeline
        .process(&request("alice", &["way/1", "way/2", "note/42"]))
        .unwrap();

    assert!(outcome.path.exists());
    assert!(outcome.path.starts_with(output.path()));
    // Empty tile directory: every tile on the canvas is reported missing.
    let config = small_config();
    let range = tile_range_for(&outcome.fragment, &config);
    let expected = tile_placements(&range, outcome.fragment.zoom, &config).len();
    assert!(expected >= 9);
    assert_eq!(outcome.missing_tiles, expected);

    let saved = image::open(&outcome.path).unwrap().to_rgba8();
    assert_eq!(saved.dimensions(), (config.canvas_width(), config.canvas_height()));
}

#[test]
fn test_uses_tiles_that_exist() {
    let config = small_config();
    let tiles = temp_test_dir();
    let output = temp_test_dir();

    // Plan once to learn which tiles will be asked for, then provide them all.
    let mut planner = pipeline(tiles.path(), output.path(), generous_limiter());
    let planned = planner.process(&request("planner", &["way/2"])).unwrap();
    let range = tile_range_for(&planned.fragment, &config);
    for placement in tile_placements(&range, planned.fragment.zoom, &config) {
        let coord = placement.coord;
        let path = tile_path(tiles.path(), coord.z, coord.x, coord.y);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        solid_tile(&config, [90, 90, 90, 255]).save(&path).unwrap();
    }

    let mut pipeline = pipeline(tiles.path(), output.path(), generous_limiter());
    let outcome = pipeline.process(&request("alice", &["way/2"])).unwrap();
    assert_eq!(outcome.fragment, planned.fragment);
    assert_eq!(outcome.missing_tiles, 0);

    let saved = image::open(&outcome.path).unwrap().to_rgba8();
    assert_eq!(saved.get_pixel(0, 0), &Rgba([90, 90, 90, 255]));
}

#[test]
fn test_note_only_request() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let mut pipeline = pipeline(tiles.path(), output.path(), generous_limiter());

    let outcome = pipeline.process(&request("alice", &["note/42"])).unwrap();
    assert!(outcome.path.exists());
    assert!(outcome.fragment.zoom <= small_config().max_note_zoom);
}

#[test]
fn test_unknown_element_is_reported() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let mut pipeline = pipeline(tiles.path(), output.path(), generous_limiter());

    let err = pipeline.process(&request("alice", &["way/999"])).unwrap_err();
    assert!(matches!(err, MapError::ResolveError(_)));
}

#[test]
fn test_rate_limit_rejects_excess_calls() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let limiter = RateLimiter::new(Duration::from_secs(60), 2);
    let mut pipeline = pipeline(tiles.path(), output.path(), limiter);

    assert!(pipeline.process(&request("alice", &["way/1"])).is_ok());
    assert!(pipeline.process(&request("alice", &["way/2"])).is_ok());

    let err = pipeline.process(&request("alice", &["way/1"])).unwrap_err();
    assert!(matches!(err, MapError::RateLimited { ref user } if user == "alice"));
    assert!(err.is_user_error());

    // Other users are unaffected.
    assert!(pipeline.process(&request("bob", &["way/1"])).is_ok());
}

#[test]
fn test_url_request_clamps_zoom() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let mut pipeline = pipeline(tiles.path(), output.path(), generous_limiter());

    let outcome = pipeline
        .process(&RenderRequest {
            user: "alice".to_string(),
            elements: vec![],
            url: Some("https://www.openstreetmap.org/#map=25/59.4370/24.7536".to_string()),
        })
        .unwrap();

    assert_eq!(outcome.fragment.zoom, small_config().max_zoom);
    assert!(outcome.path.exists());
}

#[test]
fn test_malformed_request_rejected_before_rate_limit() {
    let tiles = temp_test_dir();
    let output = temp_test_dir();
    let limiter = RateLimiter::new(Duration::from_secs(60), 1);
    let mut pipeline = pipeline(tiles.path(), output.path(), limiter);

    assert!(pipeline.process(&request("alice", &["way"])).is_err());
    // The malformed call did not use up alice's single slot.
    assert!(pipeline.process(&request("alice", &["way/1"])).is_ok());
}

#[test]
fn test_config_drives_pipeline() {
    let output = temp_test_dir();
    let yaml = format!(
        r##"
rendering:
  tile_w: 64
  tile_h: 64
  tiles_x: 3
  tiles_y: 3
  tile_margin_x: 1
  tile_margin_y: 1
tiles:
  directory: {tiles}
map_save_file: "{out}/cfg_{{t}}.png"
element_colors: ["#0a0"]
rate_limit:
  time_period: 60
  max_calls: 1
"##,
        tiles = output.path().join("tiles").display(),
        out = output.path().display(),
    );
    let config = parse_app_config(&yaml).unwrap();

    let rasterizer = TileRasterizer::new(config.rendering.clone(), config.output_template())
        .with_palette(config.palette().unwrap())
        .with_stroke(config.stroke.clone());
    let mut pipeline = RenderPipeline::new(
        rasterizer,
        DirectoryTileSource::new(&config.tiles.directory),
        StoreResolver::new(GeometryStore::from_json(STORE).unwrap()),
        RateLimiter::from_config(&config.rate_limit),
    );

    let outcome = pipeline.process(&request("alice", &["way/1"])).unwrap();
    let name = outcome.path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("cfg_"));
    assert!(pipeline.process(&request("alice", &["way/2"])).is_err());
}

#[test]
fn test_viewport_fits_simplified_geometry() {
    // 200 nodes along a street, with a stray node that simplification drops.
    let mut nodes: Vec<GeoPoint> = (0..200)
        .map(|i| GeoPoint::new(59.4360 + i as f64 * 0.00001, 24.7500 + i as f64 * 0.00001))
        .collect();
    nodes[1] = GeoPoint::new(59.60, 24.7500);

    let json = serde_json::json!({ "elements": { "way/3": [nodes.clone()] } });
    let store = GeometryStore::from_json(&json.to_string()).unwrap();
    let output = temp_test_dir();
    let rasterizer = TileRasterizer::new(
        small_config(),
        OutputTemplate::new(format!("{}/map_{{t}}.png", output.path().display())),
    );
    let mut pipeline = RenderPipeline::new(
        rasterizer,
        DirectoryTileSource::new(output.path().join("tiles")),
        StoreResolver::new(store),
        generous_limiter(),
    );

    let outcome = pipeline.process(&request("alice", &["way/3"])).unwrap();

    let config = small_config();
    let planner = ViewportPlanner::new(&config);
    let simplified = simplify(vec![nodes.clone()]);
    assert!(!simplified[0].contains(&nodes[1]));
    let fitted = planner.choose_viewport(&compute_bounds(&simplified, &[]).unwrap());
    let raw = planner.choose_viewport(&compute_bounds(&[nodes], &[]).unwrap());
    assert_eq!(outcome.fragment, fitted);
    assert!(fitted.zoom > raw.zoom);
}
