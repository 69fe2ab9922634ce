//! Drawing element geometry and note icons onto a tile mosaic.
//!
//! Polylines and node markers are stroked with tiny-skia onto a transparent
//! layer the size of the canvas, which is then blended onto the mosaic. Note
//! icons are pasted afterwards so they stay on top of the lines.

use std::path::PathBuf;

use chrono::Utc;
use image::{imageops, Pixel, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use map_common::{MapError, MapResult, Note, RenderConfig, Segment, ViewFragment};
use projection::CanvasProjector;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use viewport::tile_range_for;

use crate::assets::NoteIcons;
use crate::output::{save_image, OutputTemplate};
use crate::style::{Palette, StrokeStyle};

const CANVAS_CENTER_COLOR: Rgba<u8> = Rgba([0, 136, 136, 255]);
const PROJECTED_CENTER_COLOR: Rgba<u8> = Rgba([187, 187, 0, 255]);

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: RgbaImage,
    pub path: PathBuf,
}

/// Renders segments and notes for one viewport onto a pre-composed mosaic.
#[derive(Debug, Clone)]
pub struct TileRasterizer {
    config: RenderConfig,
    palette: Palette,
    stroke: StrokeStyle,
    icons: Option<NoteIcons>,
    output: OutputTemplate,
}

impl TileRasterizer {
    pub fn new(config: RenderConfig, output: OutputTemplate) -> Self {
        Self {
            config,
            palette: Palette::default(),
            stroke: StrokeStyle::default(),
            icons: None,
            output,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_icons(mut self, icons: NoteIcons) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw everything and save the result under the output template.
    pub fn render(
        &self,
        mosaic: RgbaImage,
        segments: &[Segment],
        notes: &[Note],
        fragment: &ViewFragment,
    ) -> MapResult<RenderOutput> {
        let image = self.draw(mosaic, segments, notes, fragment)?;
        self.save(image)
    }

    /// Draw only note icons and save the result.
    pub fn render_notes(
        &self,
        mosaic: RgbaImage,
        notes: &[Note],
        fragment: &ViewFragment,
    ) -> MapResult<RenderOutput> {
        let image = self.draw(mosaic, &[], notes, fragment)?;
        self.save(image)
    }

    /// Draw onto the mosaic without writing anything to disk.
    pub fn draw(
        &self,
        mut mosaic: RgbaImage,
        segments: &[Segment],
        notes: &[Note],
        fragment: &ViewFragment,
    ) -> MapResult<RgbaImage> {
        let expected = (self.config.canvas_width(), self.config.canvas_height());
        if mosaic.dimensions() != expected {
            return Err(MapError::RenderError(format!(
                "mosaic is {}x{}, canvas needs {}x{}",
                mosaic.width(),
                mosaic.height(),
                expected.0,
                expected.1
            )));
        }
        if !notes.is_empty() && self.icons.is_none() {
            return Err(MapError::AssetError("note icons not loaded".to_string()));
        }

        let range = tile_range_for(fragment, &self.config);
        let projector = CanvasProjector::new(&self.config, range, *fragment);

        if !segments.is_empty() {
            let layer = self.stroke_segments(&projector, segments)?;
            blend_layer(&mut mosaic, &layer);
        }
        if let Some(icons) = &self.icons {
            paste_notes(&mut mosaic, &projector, icons, notes);
        }
        if self.stroke.debug_alignment {
            self.draw_alignment(&mut mosaic, &projector, fragment);
        }

        tracing::debug!(
            segments = segments.len(),
            notes = notes.len(),
            zoom = fragment.zoom,
            "Drew elements on mosaic"
        );
        Ok(mosaic)
    }

    /// Pixel distance between the projected viewport center and the canvas
    /// center. Zero (or one, from rounding) when geometry and tiles line up.
    pub fn alignment_error(&self, fragment: &ViewFragment) -> (i32, i32) {
        let range = tile_range_for(fragment, &self.config);
        let projector = CanvasProjector::new(&self.config, range, *fragment);
        let (x, y) = projector.project(&fragment.center());
        let (cx, cy) = self.canvas_center();
        (x - cx, y - cy)
    }

    fn canvas_center(&self) -> (i32, i32) {
        (
            (self.config.canvas_width() / 2) as i32,
            (self.config.canvas_height() / 2) as i32,
        )
    }

    fn save(&self, image: RgbaImage) -> MapResult<RenderOutput> {
        let path = self.output.path_for(Utc::now());
        save_image(&image, &path)?;
        Ok(RenderOutput { image, path })
    }

    fn stroke_segments(
        &self,
        projector: &CanvasProjector<'_>,
        segments: &[Segment],
    ) -> MapResult<Pixmap> {
        let mut pixmap = Pixmap::new(self.config.canvas_width(), self.config.canvas_height())
            .ok_or_else(|| MapError::RenderError("cannot allocate drawing layer".to_string()))?;

        let stroke = Stroke {
            width: self.stroke.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for (index, segment) in segments.iter().enumerate() {
            let color = self.palette.color_for(index);
            let mut paint = Paint::default();
            paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
            paint.anti_alias = true;

            let points = projector.project_all(segment);
            if let Some(path) = polyline(&points) {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }

            if self.stroke.draws_markers(points.len(), segments.len()) {
                for &(x, y) in &points {
                    if let Some(dot) =
                        PathBuilder::from_circle(x as f32, y as f32, self.stroke.marker_radius)
                    {
                        pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                    }
                }
            }
        }

        Ok(pixmap)
    }

    fn draw_alignment(
        &self,
        canvas: &mut RgbaImage,
        projector: &CanvasProjector<'_>,
        fragment: &ViewFragment,
    ) {
        let radius = self.stroke.marker_radius.round() as i32;
        let center = self.canvas_center();
        let projected = projector.project(&fragment.center());

        draw_filled_circle_mut(canvas, center, radius, CANVAS_CENTER_COLOR);
        draw_filled_circle_mut(canvas, projected, radius, PROJECTED_CENTER_COLOR);

        tracing::debug!(
            dx = projected.0 - center.0,
            dy = projected.1 - center.1,
            "Map alignment error"
        );
    }
}

/// Connected path through the given pixels; `None` for fewer than two points.
fn polyline(points: &[(i32, i32)]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.0 as f32, first.1 as f32);
    for &(x, y) in rest {
        pb.line_to(x as f32, y as f32);
    }
    pb.finish()
}

/// Source-over blend of a premultiplied layer onto the canvas.
fn blend_layer(canvas: &mut RgbaImage, layer: &Pixmap) {
    let width = layer.width();
    for (i, pixel) in layer.pixels().iter().enumerate() {
        if pixel.alpha() == 0 {
            continue;
        }
        let color = pixel.demultiply();
        let x = i as u32 % width;
        let y = i as u32 / width;
        canvas
            .get_pixel_mut(x, y)
            .blend(&Rgba([color.red(), color.green(), color.blue(), color.alpha()]));
    }
}

/// Paste note icons with their bottom-center on the note position.
fn paste_notes(
    canvas: &mut RgbaImage,
    projector: &CanvasProjector<'_>,
    icons: &NoteIcons,
    notes: &[Note],
) {
    for note in notes {
        let icon = icons.icon_for(note.solved);
        let (x, y) = projector.project(&note.point());
        let left = (x as f64 - icon.width() as f64 / 2.0) as i64;
        let top = y as i64 - icon.height() as i64;
        imageops::overlay(canvas, icon, left, top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn small_config() -> RenderConfig {
        RenderConfig {
            tile_w: 64,
            tile_h: 64,
            tiles_x: 3,
            tiles_y: 3,
            ..RenderConfig::default()
        }
    }

    fn white_mosaic(config: &RenderConfig) -> RgbaImage {
        RgbaImage::from_pixel(config.canvas_width(), config.canvas_height(), WHITE)
    }

    #[test]
    fn test_polyline_needs_two_points() {
        assert!(polyline(&[]).is_none());
        assert!(polyline(&[(1, 1)]).is_none());
        assert!(polyline(&[(1, 1), (10, 1)]).is_some());
    }

    #[test]
    fn test_blend_layer_skips_transparent() {
        let mut canvas = RgbaImage::from_pixel(2, 1, WHITE);
        let mut layer = Pixmap::new(2, 1).unwrap();
        layer.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        layer.pixels_mut()[1] = tiny_skia::PremultipliedColorU8::TRANSPARENT;
        blend_layer(&mut canvas, &layer);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(1, 0), &WHITE);
    }

    #[test]
    fn test_wrong_mosaic_size_rejected() {
        let config = small_config();
        let rasterizer = TileRasterizer::new(config, OutputTemplate::default());
        let err = rasterizer
            .draw(RgbaImage::new(10, 10), &[], &[], &ViewFragment::new(10, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, MapError::RenderError(_)));
    }

    #[test]
    fn test_notes_without_icons_rejected() {
        let config = small_config();
        let mosaic = white_mosaic(&config);
        let rasterizer = TileRasterizer::new(config, OutputTemplate::default());
        let err = rasterizer
            .draw(
                mosaic,
                &[],
                &[Note::new(0.0, 0.0, false)],
                &ViewFragment::new(10, 0.0, 0.0),
            )
            .unwrap_err();
        assert!(matches!(err, MapError::AssetError(_)));
    }

    #[test]
    fn test_alignment_markers_drawn() {
        let config = small_config();
        let mosaic = white_mosaic(&config);
        let stroke = StrokeStyle {
            debug_alignment: true,
            ..StrokeStyle::default()
        };
        let rasterizer = TileRasterizer::new(config, OutputTemplate::default()).with_stroke(stroke);
        let fragment = ViewFragment::new(12, 59.437, 24.7536);
        let image = rasterizer.draw(mosaic, &[], &[], &fragment).unwrap();

        let (dx, dy) = rasterizer.alignment_error(&fragment);
        assert!(dx.abs() <= 1 && dy.abs() <= 1, "error = ({}, {})", dx, dy);
        // Projected marker is drawn last and covers the canvas center.
        assert_eq!(image.get_pixel(96, 96), &PROJECTED_CENTER_COLOR);
    }
}
