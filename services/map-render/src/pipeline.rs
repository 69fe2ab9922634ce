//! One render request from element references (or a map URL) to a saved
//! image.

use std::path::PathBuf;
use std::time::Duration;

use map_common::{MapError, MapResult, RenderConfig, ViewFragment};
use renderer::{compose_mosaic, TileRasterizer, TileSource};
use serde::{Deserialize, Serialize};
use viewport::{compute_bounds, simplify, tile_range_for, ElementRef, RenderQueue, ViewportPlanner};

use crate::rate_limit::RateLimiter;
use crate::resolver::StoreResolver;

/// A request as it appears in the batch file.
///
/// Exactly one of `elements` (e.g. `"way/123"`, `"note/42"`) or `url` (a map
/// link with a `#map=z/lat/lon` fragment) is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub user: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// What a request asks to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    Elements(Vec<ElementRef>),
    Fragment(ViewFragment),
}

impl RenderRequest {
    pub fn target(&self) -> MapResult<RenderTarget> {
        match (&self.url, self.elements.is_empty()) {
            (Some(url), true) => Ok(RenderTarget::Fragment(ViewFragment::from_url(url)?)),
            (None, false) => self
                .elements
                .iter()
                .map(|e| parse_element(e))
                .collect::<MapResult<Vec<_>>>()
                .map(RenderTarget::Elements),
            (Some(_), false) => Err(MapError::InvalidElement {
                kind: "request".to_string(),
                id: self.user.clone(),
                message: "give either elements or a map URL, not both".to_string(),
            }),
            (None, true) => Err(MapError::InvalidElement {
                kind: "request".to_string(),
                id: self.user.clone(),
                message: "nothing to render".to_string(),
            }),
        }
    }
}

/// Parse `kind/id`, e.g. `way/123` or `user/Someone`.
pub fn parse_element(text: &str) -> MapResult<ElementRef> {
    let (kind, id) = text.split_once('/').ok_or_else(|| MapError::InvalidElement {
        kind: text.to_string(),
        id: String::new(),
        message: "expected kind/id".to_string(),
    })?;
    ElementRef::parse(kind, id)
}

/// A finished request.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub fragment: ViewFragment,
    pub path: PathBuf,
    pub missing_tiles: usize,
}

/// Runs requests one after another against shared state.
pub struct RenderPipeline<S> {
    config: RenderConfig,
    rasterizer: TileRasterizer,
    tiles: S,
    resolver: StoreResolver,
    limiter: RateLimiter,
    extra_per_element: Duration,
}

impl<S: TileSource> RenderPipeline<S> {
    pub fn new(
        rasterizer: TileRasterizer,
        tiles: S,
        resolver: StoreResolver,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            config: rasterizer.config().clone(),
            rasterizer,
            tiles,
            resolver,
            limiter,
            extra_per_element: Duration::ZERO,
        }
    }

    /// Extra rate-limit weight per element beyond the first.
    pub fn with_extra_per_element(mut self, extra: Duration) -> Self {
        self.extra_per_element = extra;
        self
    }

    pub fn process(&mut self, request: &RenderRequest) -> MapResult<RenderOutcome> {
        let target = request.target()?;

        let weight = match &target {
            RenderTarget::Elements(elements) => elements.len().saturating_sub(1) as u32,
            RenderTarget::Fragment(_) => 0,
        };
        if !self.limiter.check(&request.user, self.extra_per_element * weight) {
            tracing::debug!(
                user = %request.user,
                calls = self.limiter.recent_calls(&request.user),
                "Over the rate limit"
            );
            return Err(MapError::RateLimited {
                user: request.user.clone(),
            });
        }

        match target {
            RenderTarget::Elements(elements) => self.render_elements(elements),
            RenderTarget::Fragment(fragment) => self.render_fragment(fragment),
        }
    }

    fn render_elements(&mut self, elements: Vec<ElementRef>) -> MapResult<RenderOutcome> {
        let mut queue = RenderQueue::with_elements(elements);
        queue.resolve(&mut self.resolver)?;
        let geometry = queue.into_geometry()?;

        // Plan on what will actually be drawn.
        let segments = simplify(geometry.segments);
        let bbox = compute_bounds(&segments, &geometry.notes)?;

        let planner = ViewportPlanner::new(&self.config);
        let fragment = planner.choose_viewport_for(&bbox, !geometry.notes.is_empty());

        let (mosaic, missing_tiles) = self.mosaic_for(&fragment)?;
        let output = if segments.is_empty() {
            self.rasterizer
                .render_notes(mosaic, &geometry.notes, &fragment)?
        } else {
            self.rasterizer
                .render(mosaic, &segments, &geometry.notes, &fragment)?
        };

        Ok(RenderOutcome {
            fragment,
            path: output.path,
            missing_tiles,
        })
    }

    fn render_fragment(&mut self, fragment: ViewFragment) -> MapResult<RenderOutcome> {
        let fragment = ViewFragment {
            zoom: fragment.zoom.min(self.config.max_zoom),
            ..fragment
        };
        let (mosaic, missing_tiles) = self.mosaic_for(&fragment)?;
        let output = self.rasterizer.render(mosaic, &[], &[], &fragment)?;
        Ok(RenderOutcome {
            fragment,
            path: output.path,
            missing_tiles,
        })
    }

    fn mosaic_for(&self, fragment: &ViewFragment) -> MapResult<(image::RgbaImage, usize)> {
        let range = tile_range_for(fragment, &self.config);
        let (mosaic, report) = compose_mosaic(&self.tiles, &range, fragment.zoom, &self.config)?;
        if !report.is_complete() {
            tracing::warn!(
                fragment = %fragment,
                missing = report.missing.len(),
                placed = report.placed,
                "Base map has gaps"
            );
        }
        Ok((mosaic, report.missing.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_element() {
        assert_eq!(
            parse_element("way/123").unwrap(),
            ElementRef::Element {
                kind: "way".into(),
                id: 123
            }
        );
        assert_eq!(parse_element("Note/7").unwrap(), ElementRef::Note { id: 7 });
        assert!(parse_element("way").is_err());
        assert!(parse_element("way/abc").is_err());
    }

    #[test]
    fn test_request_target() {
        let request = RenderRequest {
            user: "alice".into(),
            elements: vec![],
            url: Some("https://www.openstreetmap.org/#map=15/59.4370/24.7536".into()),
        };
        assert_eq!(
            request.target().unwrap(),
            RenderTarget::Fragment(ViewFragment::new(15, 59.437, 24.7536))
        );

        let empty = RenderRequest {
            user: "alice".into(),
            elements: vec![],
            url: None,
        };
        assert!(empty.target().unwrap_err().is_user_error());

        let both = RenderRequest {
            user: "alice".into(),
            elements: vec!["way/1".into()],
            url: Some("#map=1/0/0".into()),
        };
        assert!(both.target().is_err());
    }
}
