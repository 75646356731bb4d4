use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::IndexedPoint;
use crate::interaction::{ChartEvent, ChartEventKind};
use crate::render::{CirclePrimitive, Color, LinePrimitive, RenderFrame, SurfaceKind};

use super::projection::{is_drawable, project_xy};
use super::{
    DrawContext, Drawable, Selectable, SelectionState, Series, TooltipAware, ZoomAware,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotMode {
    Never,
    Always,
    /// Dots appear only while a zoom window is active.
    #[default]
    WhenZoomed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesOptions {
    pub name: String,
    pub x: String,
    pub y: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub dots: DotMode,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
}

fn default_color() -> String {
    "#1f77b4".to_owned()
}

fn default_stroke_width() -> f64 {
    1.5
}

fn default_dot_radius() -> f64 {
    3.0
}

/// Polyline on a dedicated canvas surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    name: String,
    x_field: String,
    y_field: String,
    color: Color,
    stroke_width: f64,
    dots: DotMode,
    dot_radius: f64,
    zoomed: bool,
    selection: SelectionState,
}

impl LineSeries {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        x_field: impl Into<String>,
        y_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            x_field: x_field.into(),
            y_field: y_field.into(),
            color: Color::rgb(0.12, 0.47, 0.71),
            stroke_width: default_stroke_width(),
            dots: DotMode::default(),
            dot_radius: default_dot_radius(),
            zoomed: false,
            selection: SelectionState::default(),
        }
    }

    pub fn from_options(options: LineSeriesOptions) -> crate::error::ChartResult<Self> {
        Ok(Self::new(options.name, options.x, options.y)
            .with_color(Color::from_hex(&options.color)?)
            .with_stroke_width(options.stroke_width)
            .with_dots(options.dots, options.dot_radius))
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        if stroke_width.is_finite() && stroke_width > 0.0 {
            self.stroke_width = stroke_width;
        }
        self
    }

    #[must_use]
    pub fn with_dots(mut self, dots: DotMode, radius: f64) -> Self {
        self.dots = dots;
        if radius.is_finite() && radius > 0.0 {
            self.dot_radius = radius;
        }
        self
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    fn shows_dots(&self) -> bool {
        match self.dots {
            DotMode::Never => false,
            DotMode::Always => true,
            DotMode::WhenZoomed => self.zoomed,
        }
    }
}

impl Drawable for LineSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface_kind(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn color(&self) -> Color {
        self.color
    }

    fn project(&self, ctx: &DrawContext<'_>) -> Vec<IndexedPoint> {
        project_xy(ctx.data, ctx.scales, &self.x_field, &self.y_field)
    }

    fn draw(
        &self,
        points: &[IndexedPoint],
        range: Range<usize>,
        ctx: &DrawContext<'_>,
    ) -> RenderFrame {
        let mut frame = RenderFrame::new(ctx.geometry.viewport);
        let stroke = if self.selection.is_selected() {
            self.stroke_width + 1.0
        } else {
            self.stroke_width
        };

        // Segment ending at `range.start` belongs to this chunk.
        let first = range.start.saturating_sub(1);
        let end = range.end.min(points.len());
        if first < end {
            for pair in points[first..end].windows(2) {
                let (from, to) = (&pair[0], &pair[1]);
                if is_drawable(from) && is_drawable(to) {
                    frame
                        .lines
                        .push(LinePrimitive::new(from.x, from.y, to.x, to.y, stroke, self.color));
                }
            }
        }

        let show_dots = self.shows_dots();
        let selected_item = self.selection.selected_item();
        for point in points[range.start.min(end)..end].iter().filter(|p| is_drawable(p)) {
            let highlighted = selected_item == Some(point.datum);
            if show_dots || highlighted {
                let radius = if highlighted {
                    self.dot_radius + 2.0
                } else {
                    self.dot_radius
                };
                frame
                    .circles
                    .push(CirclePrimitive::new(point.x, point.y, radius, self.color));
            }
        }
        frame
    }

    fn hit_radius(&self) -> f64 {
        self.dot_radius + 1.0
    }
}

impl ZoomAware for LineSeries {
    fn on_zoom(&mut self, event: &ChartEvent) {
        match event.kind {
            ChartEventKind::ZoomIn => self.zoomed = true,
            ChartEventKind::ZoomOut => self.zoomed = false,
            _ => {}
        }
        trace!(series = %self.name, zoomed = self.zoomed, "line series observed zoom");
    }
}

impl TooltipAware for LineSeries {
    fn tooltip_fields(&self) -> Vec<String> {
        vec![self.x_field.clone(), self.y_field.clone()]
    }
}

impl Series for LineSeries {
    fn as_zoom_aware(&mut self) -> Option<&mut dyn ZoomAware> {
        Some(self)
    }

    fn as_tooltip_aware(&self) -> Option<&dyn TooltipAware> {
        Some(self)
    }

    fn as_selectable(&mut self) -> Option<&mut dyn Selectable> {
        Some(&mut self.selection)
    }

    fn as_selectable_ref(&self) -> Option<&dyn Selectable> {
        Some(&self.selection)
    }
}
