use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::IndexedPoint;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, Color, RenderFrame, SurfaceKind};

use super::projection::{is_drawable, project_xy};
use super::{DrawContext, Drawable, Selectable, SelectionState, Series, TooltipAware};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeriesOptions {
    pub name: String,
    pub x: String,
    pub y: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_surface")]
    pub surface: SurfaceKind,
}

fn default_color() -> String {
    "#ff7f0e".to_owned()
}

fn default_radius() -> f64 {
    2.0
}

fn default_surface() -> SurfaceKind {
    SurfaceKind::Canvas
}

/// Dots on a canvas or WebGL surface; suited to very large datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    name: String,
    x_field: String,
    y_field: String,
    color: Color,
    radius: f64,
    surface: SurfaceKind,
    selection: SelectionState,
}

impl ScatterSeries {
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
            color: Color::rgb(1.0, 0.5, 0.05),
            radius: default_radius(),
            surface: SurfaceKind::Canvas,
            selection: SelectionState::default(),
        }
    }

    pub fn from_options(options: ScatterSeriesOptions) -> ChartResult<Self> {
        Self::new(options.name, options.x, options.y)
            .with_color(Color::from_hex(&options.color)?)
            .with_radius(options.radius)
            .on_surface(options.surface)
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        if radius.is_finite() && radius > 0.0 {
            self.radius = radius;
        }
        self
    }

    /// Moves the series to a raster surface of `kind`.
    pub fn on_surface(mut self, kind: SurfaceKind) -> ChartResult<Self> {
        if !kind.is_raster() {
            return Err(ChartError::InvalidConfig(format!(
                "scatter series `{}` needs a canvas or webgl surface",
                self.name
            )));
        }
        self.surface = kind;
        Ok(self)
    }
}

impl Drawable for ScatterSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface_kind(&self) -> SurfaceKind {
        self.surface
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
        let end = range.end.min(points.len());
        let start = range.start.min(end);
        let selected_item = self.selection.selected_item();
        let color = if self.selection.is_selected() {
            self.color
        } else {
            self.color.with_alpha(self.color.alpha * 0.8)
        };
        frame.circles.extend(
            points[start..end]
                .iter()
                .filter(|point| is_drawable(point))
                .map(|point| {
                    let radius = if selected_item == Some(point.datum) {
                        self.radius * 2.0
                    } else {
                        self.radius
                    };
                    CirclePrimitive::new(point.x, point.y, radius, color)
                }),
        );
        frame
    }

    fn hit_radius(&self) -> f64 {
        self.radius + 1.0
    }
}

impl TooltipAware for ScatterSeries {
    fn tooltip_fields(&self) -> Vec<String> {
        vec![self.x_field.clone(), self.y_field.clone()]
    }
}

impl Series for ScatterSeries {
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
