use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::{IndexedPoint, ScaleKind};
use crate::error::ChartResult;
use crate::render::{Color, RectPrimitive, RenderFrame, SurfaceKind};

use super::projection::{is_drawable, project_xy};
use super::{DrawContext, Drawable, Selectable, SelectionState, Series, TooltipAware};

const MIN_HIT_RADIUS_PX: f64 = 4.0;
const FALLBACK_BAR_WIDTH_PX: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeriesOptions {
    pub name: String,
    pub x: String,
    pub y: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#2ca02c".to_owned()
}

/// Vertical bars on the base SVG surface.
///
/// Indexed points carry the bar top centre; `extras[0]` is the bar width and
/// `extras[1]` its height in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    name: String,
    x_field: String,
    y_field: String,
    color: Color,
    selection: SelectionState,
}

impl BarSeries {
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
            color: Color::rgb(0.17, 0.63, 0.17),
            selection: SelectionState::default(),
        }
    }

    pub fn from_options(options: BarSeriesOptions) -> ChartResult<Self> {
        Ok(Self::new(options.name, options.x, options.y)
            .with_color(Color::from_hex(&options.color)?))
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Drawable for BarSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn surface_kind(&self) -> SurfaceKind {
        SurfaceKind::Svg
    }

    fn color(&self) -> Color {
        self.color
    }

    fn project(&self, ctx: &DrawContext<'_>) -> Vec<IndexedPoint> {
        let x_scale = ctx.scales.resolve(&self.x_field, true);
        let (width, centre_shift) = match x_scale {
            Some(scale) if scale.kind() == ScaleKind::Band => {
                (scale.bandwidth(), scale.bandwidth() / 2.0)
            }
            _ => (FALLBACK_BAR_WIDTH_PX, 0.0),
        };
        let baseline = ctx.geometry.height;
        project_xy(ctx.data, ctx.scales, &self.x_field, &self.y_field)
            .into_iter()
            .map(|mut point| {
                point.x += centre_shift;
                let height = baseline - point.y;
                point.with_extra(width).with_extra(height)
            })
            .collect()
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
        for point in points[start..end].iter().filter(|point| is_drawable(point)) {
            let width = point.extras.first().copied().unwrap_or(FALLBACK_BAR_WIDTH_PX);
            let height = point.extras.get(1).copied().unwrap_or(0.0);
            if !height.is_finite() || height < 0.0 {
                continue;
            }
            let mut rect =
                RectPrimitive::new(point.x - width / 2.0, point.y, width, height, self.color);
            if self.selection.is_selected() || selected_item == Some(point.datum) {
                rect = rect.with_border(2.0, Color::rgb(0.0, 0.0, 0.0));
            }
            frame.rects.push(rect);
        }
        frame
    }

    fn hit_radius(&self) -> f64 {
        MIN_HIT_RADIUS_PX
    }
}

impl TooltipAware for BarSeries {
    fn tooltip_fields(&self) -> Vec<String> {
        vec![self.x_field.clone(), self.y_field.clone()]
    }
}

impl Series for BarSeries {
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
