use crate::core::PixelPoint;
use crate::interaction::{ChartEvent, ChartEventKind};
use crate::render::{Color, LinePrimitive, RenderFrame};

use super::{ChartPlugin, PluginContext};

pub const GUIDE_LINE_PLUGIN_ID: &str = "guide-line";

/// Crosshair lines following the cursor across the plot area.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLinePlugin {
    cursor: Option<PixelPoint>,
    color: Color,
}

impl Default for GuideLinePlugin {
    fn default() -> Self {
        Self {
            cursor: None,
            color: Color::rgba(0.3, 0.3, 0.3, 0.6),
        }
    }
}

impl GuideLinePlugin {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn cursor(&self) -> Option<PixelPoint> {
        self.cursor
    }
}

impl ChartPlugin for GuideLinePlugin {
    fn id(&self) -> &str {
        GUIDE_LINE_PLUGIN_ID
    }

    fn on_event(&mut self, event: &ChartEvent, context: &PluginContext) {
        match event.kind {
            ChartEventKind::MouseMove if context.geometry.contains(event.position) => {
                self.cursor = Some(event.position);
            }
            ChartEventKind::MouseMove
            | ChartEventKind::MouseLeave
            | ChartEventKind::DragStart => self.cursor = None,
            _ => {}
        }
    }

    fn overlay(&self, context: &PluginContext) -> Option<RenderFrame> {
        let cursor = self.cursor?;
        let geometry = context.geometry;
        Some(
            RenderFrame::new(geometry.viewport)
                .with_line(LinePrimitive::new(
                    cursor.x,
                    0.0,
                    cursor.x,
                    geometry.height,
                    1.0,
                    self.color,
                ))
                .with_line(LinePrimitive::new(
                    0.0,
                    cursor.y,
                    geometry.width,
                    cursor.y,
                    1.0,
                    self.color,
                )),
        )
    }
}
