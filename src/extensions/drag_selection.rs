use crate::core::PixelRect;
use crate::interaction::{ChartEvent, ChartEventKind};
use crate::render::{Color, RectPrimitive, RenderFrame};

use super::{ChartPlugin, PluginContext};

pub const DRAG_SELECTION_PLUGIN_ID: &str = "drag-selection";

/// Translucent rectangle tracking an in-flight drag-zoom gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSelectionPlugin {
    selection: Option<PixelRect>,
    fill: Color,
    border: Color,
}

impl Default for DragSelectionPlugin {
    fn default() -> Self {
        Self {
            selection: None,
            fill: Color::rgba(0.25, 0.5, 0.9, 0.15),
            border: Color::rgba(0.25, 0.5, 0.9, 0.8),
        }
    }
}

impl DragSelectionPlugin {
    #[must_use]
    pub fn selection(&self) -> Option<PixelRect> {
        self.selection
    }
}

impl ChartPlugin for DragSelectionPlugin {
    fn id(&self) -> &str {
        DRAG_SELECTION_PLUGIN_ID
    }

    fn on_event(&mut self, event: &ChartEvent, _context: &PluginContext) {
        match event.kind {
            ChartEventKind::DragStart | ChartEventKind::Drag => self.selection = event.selection,
            ChartEventKind::ZoomIn
            | ChartEventKind::ZoomOut
            | ChartEventKind::Not
            | ChartEventKind::MouseLeave => self.selection = None,
            _ => {}
        }
    }

    fn overlay(&self, context: &PluginContext) -> Option<RenderFrame> {
        let rect = self.selection?;
        let x = rect.start.x.min(rect.end.x);
        let y = rect.start.y.min(rect.end.y);
        Some(
            RenderFrame::new(context.geometry.viewport).with_rect(
                RectPrimitive::new(x, y, rect.width().abs(), rect.height().abs(), self.fill)
                    .with_border(1.0, self.border),
            ),
        )
    }
}
