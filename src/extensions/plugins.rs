use serde::{Deserialize, Serialize};

use crate::core::PlotGeometry;
use crate::interaction::{ChartEvent, InteractionMode};
use crate::render::RenderFrame;

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub geometry: PlotGeometry,
    pub interaction_mode: InteractionMode,
    pub is_zoomed: bool,
    pub series_count: usize,
    pub generation: u64,
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe the chart's mouse and zoom channels in registration order
/// and may contribute primitives to the pointer-owning overlay. They never
/// mutate chart internals directly.
pub trait ChartPlugin {
    fn id(&self) -> &str;

    fn on_event(&mut self, event: &ChartEvent, context: &PluginContext);

    /// Overlay primitives in plot coordinates; `None` draws nothing.
    fn overlay(&self, context: &PluginContext) -> Option<RenderFrame> {
        let _ = context;
        None
    }
}
