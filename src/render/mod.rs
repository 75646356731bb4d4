mod axis;
mod chunking;
mod frame;
mod legend;
mod null_renderer;
mod primitives;
mod surface;

pub use axis::{AxisStyle, build_axis_frame, format_tick, tick_count_for};
pub use chunking::{ChunkPlan, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_THRESHOLD};
pub use frame::RenderFrame;
pub use legend::{LegendEntry, build_legend_frame};
pub use null_renderer::{NullRenderer, NullSurfaceFactory, SurfaceLog};
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use surface::{Surface, SurfaceFactory, SurfaceKind, SurfaceRole, SurfaceStack};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend behind one surface.
///
/// Backends receive fully materialized `RenderFrame`s so drawing code stays
/// isolated from chart domain and interaction logic. `render` appends to what
/// the surface already shows; `clear` wipes it.
pub trait Renderer {
    /// Acquires the drawing context. GPU backends fail here when the host
    /// cannot provide one.
    fn acquire(&mut self) -> ChartResult<()> {
        Ok(())
    }

    /// Resizes the backing element in CSS pixels.
    fn resize(&mut self, width: u32, height: u32) -> ChartResult<()>;

    /// Positions the element (or its root group) relative to the container.
    fn set_offset(&mut self, x: f64, y: f64);

    fn set_pointer_events(&mut self, enabled: bool) {
        let _ = enabled;
    }

    fn clear(&mut self) -> ChartResult<()>;

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    /// Detaches the backing element. Called once when the chart is destroyed.
    fn release(&mut self) {}
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{
    CairoContextRenderer, CairoRenderStats, CairoRenderer, CairoSurfaceFactory,
};
