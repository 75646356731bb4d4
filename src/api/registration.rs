use crate::core::{IndexedPoint, SpatialIndex, SurfaceId};
use crate::interaction::{ChartEvent, Subscription};
use crate::series::Series;

/// Binds a series to the chart: draw order, target surface, and the
/// per-series state the redraw cycle owns.
///
/// The zoom subscription lives as long as the registration; dropping the
/// registration detaches it from the chart's zoom channel.
pub struct SeriesRegistration {
    pub(super) series: Box<dyn Series>,
    pub(super) draw_order: usize,
    pub(super) surface: SurfaceId,
    /// The surface is dedicated to this series and released with it.
    pub(super) owns_surface: bool,
    pub(super) hidden: bool,
    pub(super) points: Vec<IndexedPoint>,
    pub(super) index: Option<SpatialIndex>,
    pub(super) drawn: usize,
    pub(super) zoom_events: Subscription<ChartEvent>,
}

impl std::fmt::Debug for SeriesRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesRegistration")
            .field("name", &self.series.name())
            .field("draw_order", &self.draw_order)
            .field("surface", &self.surface)
            .field("hidden", &self.hidden)
            .field("points", &self.points.len())
            .field("indexed", &self.index.is_some())
            .field("drawn", &self.drawn)
            .finish()
    }
}

impl SeriesRegistration {
    #[must_use]
    pub fn name(&self) -> &str {
        self.series.name()
    }

    #[must_use]
    pub fn series(&self) -> &dyn Series {
        self.series.as_ref()
    }

    #[must_use]
    pub fn draw_order(&self) -> usize {
        self.draw_order
    }

    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn hit_radius(&self) -> f64 {
        self.series.hit_radius()
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Items drawn so far in the current redraw cycle.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub(super) fn invalidate(&mut self) {
        self.index = None;
        self.points.clear();
        self.drawn = 0;
    }
}
