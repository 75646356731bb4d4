//! Series renderers.
//!
//! A series is composed from capability traits: every series is
//! `Drawable`; zoom, tooltip and selection support are opt-in and reached
//! through the `Series` accessors.

pub mod bar;
pub mod line;
pub mod projection;
pub mod scatter;

use std::ops::Range;

pub use bar::{BarSeries, BarSeriesOptions};
pub use line::{DotMode, LineSeries, LineSeriesOptions};
pub use scatter::{ScatterSeries, ScatterSeriesOptions};

use crate::core::{Datum, IndexedPoint, PlotGeometry, ScaleSet};
use crate::interaction::ChartEvent;
use crate::render::{Color, RenderFrame, SurfaceKind};

/// Everything a series needs to project and draw for one redraw cycle.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub data: &'a [Datum],
    pub scales: &'a ScaleSet,
    pub geometry: PlotGeometry,
}

pub trait Drawable {
    fn name(&self) -> &str;

    fn surface_kind(&self) -> SurfaceKind;

    fn color(&self) -> Color;

    /// Projects chart data to pixel space, one point per record in data order.
    fn project(&self, ctx: &DrawContext<'_>) -> Vec<IndexedPoint>;

    /// Primitives for `points[range]`. Points outside `range` may be read
    /// for continuity (line segments crossing chunk boundaries).
    fn draw(
        &self,
        points: &[IndexedPoint],
        range: Range<usize>,
        ctx: &DrawContext<'_>,
    ) -> RenderFrame;

    /// Search radius around the cursor for hover and click hit-tests.
    fn hit_radius(&self) -> f64;
}

pub trait ZoomAware {
    /// Called for every transition published on the zoom channel, before the
    /// chart redraws. For `zoomin`/`zoomout` the chart has already dropped the
    /// series index; `not` leaves it in place.
    fn on_zoom(&mut self, event: &ChartEvent);
}

pub trait TooltipAware {
    /// Record fields shown by the default tooltip text.
    fn tooltip_fields(&self) -> Vec<String>;
}

pub trait Selectable {
    fn set_selected(&mut self, selected: bool);

    fn is_selected(&self) -> bool;

    /// A click landed on record `datum` of this series.
    fn on_select_item(&mut self, datum: usize);

    fn selected_item(&self) -> Option<usize>;
}

/// A chart series: drawable plus optional capabilities.
pub trait Series: Drawable {
    fn as_zoom_aware(&mut self) -> Option<&mut dyn ZoomAware> {
        None
    }

    fn as_tooltip_aware(&self) -> Option<&dyn TooltipAware> {
        None
    }

    fn as_selectable(&mut self) -> Option<&mut dyn Selectable> {
        None
    }

    fn as_selectable_ref(&self) -> Option<&dyn Selectable> {
        None
    }
}

/// Selection state shared by the built-in series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SelectionState {
    selected: bool,
    item: Option<usize>,
}

impl Selectable for SelectionState {
    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        if !selected {
            self.item = None;
        }
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn on_select_item(&mut self, datum: usize) {
        self.item = Some(datum);
    }

    fn selected_item(&self) -> Option<usize> {
        self.item
    }
}
