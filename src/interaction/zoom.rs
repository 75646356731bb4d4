//! Drag-rectangle zoom state machine.
//!
//! `Idle -> DragStart -> Dragging -> {ZoomIn | ZoomOut | NoOp} -> Idle`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    AxisScale, DomainValue, PixelPoint, PixelRect, ScaleSet, ZoomWindow, ZoomWindows,
};

use super::event::{AxisPair, ZoomDirection, ZoomPayload};

/// Minimum forward drag extent, in pixels, that counts as a zoom-in.
pub const MIN_ZOOM_DRAG_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoomPhase {
    Idle,
    DragStart { origin: PixelPoint },
    Dragging { origin: PixelPoint, rect: PixelRect },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZoomTransition {
    ZoomIn(ZoomPayload),
    ZoomOut,
    NoOp,
}

/// Owns the chart's zoom windows; renderers only ever read them.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomStateMachine {
    direction: ZoomDirection,
    phase: ZoomPhase,
    windows: ZoomWindows,
    plot_width: f64,
    plot_height: f64,
}

impl ZoomStateMachine {
    #[must_use]
    pub fn new(direction: ZoomDirection, plot_width: f64, plot_height: f64) -> Self {
        Self {
            direction,
            phase: ZoomPhase::Idle,
            windows: ZoomWindows::new(),
            plot_width,
            plot_height,
        }
    }

    #[must_use]
    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    #[must_use]
    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !matches!(self.phase, ZoomPhase::Idle)
    }

    #[must_use]
    pub fn windows(&self) -> &ZoomWindows {
        &self.windows
    }

    pub fn set_plot_size(&mut self, width: f64, height: f64) {
        self.plot_width = width;
        self.plot_height = height;
    }

    pub fn drag_start(&mut self, origin: PixelPoint) -> PixelRect {
        self.phase = ZoomPhase::DragStart { origin };
        self.selection_rect(origin, origin)
    }

    /// Recomputes the clamped selection; `None` when no gesture is active.
    pub fn drag(&mut self, position: PixelPoint) -> Option<PixelRect> {
        let origin = self.origin()?;
        let rect = self.selection_rect(origin, position);
        self.phase = ZoomPhase::Dragging { origin, rect };
        Some(rect)
    }

    /// Ends the gesture and decides the transition.
    ///
    /// The state machine is fully updated before this returns, so the
    /// caller can fan the redraw out against the new windows.
    pub fn release(&mut self, position: PixelPoint, scales: &ScaleSet) -> ZoomTransition {
        let Some(origin) = self.origin() else {
            return ZoomTransition::NoOp;
        };
        let rect = self.selection_rect(origin, position);
        self.phase = ZoomPhase::Idle;

        if self.is_forward(rect) {
            if let Some(payload) = self.zoom_in(rect, scales) {
                return ZoomTransition::ZoomIn(payload);
            }
            return ZoomTransition::NoOp;
        }
        self.zoom_out()
    }

    /// Clears every window, or reports a no-op at full extent.
    pub fn zoom_out(&mut self) -> ZoomTransition {
        if self.windows.is_full_extent() {
            debug!("zoom out at full extent is a no-op");
            return ZoomTransition::NoOp;
        }
        self.windows.clear();
        debug!("zoom windows cleared");
        ZoomTransition::ZoomOut
    }

    pub fn cancel(&mut self) {
        self.phase = ZoomPhase::Idle;
    }

    fn origin(&self) -> Option<PixelPoint> {
        match self.phase {
            ZoomPhase::Idle => None,
            ZoomPhase::DragStart { origin } | ZoomPhase::Dragging { origin, .. } => Some(origin),
        }
    }

    /// Clamped selection honouring the direction restriction.
    ///
    /// The restricted axis spans the full plot; free axes are clamped to
    /// `[1, size - 1]`.
    #[must_use]
    pub fn selection_rect(&self, origin: PixelPoint, position: PixelPoint) -> PixelRect {
        let clamp_x = |x: f64| x.clamp(1.0, (self.plot_width - 1.0).max(1.0));
        let clamp_y = |y: f64| y.clamp(1.0, (self.plot_height - 1.0).max(1.0));
        match self.direction {
            ZoomDirection::Horizontal => PixelRect::new(
                PixelPoint::new(clamp_x(origin.x), 0.0),
                PixelPoint::new(clamp_x(position.x), self.plot_height),
            ),
            ZoomDirection::Vertical => PixelRect::new(
                PixelPoint::new(0.0, clamp_y(origin.y)),
                PixelPoint::new(self.plot_width, clamp_y(position.y)),
            ),
            ZoomDirection::Both => PixelRect::new(
                PixelPoint::new(clamp_x(origin.x), clamp_y(origin.y)),
                PixelPoint::new(clamp_x(position.x), clamp_y(position.y)),
            ),
        }
    }

    fn is_forward(&self, rect: PixelRect) -> bool {
        let forward_x = rect.end.x - rect.start.x > MIN_ZOOM_DRAG_PX;
        let forward_y = rect.end.y - rect.start.y > MIN_ZOOM_DRAG_PX;
        match self.direction {
            ZoomDirection::Horizontal => forward_x,
            ZoomDirection::Vertical => forward_y,
            ZoomDirection::Both => forward_x && forward_y,
        }
    }

    fn zoom_in(&mut self, rect: PixelRect, scales: &ScaleSet) -> Option<ZoomPayload> {
        let mut payload = ZoomPayload {
            direction: self.direction,
            field: AxisPair::default(),
            start: AxisPair::default(),
            end: AxisPair::default(),
        };
        let mut windows = Vec::new();

        if self.direction.zooms_x() {
            if let Some(scale) = continuous(scales.primary_horizontal()) {
                let (window, start, end) = invert_span(scale, rect.start.x, rect.end.x)?;
                payload.field.x = Some(window.field.clone());
                payload.start.x = Some(start);
                payload.end.x = Some(end);
                windows.push(window);
            }
        }
        if self.direction.zooms_y() {
            if let Some(scale) = continuous(scales.primary_vertical()) {
                let (window, start, end) = invert_span(scale, rect.start.y, rect.end.y)?;
                payload.field.y = Some(window.field.clone());
                payload.start.y = Some(start);
                payload.end.y = Some(end);
                windows.push(window);
            }
        }

        if windows.is_empty() {
            debug!("zoom gesture has no continuous axis to zoom");
            return None;
        }
        for window in windows {
            debug!(
                field = %window.field,
                min = window.min,
                max = window.max,
                "zoom window applied"
            );
            self.windows.apply(window);
        }
        Some(payload)
    }
}

fn continuous(scale: Option<&AxisScale>) -> Option<&AxisScale> {
    scale.filter(|scale| scale.is_continuous())
}

fn invert_span(
    scale: &AxisScale,
    start_px: f64,
    end_px: f64,
) -> Option<(ZoomWindow, DomainValue, DomainValue)> {
    let start = scale.invert(start_px)?;
    let end = scale.invert(end_px)?;
    let window = ZoomWindow::from_corners(scale.field(), start.as_f64()?, end.as_f64()?);
    Some((window, start, end))
}
