use tracing::debug;

use crate::core::{PixelPoint, SurfaceId};
use crate::error::ChartResult;
use crate::interaction::{ChartEvent, ChartEventKind, ZoomTransition};

use super::{Chart, HostEvent};

impl Chart {
    /// Clears every zoom window, or publishes `not` when the chart already
    /// shows the full extent.
    pub fn zoom_out(&mut self) -> ChartResult<ZoomTransition> {
        self.ensure_alive()?;
        let transition = self.zoom.zoom_out();
        let position = self.pointer.cursor().unwrap_or_default();
        self.apply_zoom_transition(transition.clone(), position)?;
        Ok(transition)
    }

    /// Publishes a completed transition and fans it out.
    ///
    /// The state machine has already been updated. Each series sees the
    /// event through its zoom subscription. A real zoom drops every index
    /// and redraws against the new windows; `not` keeps the indices and only
    /// refreshes the overlay.
    pub(super) fn apply_zoom_transition(
        &mut self,
        transition: ZoomTransition,
        position: PixelPoint,
    ) -> ChartResult<()> {
        let target = self
            .surfaces
            .pointer_owner()
            .unwrap_or_else(|| SurfaceId::new(0));
        let redraw = !matches!(transition, ZoomTransition::NoOp);
        let event = match transition {
            ZoomTransition::ZoomIn(payload) => {
                ChartEvent::pointer(ChartEventKind::ZoomIn, position, target).with_zoom(payload)
            }
            ZoomTransition::ZoomOut => {
                ChartEvent::pointer(ChartEventKind::ZoomOut, position, target)
            }
            ZoomTransition::NoOp => ChartEvent::pointer(ChartEventKind::Not, position, target),
        };
        debug!(
            kind = ?event.kind,
            windows = self.zoom.windows().as_slice().len(),
            "zoom transition"
        );

        self.zoom_channel.publish(event.clone());
        self.host_channel.publish(HostEvent::Zoom(event));

        for registration in &mut self.registrations {
            for event in registration.zoom_events.drain() {
                if redraw {
                    registration.index = None;
                }
                if let Some(zoom_aware) = registration.series.as_zoom_aware() {
                    zoom_aware.on_zoom(&event);
                }
            }
        }
        self.pump_plugins();

        if redraw {
            self.draw()
        } else {
            self.repaint_overlay()
        }
    }
}
