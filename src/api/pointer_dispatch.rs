use tracing::{debug, trace};

use crate::core::PixelPoint;
use crate::error::ChartResult;
use crate::interaction::{
    ChartEvent, ChartEventKind, HitCandidate, InteractionMode, PointerInput, PointerKind,
    pick_candidate,
};

use super::tooltip::{ShownTooltip, TooltipContext};
use super::{Chart, HostEvent};

impl Chart {
    /// Normalizes one raw pointer sample.
    ///
    /// Only the pointer-owning overlay is listened to; input naming any other
    /// surface is dropped. Moves are debounced before hit-testing, every other
    /// kind is handled synchronously.
    pub fn dispatch_pointer(&mut self, input: PointerInput) -> ChartResult<()> {
        if self.destroyed {
            return Ok(());
        }
        if !self.surfaces.accepts_pointer(input.surface) {
            trace!(
                surface = input.surface.raw(),
                kind = ?input.kind,
                "pointer input from non-owning surface ignored"
            );
            return Ok(());
        }
        match input.kind {
            PointerKind::Move => self.on_pointer_move(input),
            PointerKind::Down => self.on_pointer_down(input),
            PointerKind::Up => self.on_pointer_up(input),
            PointerKind::Leave => self.on_pointer_leave(input),
        }
    }

    /// Every indexed point within each visible series' hit radius.
    ///
    /// Series whose index has not been built yet contribute nothing.
    #[must_use]
    pub fn series_data_by_position(&self, position: PixelPoint) -> Vec<HitCandidate> {
        let mut candidates = Vec::new();
        for registration in self.registrations.iter().filter(|r| !r.hidden) {
            let Some(index) = &registration.index else {
                continue;
            };
            let radius = registration.hit_radius();
            for point in index.query_around(position.x, position.y, radius) {
                candidates.push(HitCandidate::new(
                    registration.name(),
                    registration.draw_order,
                    point.clone(),
                    position,
                ));
            }
        }
        candidates
    }

    /// Nearest candidate under the cursor, ties going to the topmost series
    /// and then to the later point.
    #[must_use]
    pub fn hit_test(&self, position: PixelPoint) -> Option<HitCandidate> {
        pick_candidate(&self.series_data_by_position(position)).cloned()
    }

    /// Forwards a selection toggle to a selectable series and redraws.
    /// Returns `false` when no such selectable series exists.
    pub fn select(&mut self, name: &str, selected: bool) -> ChartResult<bool> {
        self.ensure_alive()?;
        let Some(position) = self.position_of(name) else {
            return Ok(false);
        };
        let Some(selectable) = self.registrations[position].series.as_selectable() else {
            return Ok(false);
        };
        selectable.set_selected(selected);
        debug!(series = %name, selected, "series selection changed");
        self.draw()?;
        Ok(true)
    }

    /// Hides or shows a series and redraws. Hidden series are skipped by the
    /// draw pass and by hit-testing.
    pub fn hide(&mut self, name: &str, hidden: bool) -> ChartResult<bool> {
        self.ensure_alive()?;
        let Some(position) = self.position_of(name) else {
            return Ok(false);
        };
        self.registrations[position].hidden = hidden;
        debug!(series = %name, hidden, "series visibility changed");
        self.draw()?;
        Ok(true)
    }

    /// Installs a custom tooltip text builder, replacing the template.
    pub fn set_tooltip_text_parser(
        &mut self,
        parser: impl Fn(&TooltipContext<'_>) -> String + 'static,
    ) {
        self.tooltip.parser = Some(Box::new(parser));
    }

    pub fn clear_tooltip_text_parser(&mut self) {
        self.tooltip.parser = None;
    }

    fn on_pointer_move(&mut self, input: PointerInput) -> ChartResult<()> {
        let position = input.position;
        self.pointer.on_move(position);
        match self.pointer.mode() {
            InteractionMode::Dragging => {
                if let Some(rect) = self.zoom.drag(position) {
                    let event = ChartEvent::pointer(ChartEventKind::Drag, position, input.surface)
                        .with_selection(rect);
                    self.publish_mouse(event);
                }
            }
            InteractionMode::Pressed if self.should_start_drag(position) => {
                self.start_drag(input)?;
            }
            InteractionMode::Pressed | InteractionMode::Idle => {
                self.publish_mouse(ChartEvent::pointer(
                    ChartEventKind::MouseMove,
                    position,
                    input.surface,
                ));
                self.hover.push(position, self.scheduler.now());
            }
        }
        self.repaint_overlay()
    }

    fn on_pointer_down(&mut self, input: PointerInput) -> ChartResult<()> {
        self.pointer.on_down(input.position);
        self.publish_mouse(ChartEvent::pointer(
            ChartEventKind::MouseDown,
            input.position,
            input.surface,
        ));
        Ok(())
    }

    fn on_pointer_up(&mut self, input: PointerInput) -> ChartResult<()> {
        let position = input.position;
        let mode = self.pointer.mode();
        let origin = self.pointer.on_up(position);
        self.publish_mouse(ChartEvent::pointer(
            ChartEventKind::MouseUp,
            position,
            input.surface,
        ));

        if mode == InteractionMode::Dragging {
            let transition = self.zoom.release(position, &self.scales);
            return self.apply_zoom_transition(transition, position);
        }
        let is_click = origin
            .is_some_and(|origin| origin.distance_to(position) < self.tuning.click_slop_px);
        if is_click {
            self.publish_mouse(ChartEvent::pointer(
                ChartEventKind::Click,
                position,
                input.surface,
            ));
            return self.handle_click(position);
        }
        Ok(())
    }

    fn on_pointer_leave(&mut self, input: PointerInput) -> ChartResult<()> {
        self.hover.cancel();
        if self.zoom.is_dragging() {
            debug!("drag gesture cancelled by pointer leave");
            self.zoom.cancel();
        }
        self.pointer.on_leave();
        self.hide_tooltip();
        self.publish_mouse(ChartEvent::pointer(
            ChartEventKind::MouseLeave,
            input.position,
            input.surface,
        ));
        self.repaint_overlay()
    }

    fn should_start_drag(&self, position: PixelPoint) -> bool {
        self.zoom_enabled
            && self
                .pointer
                .pressed_at()
                .is_some_and(|origin| origin.distance_to(position) >= self.tuning.click_slop_px)
    }

    /// Enters the drag-zoom gesture. Pending hover work is dropped and the
    /// tooltip hidden until the gesture ends.
    fn start_drag(&mut self, input: PointerInput) -> ChartResult<()> {
        let Some(origin) = self.pointer.pressed_at() else {
            return Ok(());
        };
        self.pointer.on_drag_start();
        self.hover.cancel();
        self.hide_tooltip();

        let rect = self.zoom.drag_start(origin);
        self.publish_mouse(
            ChartEvent::pointer(ChartEventKind::DragStart, origin, input.surface)
                .with_selection(rect),
        );
        if let Some(rect) = self.zoom.drag(input.position) {
            self.publish_mouse(
                ChartEvent::pointer(ChartEventKind::Drag, input.position, input.surface)
                    .with_selection(rect),
            );
        }
        trace!(x = origin.x, y = origin.y, "drag gesture started");
        Ok(())
    }

    /// Debounced hover: one hit-test at the last cursor position.
    pub(super) fn handle_hover(&mut self, position: PixelPoint) -> ChartResult<()> {
        if self.pointer.mode() == InteractionMode::Dragging {
            return Ok(());
        }
        self.hover_hit_tests += 1;
        let candidates = self.series_data_by_position(position);
        self.show_point_and_tooltip(position, &candidates);
        self.repaint_overlay()
    }

    /// Highlights the winning candidate and shows its tooltip, or hides both
    /// when nothing is under the cursor.
    fn show_point_and_tooltip(&mut self, position: PixelPoint, candidates: &[HitCandidate]) {
        let Some(hit) = pick_candidate(candidates).cloned() else {
            self.hide_tooltip();
            return;
        };
        trace!(
            series = %hit.series,
            datum = hit.point.datum,
            x = position.x,
            y = position.y,
            "hover hit"
        );

        if self.tooltip.config.enabled {
            if let Some(text) = self.tooltip_text(&hit) {
                let anchor = PixelPoint::new(hit.point.x, hit.point.y);
                let tooltip = ShownTooltip {
                    series: hit.series.clone(),
                    index: hit.point.datum,
                    text,
                    position: anchor,
                };
                if self.tooltip.shown.as_ref() != Some(&tooltip) {
                    self.host_channel.publish(HostEvent::TooltipShown {
                        series: tooltip.series.clone(),
                        index: tooltip.index,
                        text: tooltip.text.clone(),
                        position: tooltip.position,
                    });
                    self.tooltip.shown = Some(tooltip);
                }
            }
        }
        self.hovered = Some(hit);
    }

    fn tooltip_text(&self, hit: &HitCandidate) -> Option<String> {
        let datum = self.data.get(hit.point.datum)?;
        let fields = self
            .registration(&hit.series)
            .and_then(|registration| registration.series.as_tooltip_aware())
            .map(|aware| aware.tooltip_fields())
            .unwrap_or_default();
        Some(self.tooltip.text(&TooltipContext {
            series: &hit.series,
            index: hit.point.datum,
            datum,
            fields: &fields,
        }))
    }

    pub(super) fn hide_tooltip(&mut self) {
        self.hovered = None;
        if self.tooltip.shown.take().is_some() {
            self.host_channel.publish(HostEvent::TooltipHidden);
        }
    }

    /// Synchronous click: publishes the hit item to the host and lets the
    /// series mark it selected. A click over empty plot is a degenerate zoom
    /// rectangle and zooms out.
    fn handle_click(&mut self, position: PixelPoint) -> ChartResult<()> {
        let Some(hit) = self.hit_test(position) else {
            trace!(x = position.x, y = position.y, "click without hit");
            if !self.zoom_enabled {
                return Ok(());
            }
            let transition = self.zoom.zoom_out();
            return self.apply_zoom_transition(transition, position);
        };
        let index = hit.point.datum;
        let Some(datum) = self.data.get(index).cloned() else {
            return Ok(());
        };
        self.host_channel.publish(HostEvent::ItemClick {
            series: hit.series.clone(),
            index,
            datum,
            position,
        });
        debug!(series = %hit.series, index, "item clicked");

        let Some(position) = self.position_of(&hit.series) else {
            return Ok(());
        };
        let Some(selectable) = self.registrations[position].series.as_selectable() else {
            return Ok(());
        };
        selectable.on_select_item(index);
        self.draw()
    }
}
