use tracing::{debug, trace};

use crate::core::{PlotGeometry, SpatialIndex, Viewport, build_scales};
use crate::error::ChartResult;
use crate::interaction::Millis;
use crate::render::{
    ChunkPlan, CirclePrimitive, Color, LegendEntry, RectPrimitive, RenderFrame, build_axis_frame,
    build_legend_frame,
};
use crate::series::DrawContext;

use super::chart::{ChartTask, DrawProgress};
use super::tooltip::tooltip_frame;
use super::{Chart, HostEvent};

const PROGRESS_BAR_PX: f64 = 3.0;
const HOVER_RING_PX: f64 = 2.0;

/// Outcome of drawing one chunk of a series.
struct ChunkOutcome {
    drawn: usize,
    total: usize,
    chunked: bool,
}

enum ClockStep {
    Hover(Millis),
    Timer(Millis),
}

impl Chart {
    /// Full redraw cycle.
    ///
    /// Geometry and scales are recomputed first, every series index is
    /// dropped, then surfaces are laid out, cleared and repainted in
    /// registration order. Index rebuilds are scheduled last, tagged with the
    /// new generation.
    pub fn draw(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        self.generation += 1;
        let generation = self.generation;

        self.geometry = PlotGeometry::new(self.viewport, self.margin)?;
        let geometry = self.geometry;
        self.scales = build_scales(&self.axes, &self.data, geometry, self.zoom.windows());
        self.zoom.set_plot_size(geometry.width, geometry.height);
        for registration in &mut self.registrations {
            registration.invalidate();
        }
        self.progress.clear();
        self.hide_tooltip();

        self.surfaces.layout(geometry)?;
        self.surfaces.clear_raster()?;
        if let Some(base) = self.surfaces.base().and_then(|id| self.surfaces.get_mut(id)) {
            base.clear()?;
            let axes = build_axis_frame(&self.axes, &self.scales, geometry, self.axis_style);
            if !axes.is_empty() {
                base.render(&axes)?;
            }
        }

        for position in 0..self.registrations.len() {
            if self.registrations[position].hidden {
                continue;
            }
            let ctx = DrawContext {
                data: &self.data,
                scales: &self.scales,
                geometry,
            };
            let registration = &mut self.registrations[position];
            registration.points = registration.series.project(&ctx);
            self.draw_series_chunk(position, 0, generation)?;
        }

        if self.legend_enabled && !self.registrations.is_empty() {
            let entries: Vec<LegendEntry> = self
                .registrations
                .iter()
                .map(|registration| LegendEntry {
                    name: registration.name().to_owned(),
                    color: registration.series.color(),
                    hidden: registration.hidden,
                })
                .collect();
            if let Some(base) = self.surfaces.base().and_then(|id| self.surfaces.get_mut(id)) {
                base.render(&build_legend_frame(&entries, geometry))?;
            }
        }

        for registration in self.registrations.iter().filter(|r| !r.hidden) {
            self.scheduler.schedule(
                self.tuning.index_rebuild_delay_ms,
                ChartTask::RebuildIndex {
                    generation,
                    series: registration.name().to_owned(),
                },
            );
        }

        debug!(
            generation,
            width = geometry.width,
            height = geometry.height,
            series = self.registrations.len(),
            zoomed = self.is_zoomed(),
            "chart redrawn"
        );
        self.repaint_overlay()
    }

    /// Applies a new container size and redraws. Returns `Ok(false)` when the
    /// chart was configured with resizing disabled.
    pub fn resize(&mut self, width: u32, height: u32) -> ChartResult<bool> {
        self.ensure_alive()?;
        if !self.is_resize {
            debug!(width, height, "resize ignored");
            return Ok(false);
        }
        let viewport = Viewport::new(width, height);
        PlotGeometry::new(viewport, self.margin)?;
        self.viewport = viewport;
        self.draw()?;
        Ok(true)
    }

    /// Advances the chart clock, firing the hover debounce and due timers in
    /// time order.
    pub fn advance_clock(&mut self, elapsed_ms: Millis) -> ChartResult<()> {
        let target = self.scheduler.now().saturating_add(elapsed_ms);
        loop {
            let hover_due = self.hover.deadline().filter(|due| *due <= target);
            let timer_due = self.scheduler.next_due().filter(|due| *due <= target);
            let step = match (hover_due, timer_due) {
                (None, None) => break,
                (Some(hover), Some(timer)) if timer < hover => ClockStep::Timer(timer),
                (Some(hover), _) => ClockStep::Hover(hover),
                (None, Some(timer)) => ClockStep::Timer(timer),
            };
            match step {
                ClockStep::Hover(due) => {
                    self.scheduler.set_now(due);
                    if let Some(position) = self.hover.poll(due) {
                        self.handle_hover(position)?;
                    }
                }
                ClockStep::Timer(due) => {
                    self.scheduler.set_now(due);
                    if let Some((_, task)) = self.scheduler.pop_due(due) {
                        self.run_task(task)?;
                    }
                }
            }
        }
        self.scheduler.set_now(target);
        Ok(())
    }

    /// Runs the clock until no debounce or timer is pending.
    pub fn run_until_idle(&mut self) -> ChartResult<()> {
        while let Some(due) = [self.hover.deadline(), self.scheduler.next_due()]
            .into_iter()
            .flatten()
            .min()
        {
            let elapsed = due.saturating_sub(self.scheduler.now());
            self.advance_clock(elapsed)?;
        }
        Ok(())
    }

    fn run_task(&mut self, task: ChartTask) -> ChartResult<()> {
        match task {
            ChartTask::RebuildIndex { generation, series } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        series = %series,
                        "discarding stale index rebuild"
                    );
                    return Ok(());
                }
                let (width, height) = (self.geometry.width, self.geometry.height);
                let Some(position) = self.position_of(&series) else {
                    return Ok(());
                };
                let registration = &mut self.registrations[position];
                let index = SpatialIndex::build(registration.points.clone(), width, height);
                trace!(series = %series, points = index.len(), generation, "spatial index built");
                registration.index = Some(index);
                Ok(())
            }
            ChartTask::DrawChunk {
                generation,
                series,
                chunk,
            } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        series = %series,
                        chunk,
                        "discarding stale draw chunk"
                    );
                    return Ok(());
                }
                let Some(position) = self.position_of(&series) else {
                    return Ok(());
                };
                self.draw_series_chunk(position, chunk, generation)?;
                self.repaint_overlay()
            }
        }
    }

    /// Draws chunk `chunk` of a registered series, reporting progress and
    /// scheduling the next turn when the series is chunked.
    fn draw_series_chunk(
        &mut self,
        position: usize,
        chunk: usize,
        generation: u64,
    ) -> ChartResult<()> {
        let outcome = self.render_chunk(position, chunk)?;
        if !outcome.chunked {
            return Ok(());
        }

        let series = self.registrations[position].name().to_owned();
        self.host_channel.publish(HostEvent::DrawProgress {
            series: series.clone(),
            drawn: outcome.drawn,
            total: outcome.total,
        });
        trace!(series = %series, drawn = outcome.drawn, total = outcome.total, "chunk drawn");

        self.progress.retain(|entry| entry.series != series);
        if outcome.drawn < outcome.total {
            self.progress.push(DrawProgress {
                series: series.clone(),
                drawn: outcome.drawn,
                total: outcome.total,
            });
            self.scheduler.schedule(
                self.tuning.chunk_turn_ms,
                ChartTask::DrawChunk {
                    generation,
                    series,
                    chunk: chunk + 1,
                },
            );
        }
        Ok(())
    }

    fn render_chunk(&mut self, position: usize, chunk: usize) -> ChartResult<ChunkOutcome> {
        let ctx = DrawContext {
            data: &self.data,
            scales: &self.scales,
            geometry: self.geometry,
        };
        let registration = &mut self.registrations[position];
        let total = registration.points.len();
        let plan = ChunkPlan::new(total, self.tuning.chunk_threshold, self.tuning.chunk_size);
        let Some(range) = plan.chunk(chunk) else {
            return Ok(ChunkOutcome {
                drawn: total,
                total,
                chunked: false,
            });
        };

        let frame = registration.series.draw(&registration.points, range.clone(), &ctx);
        registration.drawn = range.end;
        if !frame.is_empty() {
            if let Some(surface) = self.surfaces.get_mut(registration.surface) {
                surface.render(&frame)?;
            }
        }
        Ok(ChunkOutcome {
            drawn: range.end,
            total,
            chunked: plan.is_chunked(),
        })
    }

    /// Redraws the pointer-owning overlay: plugin primitives, the hovered
    /// point, the tooltip and the chunked-draw progress bar.
    pub(super) fn repaint_overlay(&mut self) -> ChartResult<()> {
        let Some(overlay) = self.surfaces.overlay() else {
            return Ok(());
        };
        let context = self.plugin_context();
        let mut frame = RenderFrame::new(self.viewport);
        for slot in &self.plugins {
            if let Some(extra) = slot.plugin.overlay(&context) {
                frame.extend(extra);
            }
        }

        if let Some(hovered) = &self.hovered {
            let color = self
                .registration(&hovered.series)
                .map_or(Color::rgb(0.2, 0.2, 0.2), |registration| {
                    registration.series.color()
                });
            let radius = self
                .registration(&hovered.series)
                .map_or(4.0, |registration| registration.hit_radius())
                + HOVER_RING_PX;
            frame.circles.push(CirclePrimitive::new(
                hovered.point.x,
                hovered.point.y,
                radius,
                color.with_alpha(0.35),
            ));
        }

        if let Some(tooltip) = &self.tooltip.shown {
            frame.extend(tooltip_frame(tooltip, self.viewport, self.geometry.width));
        }

        let (drawn, total) = self
            .progress
            .iter()
            .fold((0, 0), |(drawn, total), entry| (drawn + entry.drawn, total + entry.total));
        if total > 0 {
            let y = self.geometry.height - PROGRESS_BAR_PX;
            frame.rects.push(RectPrimitive::new(
                0.0,
                y,
                self.geometry.width,
                PROGRESS_BAR_PX,
                Color::rgba(0.0, 0.0, 0.0, 0.1),
            ));
            frame.rects.push(RectPrimitive::new(
                0.0,
                y,
                self.geometry.width * drawn as f64 / total as f64,
                PROGRESS_BAR_PX,
                Color::rgba(0.25, 0.5, 0.9, 0.8),
            ));
        }

        if let Some(surface) = self.surfaces.get_mut(overlay) {
            surface.clear()?;
            if !frame.is_empty() {
                surface.render(&frame)?;
            }
        }
        Ok(())
    }

    /// Chunked draws still in flight, as `(series, drawn, total)`.
    #[must_use]
    pub fn draw_progress(&self) -> Vec<(&str, usize, usize)> {
        self.progress
            .iter()
            .map(|entry| (entry.series.as_str(), entry.drawn, entry.total))
            .collect()
    }
}
