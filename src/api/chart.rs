use tracing::debug;

use crate::core::{
    AxisDecl, Datum, Margin, PixelPoint, PlotGeometry, ScaleSet, SurfaceId, Viewport,
    ZoomWindows, build_scales,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartPlugin;
use crate::interaction::{
    ChartEvent, Debouncer, EventChannel, HitCandidate, InteractionMode, Millis, PointerState,
    Subscription, TaskScheduler, ZoomStateMachine,
};
use crate::render::{AxisStyle, SurfaceFactory, SurfaceKind, SurfaceRole, SurfaceStack};
use crate::series::Series;

use super::tooltip::{ShownTooltip, TooltipState};
use super::{ChartConfig, HostEvent, InteractionTuning, SeriesRegistration};

/// Deferred work owned by the chart clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ChartTask {
    RebuildIndex { generation: u64, series: String },
    DrawChunk {
        generation: u64,
        series: String,
        chunk: usize,
    },
}

impl ChartTask {
    pub(super) fn series(&self) -> &str {
        match self {
            Self::RebuildIndex { series, .. } | Self::DrawChunk { series, .. } => series,
        }
    }
}

pub(super) struct PluginSlot {
    pub(super) plugin: Box<dyn ChartPlugin>,
    pub(super) mouse_events: Subscription<ChartEvent>,
    pub(super) zoom_events: Subscription<ChartEvent>,
}

/// Chunked draw still in flight for one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DrawProgress {
    pub(super) series: String,
    pub(super) drawn: usize,
    pub(super) total: usize,
}

/// One interactive chart: stacked surfaces, registered series, the zoom
/// state machine and the channels connecting them.
///
/// The chart is single-threaded and host-driven. Pointer input enters through
/// `dispatch_pointer`, time through `advance_clock`.
pub struct Chart {
    pub(super) selector: String,
    pub(super) viewport: Viewport,
    pub(super) margin: Margin,
    pub(super) geometry: PlotGeometry,
    pub(super) axes: Vec<AxisDecl>,
    pub(super) data: Vec<Datum>,
    pub(super) scales: ScaleSet,
    pub(super) axis_style: AxisStyle,
    pub(super) legend_enabled: bool,
    pub(super) is_resize: bool,
    pub(super) tuning: InteractionTuning,
    pub(super) zoom_enabled: bool,
    pub(super) zoom: ZoomStateMachine,
    pub(super) pointer: PointerState,
    pub(super) hover: Debouncer<PixelPoint>,
    pub(super) scheduler: TaskScheduler<ChartTask>,
    pub(super) generation: u64,
    pub(super) surfaces: SurfaceStack,
    pub(super) surface_factory: Box<dyn SurfaceFactory>,
    pub(super) registrations: Vec<SeriesRegistration>,
    pub(super) plugins: Vec<PluginSlot>,
    pub(super) mouse_channel: EventChannel<ChartEvent>,
    pub(super) zoom_channel: EventChannel<ChartEvent>,
    pub(super) host_channel: EventChannel<HostEvent>,
    pub(super) tooltip: TooltipState,
    pub(super) hovered: Option<HitCandidate>,
    pub(super) progress: Vec<DrawProgress>,
    pub(super) hover_hit_tests: usize,
    pub(super) destroyed: bool,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("selector", &self.selector)
            .field("viewport", &self.viewport)
            .field("generation", &self.generation)
            .field("surfaces", &self.surfaces)
            .field("registrations", &self.registrations)
            .field("plugins", &self.plugins.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Chart {
    /// Creates the base and overlay surfaces. Series in `config` are not
    /// parsed here; see `Chart::from_config`.
    pub fn new(
        config: &ChartConfig,
        surface_factory: impl SurfaceFactory + 'static,
    ) -> ChartResult<Self> {
        let tuning = config.interaction.validate()?;
        let viewport = config.viewport();
        let geometry = PlotGeometry::new(viewport, config.margin)?;
        let scales = build_scales(&config.axes, &config.data, geometry, &ZoomWindows::new());

        let mut surface_factory: Box<dyn SurfaceFactory> = Box::new(surface_factory);
        let mut surfaces = SurfaceStack::new();
        surfaces.create(surface_factory.as_mut(), SurfaceKind::Svg, SurfaceRole::Base, None)?;
        surfaces.create(
            surface_factory.as_mut(),
            SurfaceKind::Svg,
            SurfaceRole::Overlay,
            None,
        )?;
        surfaces.layout(geometry)?;

        debug!(
            selector = %config.selector,
            width = viewport.width,
            height = viewport.height,
            axes = config.axes.len(),
            records = config.data.len(),
            "chart created"
        );

        Ok(Self {
            selector: config.selector.clone(),
            viewport,
            margin: config.margin,
            geometry,
            axes: config.axes.clone(),
            data: config.data.clone(),
            scales,
            axis_style: config.axis_style,
            legend_enabled: config.legend.enabled,
            is_resize: config.is_resize,
            tuning,
            zoom_enabled: config.zoom.enabled,
            zoom: ZoomStateMachine::new(config.zoom.direction, geometry.width, geometry.height),
            pointer: PointerState::default(),
            hover: Debouncer::new(tuning.hover_debounce_ms),
            scheduler: TaskScheduler::new(),
            generation: 0,
            surfaces,
            surface_factory,
            registrations: Vec::new(),
            plugins: Vec::new(),
            mouse_channel: EventChannel::new("mouse"),
            zoom_channel: EventChannel::new("zoom"),
            host_channel: EventChannel::new("host"),
            tooltip: TooltipState::new(config.tooltip.clone()),
            hovered: None,
            progress: Vec::new(),
            hover_hit_tests: 0,
            destroyed: false,
        })
    }

    /// Registers a series after the existing ones.
    ///
    /// Canvas and WebGL series get a dedicated surface stacked below the
    /// overlay; SVG series draw on the base surface. Takes effect on the next
    /// `draw()`.
    pub fn add_series(&mut self, series: Box<dyn Series>) -> ChartResult<()> {
        self.ensure_alive()?;
        let name = series.name().to_owned();
        if name.is_empty() {
            return Err(ChartError::InvalidConfig(
                "series name must not be empty".to_owned(),
            ));
        }
        if self.registration(&name).is_some() {
            return Err(ChartError::InvalidConfig(format!(
                "series `{name}` is already registered"
            )));
        }

        let kind = series.surface_kind();
        let (surface, owns_surface) = if kind.is_raster() {
            let id = self.surfaces.create(
                self.surface_factory.as_mut(),
                kind,
                SurfaceRole::Series,
                Some(&name),
            )?;
            self.surfaces.layout(self.geometry)?;
            (id, true)
        } else {
            (self.base_surface()?, false)
        };

        let draw_order = self.registrations.len();
        debug!(series = %name, ?kind, draw_order, surface = surface.raw(), "series registered");
        self.registrations.push(SeriesRegistration {
            series,
            draw_order,
            surface,
            owns_surface,
            hidden: false,
            points: Vec::new(),
            index: None,
            drawn: 0,
            zoom_events: self.zoom_channel.subscribe(),
        });
        Ok(())
    }

    /// Unregisters a series, releasing its dedicated surface and any pending
    /// work. Returns `true` when removed.
    pub fn remove_series(&mut self, name: &str) -> bool {
        let Some(position) = self.position_of(name) else {
            return false;
        };
        let registration = self.registrations.remove(position);
        if registration.owns_surface {
            self.surfaces.remove(registration.surface);
        }
        self.scheduler.cancel_where(|task| task.series() == name);
        self.progress.retain(|entry| entry.series != name);
        if self
            .hovered
            .as_ref()
            .is_some_and(|hovered| hovered.series == name)
        {
            self.hide_tooltip();
        }
        for (order, registration) in self.registrations.iter_mut().enumerate() {
            registration.draw_order = order;
        }
        debug!(series = %name, "series removed");
        true
    }

    /// Replaces every series and redraws.
    pub fn set_series(&mut self, series: Vec<Box<dyn Series>>) -> ChartResult<()> {
        let names: Vec<String> = self
            .registrations
            .iter()
            .map(|registration| registration.name().to_owned())
            .collect();
        for name in &names {
            self.remove_series(name);
        }
        for entry in series {
            self.add_series(entry)?;
        }
        self.draw()
    }

    /// Replaces the chart data and redraws. Zoom windows are kept.
    pub fn set_data(&mut self, data: Vec<Datum>) -> ChartResult<()> {
        self.ensure_alive()?;
        self.data = data;
        self.draw()
    }

    /// Host-facing event stream: item clicks, zoom transitions, draw progress
    /// and tooltip changes.
    pub fn subscribe(&mut self) -> Subscription<HostEvent> {
        self.host_channel.subscribe()
    }

    /// Raw normalized pointer events, as seen by plugins.
    pub fn subscribe_mouse(&mut self) -> Subscription<ChartEvent> {
        self.mouse_channel.subscribe()
    }

    pub fn subscribe_zoom(&mut self) -> Subscription<ChartEvent> {
        self.zoom_channel.subscribe()
    }

    /// Detaches every series and plugin, cancels pending timers and releases
    /// all surfaces. Further operations fail or are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.hover.cancel();
        self.scheduler.clear();
        self.zoom.cancel();
        self.pointer.on_leave();
        self.registrations.clear();
        self.plugins.clear();
        self.surfaces.release_all();
        self.tooltip.shown = None;
        self.hovered = None;
        self.progress.clear();
        self.destroyed = true;
        debug!(selector = %self.selector, "chart destroyed");
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn geometry(&self) -> PlotGeometry {
        self.geometry
    }

    #[must_use]
    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    /// Scale snapshot of the last redraw.
    #[must_use]
    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    #[must_use]
    pub fn zoom_windows(&self) -> &ZoomWindows {
        self.zoom.windows()
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        !self.zoom.windows().is_full_extent()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.pointer.mode()
    }

    /// Redraw counter; deferred work scheduled under an older value is stale.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current value of the host-driven clock.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    #[must_use]
    pub fn surfaces(&self) -> &SurfaceStack {
        &self.surfaces
    }

    /// Surface a pointer input must name to be handled.
    #[must_use]
    pub fn pointer_surface(&self) -> Option<SurfaceId> {
        self.surfaces.pointer_owner()
    }

    #[must_use]
    pub fn registrations(&self) -> &[SeriesRegistration] {
        &self.registrations
    }

    #[must_use]
    pub fn registration(&self, name: &str) -> Option<&SeriesRegistration> {
        self.registrations
            .iter()
            .find(|registration| registration.name() == name)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn has_index(&self, name: &str) -> bool {
        self.registration(name)
            .is_some_and(SeriesRegistration::is_indexed)
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&ShownTooltip> {
        self.tooltip.shown.as_ref()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HitCandidate> {
        self.hovered.as_ref()
    }

    /// Number of debounced hover hit-tests run so far.
    #[must_use]
    pub fn hover_hit_tests(&self) -> usize {
        self.hover_hit_tests
    }

    /// Pending deferred tasks (index rebuilds and draw chunks).
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub(super) fn position_of(&self, name: &str) -> Option<usize> {
        self.registrations
            .iter()
            .position(|registration| registration.name() == name)
    }

    pub(super) fn ensure_alive(&self) -> ChartResult<()> {
        if self.destroyed {
            return Err(ChartError::InvalidConfig(format!(
                "chart `{}` has been destroyed",
                self.selector
            )));
        }
        Ok(())
    }

    fn base_surface(&self) -> ChartResult<SurfaceId> {
        self.surfaces.base().ok_or_else(|| {
            ChartError::InvalidConfig("chart has no base surface".to_owned())
        })
    }
}
