use tracing::warn;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{DragSelectionPlugin, GuideLinePlugin};
use crate::render::SurfaceFactory;
use crate::series::{BarSeries, LineSeries, ScatterSeries, Series};

use super::{Chart, ChartConfig, SeriesConfig};

/// Builds one series from a raw configuration entry.
pub fn series_from_config(value: &serde_json::Value) -> ChartResult<Box<dyn Series>> {
    let config: SeriesConfig = serde_json::from_value(value.clone())
        .map_err(|err| ChartError::InvalidConfig(format!("invalid series entry: {err}")))?;
    let series: Box<dyn Series> = match config {
        SeriesConfig::Line(options) => Box::new(LineSeries::from_options(options)?),
        SeriesConfig::Scatter(options) => Box::new(ScatterSeries::from_options(options)?),
        SeriesConfig::Bar(options) => Box::new(BarSeries::from_options(options)?),
    };
    Ok(series)
}

impl Chart {
    /// Bootstraps a complete chart from declarative configuration and draws
    /// it once.
    ///
    /// Series entries that fail to parse or collide with an earlier name are
    /// logged and skipped. A WebGL series whose context cannot be acquired
    /// aborts construction with `GpuContextUnavailable`.
    pub fn from_config(
        config: &ChartConfig,
        surface_factory: impl SurfaceFactory + 'static,
    ) -> ChartResult<Self> {
        let mut chart = Self::new(config, surface_factory)?;

        for (position, value) in config.series.iter().enumerate() {
            let series = match series_from_config(value) {
                Ok(series) => series,
                Err(err) => {
                    warn!(position, error = %err, "skipping series entry");
                    continue;
                }
            };
            match chart.add_series(series) {
                Ok(()) => {}
                Err(err @ ChartError::GpuContextUnavailable { .. }) => return Err(err),
                Err(err) => warn!(position, error = %err, "skipping series entry"),
            }
        }

        if config.zoom.guide_line {
            chart.register_plugin(Box::new(GuideLinePlugin::default()))?;
        }
        if config.zoom.enabled {
            chart.register_plugin(Box::new(DragSelectionPlugin::default()))?;
        }

        chart.draw()?;
        Ok(chart)
    }

    /// Parses JSON configuration and bootstraps the chart.
    pub fn from_json(
        json: &str,
        surface_factory: impl SurfaceFactory + 'static,
    ) -> ChartResult<Self> {
        let config = ChartConfig::from_json(json)?;
        Self::from_config(&config, surface_factory)
    }
}
