use serde::{Deserialize, Serialize};

use crate::core::{AxisDecl, Datum, Margin, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{Millis, ZoomDirection};
use crate::render::{AxisStyle, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_THRESHOLD};
use crate::series::{BarSeriesOptions, LineSeriesOptions, ScatterSeriesOptions};

/// Declarative series entry, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesConfig {
    Line(LineSeriesOptions),
    Scatter(ScatterSeriesOptions),
    Bar(BarSeriesOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub enabled: bool,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Tooltip options. `template` substitutes `{field}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub enabled: bool,
    pub template: Option<String>,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            template: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub enabled: bool,
    pub direction: ZoomDirection,
    /// Draws crosshair guide lines under the cursor.
    pub guide_line: bool,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: ZoomDirection::Both,
            guide_line: true,
        }
    }
}

/// Runtime knobs of the interaction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    pub hover_debounce_ms: Millis,
    pub index_rebuild_delay_ms: Millis,
    pub chunk_threshold: usize,
    pub chunk_size: usize,
    /// Delay between two chunk turns, roughly one animation frame.
    pub chunk_turn_ms: Millis,
    /// Maximum pointer travel, in pixels, for a press/release to be a click.
    pub click_slop_px: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            hover_debounce_ms: 50,
            index_rebuild_delay_ms: 200,
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_turn_ms: 16,
            click_slop_px: 3.0,
        }
    }
}

impl InteractionTuning {
    #[must_use]
    pub fn with_hover_debounce_ms(mut self, delay: Millis) -> Self {
        self.hover_debounce_ms = delay;
        self
    }

    #[must_use]
    pub fn with_index_rebuild_delay_ms(mut self, delay: Millis) -> Self {
        self.index_rebuild_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn with_chunking(mut self, threshold: usize, chunk_size: usize) -> Self {
        self.chunk_threshold = threshold;
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_chunk_turn_ms(mut self, delay: Millis) -> Self {
        self.chunk_turn_ms = delay;
        self
    }

    #[must_use]
    pub fn with_click_slop_px(mut self, slop: f64) -> Self {
        self.click_slop_px = slop;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.chunk_size == 0 {
            return Err(ChartError::InvalidConfig(
                "chunk size must be > 0".to_owned(),
            ));
        }
        if !self.click_slop_px.is_finite() || self.click_slop_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "click slop must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Public chart bootstrap configuration.
///
/// Series entries stay raw JSON until chart construction so that one bad
/// entry is skipped instead of rejecting the whole chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub selector: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub data: Vec<Datum>,
    #[serde(default)]
    pub axes: Vec<AxisDecl>,
    #[serde(default)]
    pub series: Vec<serde_json::Value>,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub legend: LegendConfig,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default = "default_is_resize")]
    pub is_resize: bool,
    #[serde(default)]
    pub interaction: InteractionTuning,
    #[serde(default)]
    pub axis_style: AxisStyle,
}

fn default_is_resize() -> bool {
    true
}

impl ChartConfig {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            selector: String::new(),
            width,
            height,
            data: Vec::new(),
            axes: Vec::new(),
            series: Vec::new(),
            margin: Margin::default(),
            legend: LegendConfig::default(),
            tooltip: TooltipConfig::default(),
            zoom: ZoomConfig::default(),
            is_resize: true,
            interaction: InteractionTuning::default(),
            axis_style: AxisStyle::default(),
        }
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| {
                ChartError::InvalidConfig(format!("failed to parse chart config: {err}"))
            })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ChartError::InvalidConfig(format!("failed to serialize chart config: {err}"))
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<Datum>) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisDecl) -> Self {
        self.axes.push(axis);
        self
    }

    /// Appends a typed series entry.
    #[must_use]
    pub fn with_series(mut self, series: SeriesConfig) -> Self {
        // Serializing a plain data enum cannot fail.
        if let Ok(value) = serde_json::to_value(series) {
            self.series.push(value);
        }
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, enabled: bool) -> Self {
        self.legend.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_resize(mut self, is_resize: bool) -> Self {
        self.is_resize = is_resize;
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: InteractionTuning) -> Self {
        self.interaction = interaction;
        self
    }
}
