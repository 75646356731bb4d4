mod chart;
mod config;
mod factory;
mod host_event;
mod plugin_dispatch;
mod plugin_registry;
mod pointer_dispatch;
mod redraw;
mod registration;
mod tooltip;
mod zoom_dispatch;

pub use chart::Chart;
pub use config::{
    ChartConfig, InteractionTuning, LegendConfig, SeriesConfig, TooltipConfig, ZoomConfig,
};
pub use factory::series_from_config;
pub use host_event::HostEvent;
pub use registration::SeriesRegistration;
pub use tooltip::{
    ShownTooltip, TooltipContext, TooltipTextParser, default_text, render_template,
};
