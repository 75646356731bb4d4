//! stacked-chart: interactive chart core.
//!
//! Scales derived from axis declarations, quadtree hit-testing, a drag-zoom
//! state machine and a redraw coordinator that keeps several stacked
//! rendering surfaces (SVG, canvas, WebGL) aligned on one plot origin.
//! Backends plug in through `render::Renderer` and `render::SurfaceFactory`.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{Chart, ChartConfig, HostEvent, SeriesConfig};
pub use error::{ChartError, ChartResult};
