//! Interaction plugins layered on the pointer-owning overlay.

mod drag_selection;
mod guide_line;
mod plugins;

pub use drag_selection::{DRAG_SELECTION_PLUGIN_ID, DragSelectionPlugin};
pub use guide_line::{GUIDE_LINE_PLUGIN_ID, GuideLinePlugin};
pub use plugins::{ChartPlugin, PluginContext};
