pub mod axis;
pub mod datum;
pub mod scale;
pub mod scale_builder;
pub mod spatial_index;
pub mod timestamp;
pub mod types;
pub mod zoom_window;

pub use axis::{AxisDecl, AxisType, Placement};
pub use datum::{Datum, DomainValue, FieldValue};
pub use scale::{AxisScale, BandScale, LinearScale, ScaleKind, ScaleMapping, Tick};
pub use scale_builder::{ScaleSet, build_scales};
pub use spatial_index::{IndexedPoint, SpatialIndex};
pub use types::{Margin, PixelPoint, PixelRect, PlotGeometry, SurfaceId, Viewport};
pub use zoom_window::{ZoomWindow, ZoomWindows};
