use serde::{Deserialize, Serialize};

use crate::core::{DomainValue, PixelPoint, PixelRect, SurfaceId};

/// Raw pointer input as delivered by a host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// One raw pointer sample in the coordinate space of the emitting surface.
///
/// Every surface shares the plot origin, so positions are plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub position: PixelPoint,
    pub surface: SurfaceId,
}

impl PointerInput {
    #[must_use]
    pub fn new(kind: PointerKind, x: f64, y: f64, surface: SurfaceId) -> Self {
        Self {
            kind,
            position: PixelPoint::new(x, y),
            surface,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartEventKind {
    MouseMove,
    MouseDown,
    MouseUp,
    MouseLeave,
    Click,
    DragStart,
    Drag,
    ZoomIn,
    ZoomOut,
    /// A zoom gesture that changed nothing.
    Not,
}

/// Axis direction restriction for drag-zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    Horizontal,
    Vertical,
    #[default]
    Both,
}

impl ZoomDirection {
    #[must_use]
    pub fn zooms_x(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    #[must_use]
    pub fn zooms_y(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPair<T> {
    pub x: T,
    pub y: T,
}

/// Inverted bounds of a completed drag-zoom gesture.
///
/// `start`/`end` are the drag corners pushed through the scales in gesture
/// order, so a descending vertical range yields `start.y > end.y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomPayload {
    pub direction: ZoomDirection,
    pub field: AxisPair<Option<String>>,
    pub start: AxisPair<Option<DomainValue>>,
    pub end: AxisPair<Option<DomainValue>>,
}

/// Normalized event published on a chart's channels. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEvent {
    pub kind: ChartEventKind,
    pub position: PixelPoint,
    pub target: SurfaceId,
    /// Clamped drag rectangle for `dragstart`/`drag`.
    pub selection: Option<PixelRect>,
    pub zoom: Option<ZoomPayload>,
}

impl ChartEvent {
    #[must_use]
    pub fn pointer(kind: ChartEventKind, position: PixelPoint, target: SurfaceId) -> Self {
        Self {
            kind,
            position,
            target,
            selection: None,
            zoom: None,
        }
    }

    #[must_use]
    pub fn with_selection(mut self, selection: PixelRect) -> Self {
        self.selection = Some(selection);
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomPayload) -> Self {
        self.zoom = Some(zoom);
        self
    }
}
