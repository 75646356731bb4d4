pub mod channel;
pub mod debounce;
pub mod event;
pub mod scheduler;
pub mod zoom;

pub use channel::{EventChannel, Subscription, SubscriptionId};
pub use debounce::{Debouncer, Millis};
pub use event::{
    AxisPair, ChartEvent, ChartEventKind, PointerInput, PointerKind, ZoomDirection, ZoomPayload,
};
pub use hit_test::{HitCandidate, pick_candidate};
pub use scheduler::{TaskScheduler, TimerId};
pub use zoom::{MIN_ZOOM_DRAG_PX, ZoomPhase, ZoomStateMachine, ZoomTransition};

use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    /// Button held, movement still under the click slop.
    Pressed,
    /// Drag-zoom gesture in progress; hover handling is suppressed.
    Dragging,
}

/// Pointer state of the pointer-owning surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    mode: InteractionMode,
    pressed_at: Option<PixelPoint>,
    cursor: Option<PixelPoint>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            pressed_at: None,
            cursor: None,
        }
    }
}

impl PointerState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn cursor(self) -> Option<PixelPoint> {
        self.cursor
    }

    #[must_use]
    pub fn pressed_at(self) -> Option<PixelPoint> {
        self.pressed_at
    }

    pub fn on_down(&mut self, position: PixelPoint) {
        self.mode = InteractionMode::Pressed;
        self.pressed_at = Some(position);
        self.cursor = Some(position);
    }

    pub fn on_move(&mut self, position: PixelPoint) {
        self.cursor = Some(position);
    }

    pub fn on_drag_start(&mut self) {
        self.mode = InteractionMode::Dragging;
    }

    /// Returns the press origin and resets to idle.
    pub fn on_up(&mut self, position: PixelPoint) -> Option<PixelPoint> {
        self.mode = InteractionMode::Idle;
        self.cursor = Some(position);
        self.pressed_at.take()
    }

    pub fn on_leave(&mut self) {
        *self = Self::default();
    }
}
