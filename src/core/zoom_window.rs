use serde::{Deserialize, Serialize};

/// Per-axis domain override produced by a completed drag-zoom gesture.
///
/// Time axes store epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

impl ZoomWindow {
    /// Builds a window from two inverted drag corners in either order.
    #[must_use]
    pub fn from_corners(field: impl Into<String>, a: f64, b: f64) -> Self {
        Self {
            field: field.into(),
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Active zoom windows; empty means full extent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomWindows {
    windows: Vec<ZoomWindow>,
}

impl ZoomWindows {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_full_extent(&self) -> bool {
        self.windows.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&ZoomWindow> {
        self.windows.iter().find(|window| window.field == field)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ZoomWindow] {
        &self.windows
    }

    /// Inserts or replaces the window for `window.field`.
    pub fn apply(&mut self, window: ZoomWindow) {
        match self.windows.iter_mut().find(|w| w.field == window.field) {
            Some(existing) => *existing = window,
            None => self.windows.push(window),
        }
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ZoomWindow, ZoomWindows};

    #[test]
    fn apply_replaces_window_for_same_field() {
        let mut windows = ZoomWindows::new();
        windows.apply(ZoomWindow::from_corners("x", 10.0, 2.0));
        windows.apply(ZoomWindow::from_corners("x", 3.0, 4.0));
        assert_eq!(windows.as_slice().len(), 1);
        assert_eq!(windows.get("x").map(|w| (w.min, w.max)), Some((3.0, 4.0)));
        windows.clear();
        assert!(windows.is_full_extent());
    }
}
