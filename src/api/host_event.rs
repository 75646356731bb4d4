use serde::{Deserialize, Serialize};

use crate::core::{Datum, PixelPoint};
use crate::interaction::ChartEvent;

/// Events a chart publishes to its host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A click landed on a rendered item.
    ItemClick {
        series: String,
        /// Index of the record in the chart data.
        index: usize,
        datum: Datum,
        position: PixelPoint,
    },
    /// Every zoom transition, including `not`.
    Zoom(ChartEvent),
    /// One chunk of a large series was drawn.
    DrawProgress {
        series: String,
        drawn: usize,
        total: usize,
    },
    TooltipShown {
        series: String,
        index: usize,
        text: String,
        position: PixelPoint,
    },
    TooltipHidden,
}
