use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::axis::{AxisDecl, AxisType};
use crate::core::datum::{Datum, FieldValue};
use crate::core::scale::{AxisScale, BandScale, LinearScale, ScaleMapping, nice_domain};
use crate::core::types::PlotGeometry;
use crate::core::zoom_window::ZoomWindows;

const AUTO_PAD_RATIO: f64 = 0.05;
const ROUND_TICK_COUNT: usize = 10;
const DEFAULT_BAND_PADDING: f64 = 0.0;
const DEFAULT_POINT_PADDING: f64 = 0.1;

/// Immutable set of axis scales for one redraw cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleSet {
    scales: Vec<AxisScale>,
}

impl ScaleSet {
    #[must_use]
    pub fn new(scales: Vec<AxisScale>) -> Self {
        Self { scales }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[AxisScale] {
        &self.scales
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisScale> {
        self.scales.iter()
    }

    #[must_use]
    pub fn by_field(&self, field: &str) -> Option<&AxisScale> {
        self.scales.iter().find(|scale| scale.field() == field)
    }

    /// First axis placed at the top or bottom.
    #[must_use]
    pub fn primary_horizontal(&self) -> Option<&AxisScale> {
        self.scales
            .iter()
            .find(|scale| scale.placement().is_horizontal())
    }

    /// First axis placed at the left or right.
    #[must_use]
    pub fn primary_vertical(&self) -> Option<&AxisScale> {
        self.scales
            .iter()
            .find(|scale| !scale.placement().is_horizontal())
    }

    /// Scale for `field`, falling back to the primary axis of the orientation.
    #[must_use]
    pub fn resolve(&self, field: &str, horizontal: bool) -> Option<&AxisScale> {
        self.by_field(field)
            .filter(|scale| scale.placement().is_horizontal() == horizontal)
            .or_else(|| {
                if horizontal {
                    self.primary_horizontal()
                } else {
                    self.primary_vertical()
                }
            })
    }
}

/// Derives one scale per declared axis.
///
/// Pure function of its inputs. Zoom windows win over explicit bounds, which
/// win over bounds derived from data. Records whose field is missing or not
/// numeric are skipped; when no record qualifies the bounds are NaN.
#[must_use]
pub fn build_scales(
    axes: &[AxisDecl],
    data: &[Datum],
    geometry: PlotGeometry,
    zoom: &ZoomWindows,
) -> ScaleSet {
    let scales = axes
        .iter()
        .map(|axis| build_axis_scale(axis, data, geometry, zoom))
        .collect();
    ScaleSet::new(scales)
}

fn build_axis_scale(
    axis: &AxisDecl,
    data: &[Datum],
    geometry: PlotGeometry,
    zoom: &ZoomWindows,
) -> AxisScale {
    let range = if axis.placement.is_horizontal() {
        (0.0, geometry.width)
    } else {
        (geometry.height, 0.0)
    };

    let mapping = match axis.axis_type {
        AxisType::Number => {
            let domain = match zoom.get(&axis.field) {
                Some(window) => (window.min, window.max),
                None => numeric_domain(axis, data),
            };
            ScaleMapping::Linear(LinearScale::new(domain, range))
        }
        AxisType::Time => {
            let domain = match zoom.get(&axis.field) {
                Some(window) => (window.min, window.max),
                None => time_domain(axis, data),
            };
            ScaleMapping::Time(LinearScale::new(domain, range))
        }
        AxisType::String => ScaleMapping::Band(BandScale::band(
            categories(axis, data),
            range,
            axis.padding.unwrap_or(DEFAULT_BAND_PADDING),
        )),
        AxisType::Point => ScaleMapping::Point(BandScale::point(
            categories(axis, data),
            range,
            axis.padding.unwrap_or(DEFAULT_POINT_PADDING),
        )),
    };

    let scale = AxisScale::new(axis.field.clone(), axis.placement, mapping);
    trace!(
        field = %axis.field,
        kind = ?scale.kind(),
        domain = ?scale.domain_bounds(),
        range = ?scale.range_pixels(),
        "built axis scale"
    );
    scale
}

fn numeric_domain(axis: &AxisDecl, data: &[Datum]) -> (f64, f64) {
    let needs_extent = axis.min.is_none() || axis.max.is_none();
    let extent = if needs_extent {
        extent(data, &axis.field, FieldValue::as_number)
    } else {
        (f64::NAN, f64::NAN)
    };

    let min = axis.min.unwrap_or_else(|| pad_down(extent.0));
    let max = axis.max.unwrap_or_else(|| pad_up(extent.1));

    if axis.is_round {
        nice_domain(min, max, ROUND_TICK_COUNT)
    } else {
        (min, max)
    }
}

fn time_domain(axis: &AxisDecl, data: &[Datum]) -> (f64, f64) {
    let needs_extent = axis.min.is_none() || axis.max.is_none();
    let extent = if needs_extent {
        extent(data, &axis.field, FieldValue::as_time_millis)
    } else {
        (f64::NAN, f64::NAN)
    };
    (axis.min.unwrap_or(extent.0), axis.max.unwrap_or(extent.1))
}

fn categories(axis: &AxisDecl, data: &[Datum]) -> Vec<String> {
    if let Some(domain) = &axis.domain {
        return domain.clone();
    }
    let distinct: IndexSet<String> = data
        .iter()
        .filter_map(|datum| datum.get(&axis.field).and_then(FieldValue::as_category))
        .collect();
    distinct.into_iter().collect()
}

fn extent(data: &[Datum], field: &str, value_of: fn(&FieldValue) -> Option<f64>) -> (f64, f64) {
    let mut values = data
        .iter()
        .filter_map(|datum| datum.get(field).and_then(value_of));
    match values.next() {
        Some(first) => values.fold((first, first), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        }),
        None => (f64::NAN, f64::NAN),
    }
}

fn pad_up(value: f64) -> f64 {
    value + (value.abs() * AUTO_PAD_RATIO).round()
}

fn pad_down(value: f64) -> f64 {
    value - (value.abs() * AUTO_PAD_RATIO).round()
}
