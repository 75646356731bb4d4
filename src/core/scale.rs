use serde::{Deserialize, Serialize};

use crate::core::axis::Placement;
use crate::core::datum::{DomainValue, FieldValue};

const MILLIS_PER_SECOND: f64 = 1_000.0;
const TIME_TICK_INTERVALS_MS: [f64; 18] = [
    MILLIS_PER_SECOND,
    5.0 * MILLIS_PER_SECOND,
    15.0 * MILLIS_PER_SECOND,
    30.0 * MILLIS_PER_SECOND,
    60.0 * MILLIS_PER_SECOND,
    300.0 * MILLIS_PER_SECOND,
    900.0 * MILLIS_PER_SECOND,
    1_800.0 * MILLIS_PER_SECOND,
    3_600.0 * MILLIS_PER_SECOND,
    10_800.0 * MILLIS_PER_SECOND,
    21_600.0 * MILLIS_PER_SECOND,
    43_200.0 * MILLIS_PER_SECOND,
    86_400.0 * MILLIS_PER_SECOND,
    172_800.0 * MILLIS_PER_SECOND,
    604_800.0 * MILLIS_PER_SECOND,
    2_592_000.0 * MILLIS_PER_SECOND,
    7_776_000.0 * MILLIS_PER_SECOND,
    31_536_000.0 * MILLIS_PER_SECOND,
];
const MAX_TICKS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Time,
    Band,
    Point,
}

/// Continuous domain-to-pixel mapping.
///
/// Construction never validates: NaN or infinite bounds propagate into the
/// mapped pixels so callers see unusable positions instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return (self.range_start + self.range_end) / 2.0;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Ordinal mapping shared by band and point axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    categories: Vec<String>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
    is_point: bool,
}

impl BandScale {
    /// Band layout: inner and outer padding both equal `padding`, centred.
    #[must_use]
    pub fn band(categories: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = categories.len() as f64;
        let (low, high) = ordered(range);
        let step = (high - low) / (n - padding + 2.0 * padding).max(1.0);
        let start = low + (high - low - step * (n - padding)) * 0.5;
        Self {
            categories,
            range,
            padding,
            start,
            step,
            bandwidth: step * (1.0 - padding),
            is_point: false,
        }
    }

    /// Point layout: zero-width bands with `padding` steps of outer space.
    #[must_use]
    pub fn point(categories: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = categories.len() as f64;
        let (low, high) = ordered(range);
        let step = (high - low) / (n - 1.0 + 2.0 * padding).max(1.0);
        let start = low + (high - low - step * (n - 1.0).max(0.0)) * 0.5;
        Self {
            categories,
            range,
            padding,
            start,
            step,
            bandwidth: 0.0,
            is_point: true,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    fn is_reversed(&self) -> bool {
        self.range.1 < self.range.0
    }

    fn slot_of(&self, index: usize) -> usize {
        if self.is_reversed() {
            self.categories.len() - 1 - index
        } else {
            index
        }
    }

    /// Leading pixel edge of the category's band (its position for points).
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.categories.iter().position(|c| c == category)?;
        Some(self.start + self.step * self.slot_of(index) as f64)
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<&str> {
        if self.categories.is_empty() || !pixel.is_finite() || self.step <= 0.0 {
            return None;
        }
        let offset = (pixel - self.start) / self.step;
        let last = (self.categories.len() - 1) as f64;
        let slot = if self.is_point {
            offset.round().clamp(0.0, last)
        } else {
            if offset < 0.0 || offset >= self.categories.len() as f64 {
                return None;
            }
            offset.floor()
        };
        let index = self.slot_of(slot as usize);
        self.categories.get(index).map(String::as_str)
    }
}

fn ordered(range: (f64, f64)) -> (f64, f64) {
    if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScaleMapping {
    Linear(LinearScale),
    /// Linear over epoch milliseconds.
    Time(LinearScale),
    Band(BandScale),
    Point(BandScale),
}

/// One tick of an axis: its domain value and pixel position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: DomainValue,
    pub pixel: f64,
}

/// Immutable per-axis scale snapshot.
///
/// Snapshots are rebuilt whenever data, geometry, or zoom windows change and
/// are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    field: String,
    placement: Placement,
    mapping: ScaleMapping,
}

impl AxisScale {
    #[must_use]
    pub fn new(field: impl Into<String>, placement: Placement, mapping: ScaleMapping) -> Self {
        Self {
            field: field.into(),
            placement,
            mapping,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn mapping(&self) -> &ScaleMapping {
        &self.mapping
    }

    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self.mapping {
            ScaleMapping::Linear(_) => ScaleKind::Linear,
            ScaleMapping::Time(_) => ScaleKind::Time,
            ScaleMapping::Band(_) => ScaleKind::Band,
            ScaleMapping::Point(_) => ScaleKind::Point,
        }
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self.mapping, ScaleMapping::Linear(_) | ScaleMapping::Time(_))
    }

    /// `(domain_min, domain_max)` of a continuous axis; times in epoch millis.
    #[must_use]
    pub fn domain_bounds(&self) -> Option<(f64, f64)> {
        match self.mapping {
            ScaleMapping::Linear(scale) | ScaleMapping::Time(scale) => Some(scale.domain()),
            ScaleMapping::Band(_) | ScaleMapping::Point(_) => None,
        }
    }

    #[must_use]
    pub fn range_pixels(&self) -> (f64, f64) {
        match &self.mapping {
            ScaleMapping::Linear(scale) | ScaleMapping::Time(scale) => scale.range(),
            ScaleMapping::Band(band) | ScaleMapping::Point(band) => band.range,
        }
    }

    /// Band width in pixels; zero for every non-band axis.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match &self.mapping {
            ScaleMapping::Band(band) => band.bandwidth(),
            _ => 0.0,
        }
    }

    /// Maps a raw continuous value (times as epoch millis).
    #[must_use]
    pub fn map_number(&self, value: f64) -> f64 {
        match self.mapping {
            ScaleMapping::Linear(scale) | ScaleMapping::Time(scale) => scale.domain_to_pixel(value),
            ScaleMapping::Band(_) | ScaleMapping::Point(_) => f64::NAN,
        }
    }

    /// Maps a record field value to pixels.
    ///
    /// Returns `None` when the value has no representation on this axis.
    #[must_use]
    pub fn map(&self, value: &FieldValue) -> Option<f64> {
        match &self.mapping {
            ScaleMapping::Linear(scale) => value.as_number().map(|v| scale.domain_to_pixel(v)),
            ScaleMapping::Time(scale) => {
                value.as_time_millis().map(|v| scale.domain_to_pixel(v))
            }
            ScaleMapping::Band(band) | ScaleMapping::Point(band) => {
                value.as_category().and_then(|c| band.position(&c))
            }
        }
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<DomainValue> {
        match &self.mapping {
            ScaleMapping::Linear(scale) => Some(DomainValue::Number(scale.pixel_to_domain(pixel))),
            ScaleMapping::Time(scale) => {
                Some(DomainValue::from_time_millis(scale.pixel_to_domain(pixel)))
            }
            ScaleMapping::Band(band) | ScaleMapping::Point(band) => band
                .invert(pixel)
                .map(|category| DomainValue::Category(category.to_owned())),
        }
    }

    /// Inverts a pixel to a continuous domain value (times in epoch millis).
    #[must_use]
    pub fn invert_number(&self, pixel: f64) -> Option<f64> {
        match self.mapping {
            ScaleMapping::Linear(scale) | ScaleMapping::Time(scale) => {
                Some(scale.pixel_to_domain(pixel))
            }
            ScaleMapping::Band(_) | ScaleMapping::Point(_) => None,
        }
    }

    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        match &self.mapping {
            ScaleMapping::Linear(scale) => {
                let (min, max) = scale.domain();
                nice_ticks(min, max, count)
                    .into_iter()
                    .map(|value| Tick {
                        value: DomainValue::Number(value),
                        pixel: scale.domain_to_pixel(value),
                    })
                    .collect()
            }
            ScaleMapping::Time(scale) => {
                let (min, max) = scale.domain();
                time_ticks(min, max, count)
                    .into_iter()
                    .map(|value| Tick {
                        value: DomainValue::from_time_millis(value),
                        pixel: scale.domain_to_pixel(value),
                    })
                    .collect()
            }
            ScaleMapping::Band(band) | ScaleMapping::Point(band) => band
                .categories()
                .iter()
                .filter_map(|category| {
                    band.position(category).map(|pixel| Tick {
                        value: DomainValue::Category(category.clone()),
                        pixel: pixel + band.bandwidth() / 2.0,
                    })
                })
                .collect(),
        }
    }
}

/// Step of a "nice" 1/2/5 x 10^k tick sequence covering `span` in `count` ticks.
#[must_use]
pub fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span / count.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return f64::NAN;
    }
    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Extends `[min, max]` outward to multiples of a nice step.
#[must_use]
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    let (mut start, mut stop) = (min, max);
    let mut previous_step = f64::NAN;
    for _ in 0..10 {
        let step = nice_step(stop - start, count);
        if !step.is_finite() || step == previous_step {
            break;
        }
        start = (start / step).floor() * step;
        stop = (stop / step).ceil() * step;
        previous_step = step;
    }
    (start, stop)
}

#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = nice_step(max - min, count);
    if !step.is_finite() {
        return if min.is_finite() && min == max {
            vec![min]
        } else {
            Vec::new()
        };
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .take(MAX_TICKS)
        .map(|i| i as f64 * step)
        .collect()
}

fn time_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let target = (max - min) / count.max(1) as f64;
    match TIME_TICK_INTERVALS_MS
        .iter()
        .copied()
        .find(|interval| *interval >= target)
    {
        Some(interval) if target.is_finite() && target > 0.0 => {
            let first = (min / interval).ceil() as i64;
            let last = (max / interval).floor() as i64;
            (first..=last)
                .take(MAX_TICKS)
                .map(|i| i as f64 * interval)
                .collect()
        }
        _ => nice_ticks(min, max, count),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{BandScale, LinearScale, nice_domain, nice_step, nice_ticks};

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_eq!(scale.domain_to_pixel(5.0), 50.0);
        assert_eq!(scale.domain_to_pixel(9.0), 50.0);
    }

    #[test]
    fn nan_bounds_propagate_to_pixels() {
        let scale = LinearScale::new((f64::NAN, f64::NAN), (0.0, 100.0));
        assert!(scale.domain_to_pixel(1.0).is_nan());
    }

    #[test]
    fn nice_step_follows_one_two_five_sequence() {
        assert_eq!(nice_step(100.0, 10), 10.0);
        assert_eq!(nice_step(97.0, 10), 10.0);
        assert_eq!(nice_step(23.0, 10), 2.0);
        assert_relative_eq!(nice_step(0.37, 10), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn nice_domain_extends_outward() {
        assert_eq!(nice_domain(0.3, 9.7, 10), (0.0, 10.0));
        assert_eq!(nice_domain(-13.0, 87.0, 10), (-20.0, 90.0));
    }

    #[test]
    fn nice_ticks_stay_inside_domain() {
        let ticks = nice_ticks(0.0, 1.0, 5);
        assert_eq!(ticks.len(), 6);
        assert_relative_eq!(ticks[0], 0.0);
        assert_relative_eq!(ticks[5], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn band_scale_centres_bands_with_padding() {
        let band = BandScale::band(vec!["a".to_owned(), "b".to_owned()], (0.0, 100.0), 0.0);
        assert_eq!(band.position("a"), Some(0.0));
        assert_eq!(band.position("b"), Some(50.0));
        assert_eq!(band.bandwidth(), 50.0);
        assert_eq!(band.invert(75.0), Some("b"));
        assert_eq!(band.invert(120.0), None);
    }

    #[test]
    fn reversed_band_range_flips_category_order() {
        let band = BandScale::band(vec!["a".to_owned(), "b".to_owned()], (100.0, 0.0), 0.0);
        assert_eq!(band.position("a"), Some(50.0));
        assert_eq!(band.position("b"), Some(0.0));
        assert_eq!(band.invert(10.0), Some("b"));
    }

    #[test]
    fn point_scale_uses_outer_padding() {
        let point = BandScale::point(
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            (0.0, 120.0),
            1.0,
        );
        assert_eq!(point.step(), 30.0);
        assert_eq!(point.position("a"), Some(30.0));
        assert_eq!(point.position("c"), Some(90.0));
        assert_eq!(point.invert(64.0), Some("b"));
    }
}
