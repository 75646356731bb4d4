use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::core::{AxisDecl, AxisScale, DomainValue, Placement, PlotGeometry, ScaleSet};
use crate::render::{Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

const HORIZONTAL_TICK_SPACING_PX: f64 = 80.0;
const VERTICAL_TICK_SPACING_PX: f64 = 40.0;
const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 12;
const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    pub axis_color: Color,
    pub grid_color: Color,
    pub label_color: Color,
    pub font_size_px: f64,
    pub tick_length_px: f64,
    pub stroke_width: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            axis_color: Color::rgb(0.2, 0.2, 0.2),
            grid_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            label_color: Color::rgb(0.2, 0.2, 0.2),
            font_size_px: 10.0,
            tick_length_px: 6.0,
            stroke_width: 1.0,
        }
    }
}

/// Tick count targeting a readable spacing along an axis of `span_px`.
#[must_use]
pub fn tick_count_for(span_px: f64, horizontal: bool) -> usize {
    let spacing = if horizontal {
        HORIZONTAL_TICK_SPACING_PX
    } else {
        VERTICAL_TICK_SPACING_PX
    };
    let count = (span_px / spacing).floor();
    if !count.is_finite() || count < MIN_TICKS as f64 {
        return MIN_TICKS;
    }
    (count as usize).min(MAX_TICKS)
}

/// Formats one tick label.
///
/// Time ticks use `format` as a `chrono` strftime pattern; numeric ticks
/// accept `.N` for fixed precision. Unknown or malformed patterns fall back
/// to the default rendering.
#[must_use]
pub fn format_tick(value: &DomainValue, format: Option<&str>) -> String {
    match value {
        DomainValue::Number(number) => {
            let precision = format
                .and_then(|pattern| pattern.strip_prefix('.'))
                .and_then(|digits| digits.parse::<usize>().ok());
            match precision {
                Some(precision) => format!("{number:.precision$}"),
                None if number.fract() == 0.0 => format!("{number:.0}"),
                None => format!("{}", (number * 1e6).round() / 1e6),
            }
        }
        DomainValue::Time(time) => {
            let pattern = format
                .filter(|pattern| is_valid_strftime(pattern))
                .unwrap_or(DEFAULT_TIME_FORMAT);
            time.format(pattern).to_string()
        }
        DomainValue::Category(category) => category.clone(),
    }
}

fn is_valid_strftime(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Axis lines, ticks, labels and optional grid lines for the base surface.
///
/// Coordinates are relative to the plot origin; labels may extend into the
/// margins.
#[must_use]
pub fn build_axis_frame(
    axes: &[AxisDecl],
    scales: &ScaleSet,
    geometry: PlotGeometry,
    style: AxisStyle,
) -> RenderFrame {
    let mut frame = RenderFrame::new(geometry.viewport);
    for decl in axes {
        let Some(scale) = scales
            .iter()
            .find(|scale| scale.field() == decl.field && scale.placement() == decl.placement)
        else {
            continue;
        };
        append_axis(&mut frame, decl, scale, geometry, style);
    }
    frame
}

fn append_axis(
    frame: &mut RenderFrame,
    decl: &AxisDecl,
    scale: &AxisScale,
    geometry: PlotGeometry,
    style: AxisStyle,
) {
    let (width, height) = (geometry.width, geometry.height);
    let horizontal = decl.placement.is_horizontal();
    let span = if horizontal { width } else { height };
    let tick = style.tick_length_px;

    let (x1, y1, x2, y2) = match decl.placement {
        Placement::Bottom => (0.0, height, width, height),
        Placement::Top => (0.0, 0.0, width, 0.0),
        Placement::Left => (0.0, 0.0, 0.0, height),
        Placement::Right => (width, 0.0, width, height),
    };
    frame
        .lines
        .push(LinePrimitive::new(x1, y1, x2, y2, style.stroke_width, style.axis_color));

    for tick_value in scale.ticks(tick_count_for(span, horizontal)) {
        let pixel = tick_value.pixel;
        if !pixel.is_finite() {
            continue;
        }
        let (tick_line, label_x, label_y, align) = match decl.placement {
            Placement::Bottom => (
                (pixel, height, pixel, height + tick),
                pixel,
                height + tick + style.font_size_px,
                TextHAlign::Center,
            ),
            Placement::Top => (
                (pixel, 0.0, pixel, -tick),
                pixel,
                -tick - 2.0,
                TextHAlign::Center,
            ),
            Placement::Left => (
                (0.0, pixel, -tick, pixel),
                -tick - 2.0,
                pixel + style.font_size_px / 2.0,
                TextHAlign::Right,
            ),
            Placement::Right => (
                (width, pixel, width + tick, pixel),
                width + tick + 2.0,
                pixel + style.font_size_px / 2.0,
                TextHAlign::Left,
            ),
        };
        frame.lines.push(LinePrimitive::new(
            tick_line.0,
            tick_line.1,
            tick_line.2,
            tick_line.3,
            style.stroke_width,
            style.axis_color,
        ));

        if decl.is_grid_line {
            let grid = if horizontal {
                LinePrimitive::new(pixel, 0.0, pixel, height, style.stroke_width, style.grid_color)
            } else {
                LinePrimitive::new(0.0, pixel, width, pixel, style.stroke_width, style.grid_color)
            };
            frame.lines.push(grid);
        }

        let label = format_tick(&tick_value.value, decl.tick_format.as_deref());
        if !label.is_empty() {
            frame.texts.push(TextPrimitive::new(
                label,
                label_x,
                label_y,
                style.font_size_px,
                style.label_color,
                align,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{format_tick, tick_count_for};
    use crate::core::DomainValue;

    #[test]
    fn numeric_precision_pattern_is_honoured() {
        assert_eq!(format_tick(&DomainValue::Number(1.5), Some(".2")), "1.50");
        assert_eq!(format_tick(&DomainValue::Number(40.0), None), "40");
    }

    #[test]
    fn malformed_time_pattern_falls_back_to_date() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid time");
        assert_eq!(format_tick(&DomainValue::Time(time), Some("%H:%M")), "12:00");
        assert_eq!(format_tick(&DomainValue::Time(time), Some("%Q")), "2024-03-01");
    }

    #[test]
    fn tick_count_stays_in_bounds() {
        assert_eq!(tick_count_for(10.0, true), 2);
        assert_eq!(tick_count_for(400.0, true), 5);
        assert_eq!(tick_count_for(10_000.0, false), 12);
    }
}
