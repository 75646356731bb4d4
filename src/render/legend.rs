use crate::core::PlotGeometry;
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

const SWATCH_PX: f64 = 10.0;
const ENTRY_WIDTH_PX: f64 = 90.0;
const LABEL_GAP_PX: f64 = 4.0;
const FONT_SIZE_PX: f64 = 11.0;
const HIDDEN_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Color,
    pub hidden: bool,
}

/// One swatch and label per series, right-aligned in the top margin.
#[must_use]
pub fn build_legend_frame(entries: &[LegendEntry], geometry: PlotGeometry) -> RenderFrame {
    let mut frame = RenderFrame::new(geometry.viewport);
    let top = -(geometry.margin.top + SWATCH_PX) / 2.0;
    let mut x = geometry.width - ENTRY_WIDTH_PX * entries.len() as f64;

    for entry in entries {
        let alpha = if entry.hidden { HIDDEN_ALPHA } else { entry.color.alpha };
        frame.rects.push(RectPrimitive::new(
            x,
            top,
            SWATCH_PX,
            SWATCH_PX,
            entry.color.with_alpha(alpha),
        ));
        if !entry.name.is_empty() {
            frame.texts.push(TextPrimitive::new(
                entry.name.clone(),
                x + SWATCH_PX + LABEL_GAP_PX,
                top + SWATCH_PX,
                FONT_SIZE_PX,
                Color::rgb(0.2, 0.2, 0.2).with_alpha(alpha),
                TextHAlign::Left,
            ));
        }
        x += ENTRY_WIDTH_PX;
    }
    frame
}
