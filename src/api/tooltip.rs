use serde::{Deserialize, Serialize};

use crate::core::{Datum, PixelPoint, Viewport};
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::TooltipConfig;

const FONT_SIZE_PX: f64 = 11.0;
const PADDING_PX: f64 = 4.0;
const CURSOR_GAP_PX: f64 = 12.0;
const CHAR_WIDTH_PX: f64 = 6.0;

/// Inputs handed to a tooltip text parser.
#[derive(Debug, Clone, Copy)]
pub struct TooltipContext<'a> {
    pub series: &'a str,
    pub index: usize,
    pub datum: &'a Datum,
    /// Fields the series declares for its tooltip.
    pub fields: &'a [String],
}

pub type TooltipTextParser = Box<dyn Fn(&TooltipContext<'_>) -> String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShownTooltip {
    pub series: String,
    pub index: usize,
    pub text: String,
    pub position: PixelPoint,
}

pub(super) struct TooltipState {
    pub(super) config: TooltipConfig,
    pub(super) parser: Option<TooltipTextParser>,
    pub(super) shown: Option<ShownTooltip>,
}

impl TooltipState {
    pub(super) fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            parser: None,
            shown: None,
        }
    }

    pub(super) fn text(&self, context: &TooltipContext<'_>) -> String {
        if let Some(parser) = &self.parser {
            return parser(context);
        }
        match &self.config.template {
            Some(template) => render_template(template, context.datum),
            None => default_text(context.datum, context.fields),
        }
    }
}

/// Substitutes `{field}` placeholders; unknown fields render empty.
#[must_use]
pub fn render_template(template: &str, datum: &Datum) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                if let Some(value) = datum.get(&after[..close]) {
                    out.push_str(&value.to_string());
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// `field: value` pairs joined by `, `; every field when none are declared.
#[must_use]
pub fn default_text(datum: &Datum, fields: &[String]) -> String {
    if fields.is_empty() {
        return datum
            .fields()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
    }
    fields
        .iter()
        .filter_map(|field| datum.get(field).map(|value| format!("{field}: {value}")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tooltip box next to the cursor, flipped left near the right edge.
pub(super) fn tooltip_frame(
    tooltip: &ShownTooltip,
    viewport: Viewport,
    plot_width: f64,
) -> RenderFrame {
    let mut frame = RenderFrame::new(viewport);
    if tooltip.text.is_empty() {
        return frame;
    }
    let width = tooltip.text.chars().count() as f64 * CHAR_WIDTH_PX + 2.0 * PADDING_PX;
    let height = FONT_SIZE_PX + 2.0 * PADDING_PX;
    let mut x = tooltip.position.x + CURSOR_GAP_PX;
    if x + width > plot_width {
        x = tooltip.position.x - CURSOR_GAP_PX - width;
    }
    let y = tooltip.position.y - height - CURSOR_GAP_PX / 2.0;

    frame.rects.push(
        RectPrimitive::new(x, y, width, height, Color::rgba(1.0, 1.0, 1.0, 0.9))
            .with_border(1.0, Color::rgb(0.6, 0.6, 0.6)),
    );
    frame.texts.push(TextPrimitive::new(
        tooltip.text.clone(),
        x + PADDING_PX,
        y + PADDING_PX + FONT_SIZE_PX,
        FONT_SIZE_PX,
        Color::rgb(0.1, 0.1, 0.1),
        TextHAlign::Left,
    ));
    frame
}

#[cfg(test)]
mod tests {
    use super::{default_text, render_template};
    use crate::core::Datum;

    #[test]
    fn template_substitutes_known_fields() {
        let datum = Datum::new().with("x", 2.0).with("label", "b");
        assert_eq!(render_template("{label} at {x}{missing}", &datum), "b at 2");
        assert_eq!(render_template("open {brace", &datum), "open {brace");
    }

    #[test]
    fn default_text_lists_declared_fields() {
        let datum = Datum::new().with("x", 2.0).with("y", 3.0).with("z", 9.0);
        let fields = vec!["x".to_owned(), "y".to_owned()];
        assert_eq!(default_text(&datum, &fields), "x: 2, y: 3");
        assert_eq!(default_text(&datum, &[]), "x: 2, y: 3, z: 9");
    }
}
