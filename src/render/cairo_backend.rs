use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;

use tracing::debug;

use crate::core::SurfaceId;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RenderFrame, Renderer, SurfaceFactory, SurfaceKind, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo raster surface.
///
/// Stands in for a browser canvas when charts render headless: frames
/// accumulate on an image surface until `clear`, which makes chunked draws
/// observable pixel by pixel. Also draws onto an external Cairo context
/// through `CairoContextRenderer`.
///
/// Frames use plot-origin coordinates. A renderer spanning the whole
/// container (`translated_to_plot`) shifts them by its offset so margin
/// content such as axis labels and the legend lands on the surface.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    offset: (f64, f64),
    translate_to_plot: bool,
    last_stats: CairoRenderStats,
    gpu: bool,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgba(0.0, 0.0, 0.0, 0.0),
            offset: (0.0, 0.0),
            translate_to_plot: false,
            last_stats: CairoRenderStats::default(),
            gpu: true,
        })
    }

    /// Draws frames shifted by the surface offset.
    #[must_use]
    pub fn translated_to_plot(mut self) -> Self {
        self.translate_to_plot = true;
        self
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Plot origin within the container.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn write_png(&self, out: &mut impl std::io::Write) -> ChartResult<()> {
        self.surface
            .write_to_png(out)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    fn paint_clear(&self, context: &Context) -> ChartResult<()> {
        self.clear_color.validate()?;
        context.set_operator(cairo::Operator::Source);
        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.set_operator(cairo::Operator::Over);
        Ok(())
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let mut stats = CairoRenderStats::default();

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for rect in &frame.rects {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for circle in &frame.circles {
            apply_color(context, circle.fill_color);
            context.new_sub_path();
            context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill circle", err))?;
            stats.circles_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn acquire(&mut self) -> ChartResult<()> {
        if self.gpu {
            Ok(())
        } else {
            Err(ChartError::InvalidConfig(
                "cairo surfaces cannot provide a webgl context".to_owned(),
            ))
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        if (self.surface.width(), self.surface.height()) == (width as i32, height as i32) {
            return Ok(());
        }
        self.surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)
            .map_err(|err| map_backend_error("failed to resize cairo surface", err))?;
        Ok(())
    }

    fn set_offset(&mut self, x: f64, y: f64) {
        self.offset = (x, y);
    }

    fn clear(&mut self) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.paint_clear(&context)
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        if self.translate_to_plot {
            context.translate(self.offset.0, self.offset.1);
        }
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

/// Surface factory backing every surface with a `CairoRenderer`.
///
/// SVG surfaces span the container and draw translated to the plot origin.
/// Cairo has no GPU context, so WebGL surfaces are refused and surface as
/// `GpuContextUnavailable` at series registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CairoSurfaceFactory;

impl SurfaceFactory for CairoSurfaceFactory {
    fn create_surface(
        &mut self,
        id: SurfaceId,
        kind: SurfaceKind,
    ) -> ChartResult<Box<dyn Renderer>> {
        let mut renderer = CairoRenderer::new(1, 1)?;
        match kind {
            SurfaceKind::Svg => renderer = renderer.translated_to_plot(),
            SurfaceKind::WebGl => renderer.gpu = false,
            SurfaceKind::Canvas => {}
        }
        debug!(surface = id.raw(), ?kind, "cairo surface created");
        Ok(Box::new(renderer))
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
