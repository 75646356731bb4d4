#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use stacked_chart::ChartError;
use stacked_chart::api::{Chart, ChartConfig};
use stacked_chart::core::{AxisDecl, Datum, Placement, Viewport};
use stacked_chart::render::{
    CairoContextRenderer, CairoRenderer, CairoSurfaceFactory, CirclePrimitive, Color,
    LinePrimitive, RectPrimitive, RenderFrame, Renderer, SurfaceKind, TextHAlign, TextPrimitive,
};
use stacked_chart::series::{LineSeries, ScatterSeries};

fn frame() -> RenderFrame {
    RenderFrame::new(Viewport::new(300, 200))
        .with_line(LinePrimitive::new(0.0, 0.0, 100.0, 100.0, 1.0, Color::rgb(0.1, 0.2, 0.3)))
        .with_circle(CirclePrimitive::new(50.0, 50.0, 3.0, Color::rgb(0.9, 0.4, 0.1)))
        .with_text(TextPrimitive::new(
            "12",
            10.0,
            10.0,
            11.0,
            Color::rgb(0.0, 0.0, 0.0),
            TextHAlign::Left,
        ))
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
    let mut renderer = CairoRenderer::new(10, 10).expect("renderer");
    assert!(matches!(
        renderer.resize(0, 10),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn cairo_renderer_counts_drawn_primitives() {
    let mut renderer = CairoRenderer::new(300, 200).expect("renderer");
    renderer.render(&frame()).expect("render");
    let stats = renderer.last_stats();
    assert_eq!(stats.lines_drawn, 1);
    assert_eq!(stats.circles_drawn, 1);
    assert_eq!(stats.texts_drawn, 1);

    renderer.resize(640, 360).expect("resize");
    assert_eq!(renderer.surface().width(), 640);
    let mut png = Vec::new();
    renderer.write_png(&mut png).expect("png");
    assert!(!png.is_empty());
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let mut renderer = CairoRenderer::new(300, 200).expect("renderer");
    let surface = ImageSurface::create(Format::ARgb32, 300, 200).expect("surface");
    let context = Context::new(&surface).expect("context");
    renderer
        .render_on_cairo_context(&context, &frame())
        .expect("render on context");
    assert_eq!(renderer.last_stats().circles_drawn, 1);
}

#[test]
fn chart_draws_through_cairo_surfaces_and_refuses_webgl() {
    let config = ChartConfig::new(480, 320)
        .with_data(vec![
            Datum::new().with("x", 0.0).with("y", 10.0),
            Datum::new().with("x", 30.0).with("y", 20.0),
            Datum::new().with("x", 60.0).with("y", 15.0),
        ])
        .with_axis(AxisDecl::number("x", Placement::Bottom))
        .with_axis(AxisDecl::number("y", Placement::Left));
    let mut chart = Chart::new(&config, CairoSurfaceFactory).expect("chart init");
    chart
        .add_series(Box::new(LineSeries::new("line", "x", "y")))
        .expect("line");
    chart.draw().expect("draw");
    chart.run_until_idle().expect("idle");
    assert!(chart.has_index("line"));

    let webgl = ScatterSeries::new("gl", "x", "y")
        .on_surface(SurfaceKind::WebGl)
        .expect("raster kind");
    assert!(matches!(
        chart.add_series(Box::new(webgl)),
        Err(ChartError::GpuContextUnavailable { .. })
    ));
}

fn alpha_at(renderer: &CairoRenderer, x: usize, y: usize) -> u8 {
    let surface = renderer.surface();
    let stride = usize::try_from(surface.stride()).expect("stride");
    let mut alpha = 0;
    surface
        .with_data(|data| alpha = data[y * stride + x * 4 + 3])
        .expect("surface data");
    alpha
}

#[test]
fn container_surface_draws_margin_content_at_plot_offset() {
    let margin_label = RenderFrame::new(Viewport::new(300, 200)).with_rect(RectPrimitive::new(
        -35.0,
        -10.0,
        20.0,
        20.0,
        Color::rgb(0.2, 0.2, 0.2),
    ));

    let mut container = CairoRenderer::new(300, 200)
        .expect("renderer")
        .translated_to_plot();
    container.set_offset(40.0, 20.0);
    container.render(&margin_label).expect("render");
    assert_eq!(container.offset(), (40.0, 20.0));
    assert!(alpha_at(&container, 15, 20) > 0);

    let mut plot_only = CairoRenderer::new(300, 200).expect("renderer");
    plot_only.set_offset(40.0, 20.0);
    plot_only.render(&margin_label).expect("render");
    assert_eq!(alpha_at(&plot_only, 15, 20), 0);
}
