use stacked_chart::api::{Chart, ChartConfig, HostEvent, InteractionTuning};
use stacked_chart::core::{AxisDecl, Datum, Placement};
use stacked_chart::error::ChartError;
use stacked_chart::render::{NullSurfaceFactory, SurfaceKind, SurfaceRole};
use stacked_chart::series::{BarSeries, LineSeries, ScatterSeries};

fn records(count: usize) -> Vec<Datum> {
    (0..count)
        .map(|i| Datum::new().with("x", i as f64).with("y", (i * i) as f64))
        .collect()
}

fn config(count: usize) -> ChartConfig {
    ChartConfig::new(400, 300)
        .with_data(records(count))
        .with_axis(AxisDecl::number("x", Placement::Bottom))
        .with_axis(AxisDecl::number("y", Placement::Left))
}

#[test]
fn surfaces_stack_base_series_then_overlay() {
    let factory = NullSurfaceFactory::new();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(LineSeries::new("line", "x", "y")))
        .expect("line");
    chart
        .add_series(Box::new(BarSeries::new("bars", "x", "y")))
        .expect("bars");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    chart.draw().expect("draw");

    let roles: Vec<(SurfaceRole, SurfaceKind)> = chart
        .surfaces()
        .iter()
        .map(|surface| (surface.role(), surface.kind()))
        .collect();
    assert_eq!(
        roles,
        vec![
            (SurfaceRole::Base, SurfaceKind::Svg),
            (SurfaceRole::Series, SurfaceKind::Canvas),
            (SurfaceRole::Series, SurfaceKind::Canvas),
            (SurfaceRole::Overlay, SurfaceKind::Svg),
        ]
    );

    let base = chart.surfaces().base().expect("base");
    let overlay = chart.surfaces().overlay().expect("overlay");
    assert_eq!(chart.registration("bars").map(|r| r.surface()), Some(base));
    assert_eq!(chart.pointer_surface(), Some(overlay));

    let line = chart.registration("line").expect("line").surface();
    let base_log = factory.log(base).expect("base log");
    let line_log = factory.log(line).expect("line log");
    let overlay_log = factory.log(overlay).expect("overlay log");
    assert_eq!(base_log.size, (400, 300));
    assert_eq!(line_log.size, (340, 250));
    assert_eq!(line_log.offset, (40.0, 20.0));
    assert_eq!(overlay_log.offset, (40.0, 20.0));
    assert!(overlay_log.pointer_events);
    assert!(!base_log.pointer_events);
    assert!(!line_log.pointer_events);
}

#[test]
fn every_draw_clears_base_and_raster_surfaces() {
    let factory = NullSurfaceFactory::new();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    chart.draw().expect("first draw");
    let canvas = chart.registration("dots").expect("dots").surface();
    let before = factory.log(canvas).expect("canvas log");
    assert_eq!(before.visible_circles(), 5);

    chart.draw().expect("second draw");
    let after = factory.log(canvas).expect("canvas log");
    assert_eq!(after.clear_count, before.clear_count + 1);
    assert_eq!(after.visible_circles(), 5);
    assert_eq!(chart.generation(), 2);
}

#[test]
fn large_series_draws_in_chunks_across_clock_turns() {
    let factory = NullSurfaceFactory::new();
    let config = config(10).with_interaction(InteractionTuning::default().with_chunking(10, 4));
    let mut chart = Chart::new(&config, factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    let events = chart.subscribe();
    chart.draw().expect("draw");
    let canvas = chart.registration("dots").expect("dots").surface();

    assert_eq!(chart.draw_progress(), vec![("dots", 4, 10)]);
    assert_eq!(factory.log(canvas).expect("log").visible_circles(), 4);
    chart.advance_clock(16).expect("clock");
    assert_eq!(chart.draw_progress(), vec![("dots", 8, 10)]);
    chart.advance_clock(16).expect("clock");
    assert!(chart.draw_progress().is_empty());
    assert_eq!(factory.log(canvas).expect("log").visible_circles(), 10);

    let progress: Vec<(usize, usize)> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            HostEvent::DrawProgress { drawn, total, .. } => Some((drawn, total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(4, 10), (8, 10), (10, 10)]);
}

#[test]
fn small_series_draws_in_one_pass_without_progress() {
    let config = config(9).with_interaction(InteractionTuning::default().with_chunking(10, 4));
    let mut chart = Chart::new(&config, NullSurfaceFactory::new()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    let events = chart.subscribe();
    chart.draw().expect("draw");
    assert!(chart.draw_progress().is_empty());
    assert_eq!(chart.registration("dots").map(|r| r.drawn()), Some(9));
    assert!(
        events
            .drain()
            .iter()
            .all(|event| !matches!(event, HostEvent::DrawProgress { .. }))
    );
}

#[test]
fn redraw_before_rebuild_discards_stale_index_work() {
    let mut chart = Chart::new(&config(5), NullSurfaceFactory::new()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    chart.draw().expect("draw");
    chart.advance_clock(100).expect("clock");
    chart.draw().expect("redraw");

    chart.advance_clock(100).expect("clock");
    assert!(!chart.has_index("dots"));
    chart.advance_clock(100).expect("clock");
    assert!(chart.has_index("dots"));
}

#[test]
fn redraw_mid_chunking_discards_stale_chunks() {
    let factory = NullSurfaceFactory::new();
    let config = config(10).with_interaction(InteractionTuning::default().with_chunking(10, 4));
    let mut chart = Chart::new(&config, factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    chart.draw().expect("draw");
    chart.draw().expect("redraw");

    let events = chart.subscribe();
    chart.advance_clock(16).expect("clock");
    assert_eq!(chart.draw_progress(), vec![("dots", 8, 10)]);
    chart.run_until_idle().expect("idle");

    let canvas = chart.registration("dots").expect("dots").surface();
    assert_eq!(factory.log(canvas).expect("log").visible_circles(), 10);
    let progress = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, HostEvent::DrawProgress { .. }))
        .count();
    assert_eq!(progress, 2);
}

#[test]
fn webgl_series_without_gpu_context_fails_with_typed_error() {
    let factory = NullSurfaceFactory::new().without_gpu();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    let series = ScatterSeries::new("dots", "x", "y")
        .on_surface(SurfaceKind::WebGl)
        .expect("webgl is raster");

    let err = chart.add_series(Box::new(series)).expect_err("gpu missing");
    assert!(matches!(err, ChartError::GpuContextUnavailable { series } if series == "dots"));
    assert_eq!(chart.surfaces().len(), 2);
    assert_eq!(chart.series_count(), 0);

    let canvas = ScatterSeries::new("dots", "x", "y");
    chart.add_series(Box::new(canvas)).expect("canvas fallback");
    assert_eq!(chart.surfaces().len(), 3);
}

#[test]
fn resize_recomputes_layout_unless_disabled() {
    let factory = NullSurfaceFactory::new();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(LineSeries::new("line", "x", "y")))
        .expect("line");
    chart.draw().expect("draw");

    assert!(chart.resize(600, 400).expect("resize"));
    let line = chart.registration("line").expect("line").surface();
    assert_eq!(factory.log(line).expect("log").size, (540, 350));
    assert_eq!(chart.geometry().width, 540.0);
    assert!(chart.resize(0, 400).is_err());

    let mut fixed = Chart::new(&config(5).with_resize(false), NullSurfaceFactory::new())
        .expect("chart init");
    assert!(!fixed.resize(600, 400).expect("resize"));
    assert_eq!(fixed.viewport().width, 400);
}

#[test]
fn removing_a_series_releases_its_surface() {
    let factory = NullSurfaceFactory::new();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(LineSeries::new("line", "x", "y")))
        .expect("line");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    let line = chart.registration("line").expect("line").surface();

    assert!(chart.remove_series("line"));
    assert!(!chart.remove_series("line"));
    assert!(factory.log(line).expect("log").released);
    assert_eq!(chart.surfaces().len(), 3);
    assert_eq!(chart.registration("dots").map(|r| r.draw_order()), Some(0));
}

#[test]
fn duplicate_or_empty_series_names_are_rejected() {
    let mut chart = Chart::new(&config(5), NullSurfaceFactory::new()).expect("chart init");
    chart
        .add_series(Box::new(BarSeries::new("bars", "x", "y")))
        .expect("bars");
    assert!(matches!(
        chart.add_series(Box::new(BarSeries::new("bars", "x", "y"))),
        Err(ChartError::InvalidConfig(_))
    ));
    assert!(chart.add_series(Box::new(BarSeries::new("", "x", "y"))).is_err());
    assert_eq!(chart.series_count(), 1);
}

#[test]
fn destroy_releases_every_surface_and_stops_the_chart() {
    let factory = NullSurfaceFactory::new();
    let mut chart = Chart::new(&config(5), factory.clone()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("dots");
    chart.draw().expect("draw");
    let ids: Vec<_> = chart.surfaces().iter().map(|surface| surface.id()).collect();

    chart.destroy();
    assert!(chart.is_destroyed());
    assert!(chart.surfaces().is_empty());
    assert_eq!(chart.pending_tasks(), 0);
    for id in ids {
        assert!(factory.log(id).expect("log").released);
    }
    assert!(chart.draw().is_err());
    chart.destroy();
}
