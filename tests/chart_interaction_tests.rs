use stacked_chart::api::{Chart, ChartConfig, HostEvent, ZoomConfig};
use stacked_chart::core::{AxisDecl, Datum, Margin, PixelPoint, Placement, SurfaceId};
use stacked_chart::interaction::{ChartEventKind, InteractionMode, PointerInput, PointerKind};
use stacked_chart::render::NullSurfaceFactory;
use stacked_chart::series::{ScatterSeries, Selectable, Series};

fn config() -> ChartConfig {
    ChartConfig::new(400, 300)
        .with_selector("#chart")
        .with_margin(Margin::zero())
        .with_data(vec![
            Datum::new().with("x", 1.0).with("y", 12.0),
            Datum::new().with("x", 2.0).with("y", 3.0),
            Datum::new().with("x", 3.0).with("y", 20.0),
        ])
        .with_axis(AxisDecl::number("x", Placement::Bottom).with_bounds(0.0, 4.0))
        .with_axis(AxisDecl::number("y", Placement::Left).with_bounds(0.0, 25.0))
}

fn chart_from(config: &ChartConfig, build_index: bool) -> Chart {
    let mut chart = Chart::new(config, NullSurfaceFactory::new()).expect("chart init");
    chart
        .add_series(Box::new(ScatterSeries::new("dots", "x", "y")))
        .expect("add series");
    chart.draw().expect("draw");
    if build_index {
        chart.run_until_idle().expect("index built");
    }
    chart
}

fn overlay(chart: &Chart) -> SurfaceId {
    chart.pointer_surface().expect("pointer-owning overlay")
}

fn send(chart: &mut Chart, kind: PointerKind, x: f64, y: f64) {
    let surface = overlay(chart);
    chart
        .dispatch_pointer(PointerInput::new(kind, x, y, surface))
        .expect("dispatch pointer");
}

#[test]
fn move_burst_runs_one_hit_test_at_last_position() {
    let mut chart = chart_from(&config(), true);
    let events = chart.subscribe();

    for step in 0..10 {
        send(&mut chart, PointerKind::Move, 155.0 + 5.0 * f64::from(step), 264.0);
        chart.advance_clock(5).expect("clock");
    }
    assert_eq!(chart.hover_hit_tests(), 0);
    chart.advance_clock(100).expect("clock");

    assert_eq!(chart.hover_hit_tests(), 1);
    let tooltip = chart.tooltip().expect("tooltip shown");
    assert_eq!(tooltip.series, "dots");
    assert_eq!(tooltip.index, 1);
    assert_eq!(tooltip.text, "x: 2, y: 3");
    assert_eq!(chart.hovered().map(|hit| hit.point.datum), Some(1));

    let shown: Vec<HostEvent> = events.drain();
    assert!(matches!(
        shown.as_slice(),
        [HostEvent::TooltipShown { index: 1, .. }]
    ));
}

#[test]
fn hover_before_index_is_built_finds_nothing() {
    let mut chart = chart_from(&config(), false);
    assert!(!chart.has_index("dots"));
    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    chart.advance_clock(60).expect("clock");

    assert_eq!(chart.hover_hit_tests(), 1);
    assert!(chart.tooltip().is_none());
    assert!(chart.series_data_by_position(PixelPoint::new(200.0, 264.0)).is_empty());
}

#[test]
fn mouse_leave_cancels_pending_hover_and_hides_tooltip() {
    let mut chart = chart_from(&config(), true);
    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    chart.advance_clock(10).expect("clock");
    send(&mut chart, PointerKind::Leave, 200.0, 264.0);
    chart.advance_clock(500).expect("clock");
    assert_eq!(chart.hover_hit_tests(), 0);
    assert!(chart.tooltip().is_none());

    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    chart.advance_clock(60).expect("clock");
    assert!(chart.tooltip().is_some());

    let events = chart.subscribe();
    send(&mut chart, PointerKind::Leave, 200.0, 264.0);
    assert!(chart.tooltip().is_none());
    assert_eq!(events.drain(), vec![HostEvent::TooltipHidden]);
}

#[test]
fn drag_start_suppresses_hover_until_release() {
    let mut chart = chart_from(&config(), true);
    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    send(&mut chart, PointerKind::Down, 200.0, 264.0);
    send(&mut chart, PointerKind::Move, 260.0, 280.0);
    assert_eq!(chart.interaction_mode(), InteractionMode::Dragging);

    send(&mut chart, PointerKind::Move, 262.0, 282.0);
    chart.advance_clock(500).expect("clock");
    assert_eq!(chart.hover_hit_tests(), 0);
    assert!(chart.tooltip().is_none());

    send(&mut chart, PointerKind::Up, 262.0, 282.0);
    assert_eq!(chart.interaction_mode(), InteractionMode::Idle);
}

#[test]
fn click_on_point_publishes_item_and_selects_it() {
    let mut chart = chart_from(&config(), true);
    let events = chart.subscribe();
    let generation = chart.generation();

    send(&mut chart, PointerKind::Down, 201.0, 263.0);
    send(&mut chart, PointerKind::Up, 202.0, 263.0);

    let clicks: Vec<HostEvent> = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, HostEvent::ItemClick { .. }))
        .collect();
    assert_eq!(clicks.len(), 1);
    let HostEvent::ItemClick {
        series,
        index,
        datum,
        ..
    } = &clicks[0]
    else {
        unreachable!();
    };
    assert_eq!(series, "dots");
    assert_eq!(*index, 1);
    assert_eq!(datum.number("y"), Some(3.0));

    let selected = chart
        .registration("dots")
        .and_then(|registration| registration.series().as_selectable_ref())
        .and_then(|selectable| selectable.selected_item());
    assert_eq!(selected, Some(1));
    assert!(chart.generation() > generation);
}

#[test]
fn click_before_index_is_built_reports_no_item() {
    let mut chart = chart_from(&config(), false);
    let events = chart.subscribe();
    send(&mut chart, PointerKind::Down, 200.0, 264.0);
    send(&mut chart, PointerKind::Up, 200.0, 264.0);
    assert!(
        events
            .drain()
            .iter()
            .all(|event| !matches!(event, HostEvent::ItemClick { .. }))
    );
}

#[test]
fn press_moving_past_slop_without_zoom_is_neither_click_nor_drag() {
    let config = config().with_zoom(ZoomConfig {
        enabled: false,
        ..ZoomConfig::default()
    });
    let mut chart = chart_from(&config, true);
    let mouse = chart.subscribe_mouse();

    send(&mut chart, PointerKind::Down, 10.0, 10.0);
    send(&mut chart, PointerKind::Move, 40.0, 40.0);
    assert_eq!(chart.interaction_mode(), InteractionMode::Pressed);
    send(&mut chart, PointerKind::Up, 40.0, 40.0);

    let kinds: Vec<ChartEventKind> = mouse.drain().into_iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChartEventKind::MouseDown,
            ChartEventKind::MouseMove,
            ChartEventKind::MouseUp
        ]
    );
}

#[test]
fn input_from_non_owning_surface_is_ignored() {
    let mut chart = chart_from(&config(), true);
    let mouse = chart.subscribe_mouse();
    let base = chart.surfaces().base().expect("base surface");
    assert_ne!(Some(base), chart.pointer_surface());

    chart
        .dispatch_pointer(PointerInput::new(PointerKind::Move, 200.0, 264.0, base))
        .expect("dispatch");
    chart.advance_clock(100).expect("clock");
    assert_eq!(mouse.pending(), 0);
    assert_eq!(chart.hover_hit_tests(), 0);

    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    assert_eq!(mouse.pending(), 1);
}

#[test]
fn hidden_series_is_not_hit() {
    let mut chart = chart_from(&config(), true);
    assert!(chart.hide("dots", true).expect("hide"));
    chart.run_until_idle().expect("idle");
    assert!(!chart.has_index("dots"));
    assert!(chart.hit_test(PixelPoint::new(200.0, 264.0)).is_none());
    assert!(!chart.hide("missing", true).expect("hide"));
}

#[test]
fn custom_tooltip_parser_replaces_default_text() {
    let mut chart = chart_from(&config(), true);
    chart.set_tooltip_text_parser(|ctx| format!("{}#{}", ctx.series, ctx.index));
    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    chart.advance_clock(60).expect("clock");
    assert_eq!(chart.tooltip().map(|t| t.text.as_str()), Some("dots#1"));
}

#[test]
fn removing_hovered_series_hides_its_tooltip() {
    let mut chart = chart_from(&config(), true);
    send(&mut chart, PointerKind::Move, 200.0, 264.0);
    chart.advance_clock(100).expect("clock");
    assert!(chart.tooltip().is_some());
    let events = chart.subscribe();

    assert!(chart.remove_series("dots"));

    assert!(chart.tooltip().is_none());
    assert!(chart.hovered().is_none());
    assert!(
        events
            .drain()
            .iter()
            .any(|event| matches!(event, HostEvent::TooltipHidden))
    );
}
