use approx::assert_relative_eq;
use stacked_chart::core::{
    AxisDecl, AxisType, Datum, DomainValue, FieldValue, Margin, Placement, PlotGeometry,
    ScaleKind, SpatialIndex, Viewport, ZoomWindow, ZoomWindows, build_scales,
};

fn geometry(width: u32, height: u32) -> PlotGeometry {
    PlotGeometry::new(Viewport::new(width, height), Margin::zero()).expect("valid geometry")
}

fn sample_data() -> Vec<Datum> {
    vec![
        Datum::new().with("x", 1.0).with("y", 12.0),
        Datum::new().with("x", 2.0).with("y", 3.0),
        Datum::new().with("x", 3.0).with("y", 20.0),
    ]
}

#[test]
fn midpoint_record_maps_to_plot_centre_and_is_found_by_index() {
    let axes = vec![
        AxisDecl::number("x", Placement::Bottom).with_bounds(0.0, 4.0),
        AxisDecl::number("y", Placement::Left).with_bounds(0.0, 25.0),
    ];
    let geometry = geometry(400, 300);
    let scales = build_scales(&axes, &sample_data(), geometry, &ZoomWindows::new());

    let x = scales.by_field("x").expect("x scale");
    let y = scales.by_field("y").expect("y scale");
    let px = x.map(&FieldValue::Number(2.0)).expect("mapped x");
    let py = y.map(&FieldValue::Number(3.0)).expect("mapped y");
    assert_relative_eq!(px, geometry.width / 2.0);
    assert_relative_eq!(py, 264.0);

    let points = stacked_chart::series::projection::project_xy(&sample_data(), &scales, "x", "y");
    let index = SpatialIndex::build(points, geometry.width, geometry.height);
    let hits = index.query_around(px, py, 4.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].datum, 1);
}

#[test]
fn auto_bounds_are_padded_outward_and_explicit_bounds_are_not() {
    let data = vec![
        Datum::new().with("v", -40.0),
        Datum::new().with("v", 200.0),
    ];
    let auto = build_scales(
        &[AxisDecl::number("v", Placement::Left)],
        &data,
        geometry(200, 200),
        &ZoomWindows::new(),
    );
    assert_eq!(auto.by_field("v").and_then(|s| s.domain_bounds()), Some((-42.0, 210.0)));

    let explicit = build_scales(
        &[AxisDecl::number("v", Placement::Left).with_bounds(-40.0, 200.0)],
        &data,
        geometry(200, 200),
        &ZoomWindows::new(),
    );
    assert_eq!(
        explicit.by_field("v").and_then(|s| s.domain_bounds()),
        Some((-40.0, 200.0))
    );
}

#[test]
fn zoom_window_overrides_explicit_bounds_verbatim() {
    let axes = vec![AxisDecl::number("x", Placement::Bottom).with_bounds(0.0, 100.0)];
    let mut windows = ZoomWindows::new();
    windows.apply(ZoomWindow::from_corners("x", 75.5, 25.25));
    let scales = build_scales(&axes, &sample_data(), geometry(200, 200), &windows);
    assert_eq!(
        scales.by_field("x").and_then(|s| s.domain_bounds()),
        Some((25.25, 75.5))
    );
}

#[test]
fn vertical_axes_map_ascending_domain_to_descending_pixels() {
    let axes = vec![AxisDecl::number("y", Placement::Right).with_bounds(0.0, 10.0)];
    let scales = build_scales(&axes, &[], geometry(100, 200), &ZoomWindows::new());
    let y = scales.primary_vertical().expect("vertical scale");
    assert_relative_eq!(y.map_number(0.0), 200.0);
    assert_relative_eq!(y.map_number(10.0), 0.0);
}

#[test]
fn missing_field_yields_nan_bounds() {
    let data = vec![Datum::new().with("other", 1.0)];
    let scales = build_scales(
        &[AxisDecl::number("x", Placement::Bottom)],
        &data,
        geometry(100, 100),
        &ZoomWindows::new(),
    );
    let (min, max) = scales
        .by_field("x")
        .and_then(|s| s.domain_bounds())
        .expect("linear bounds");
    assert!(min.is_nan());
    assert!(max.is_nan());
}

#[test]
fn category_axis_uses_first_seen_order_and_inverts_to_band() {
    let data = vec![
        Datum::new().with("k", "b").with("v", 1.0),
        Datum::new().with("k", "a").with("v", 2.0),
        Datum::new().with("k", "b").with("v", 3.0),
    ];
    let axes = vec![AxisDecl::new("k", AxisType::String, Placement::Bottom)];
    let scales = build_scales(&axes, &data, geometry(200, 100), &ZoomWindows::new());
    let k = scales.by_field("k").expect("band scale");

    assert_eq!(k.kind(), ScaleKind::Band);
    assert_relative_eq!(k.bandwidth(), 100.0);
    assert_eq!(k.map(&FieldValue::from("a")), Some(100.0));
    assert_eq!(k.invert(30.0), Some(DomainValue::Category("b".to_owned())));
    let labels: Vec<DomainValue> = k.ticks(10).into_iter().map(|tick| tick.value).collect();
    assert_eq!(
        labels,
        vec![
            DomainValue::Category("b".to_owned()),
            DomainValue::Category("a".to_owned())
        ]
    );
}

#[test]
fn time_axis_derives_unpadded_bounds_from_timestamps() {
    let data = vec![
        Datum::new().with("t", "1970-01-02").with("v", 1.0),
        Datum::new().with("t", 0.0).with("v", 2.0),
    ];
    let axes = vec![AxisDecl::new("t", AxisType::Time, Placement::Bottom)];
    let scales = build_scales(&axes, &data, geometry(100, 100), &ZoomWindows::new());
    let t = scales.by_field("t").expect("time scale");
    assert_eq!(t.kind(), ScaleKind::Time);
    assert_eq!(t.domain_bounds(), Some((0.0, 86_400_000.0)));
    assert!(matches!(t.invert(50.0), Some(DomainValue::Time(_))));
}
