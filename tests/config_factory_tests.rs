use stacked_chart::api::{Chart, ChartConfig, SeriesConfig, series_from_config};
use stacked_chart::error::ChartError;
use stacked_chart::extensions::{DRAG_SELECTION_PLUGIN_ID, GUIDE_LINE_PLUGIN_ID};
use stacked_chart::render::{NullSurfaceFactory, SurfaceKind};
use stacked_chart::series::Drawable;

const CONFIG: &str = r##"{
    "selector": "#sales",
    "width": 640,
    "height": 360,
    "data": [
        {"day": 1, "sold": 12, "returned": 1},
        {"day": 2, "sold": 30, "returned": 4},
        {"day": 3, "sold": 18, "returned": 2}
    ],
    "axes": [
        {"field": "day", "type": "number", "placement": "bottom"},
        {"field": "sold", "type": "number", "placement": "left", "min": 0, "max": 40}
    ],
    "series": [
        {"type": "line", "name": "sold", "x": "day", "y": "sold"},
        {"type": "pie", "name": "unsupported", "x": "day", "y": "sold"},
        {"type": "scatter", "name": "broken", "x": "day"},
        {"type": "bar", "name": "returned", "x": "day", "y": "returned", "color": "#d62728"},
        {"type": "scatter", "name": "sold", "x": "day", "y": "sold"}
    ],
    "interaction": {"hover_debounce_ms": 30}
}"##;

#[test]
fn json_bootstrap_skips_invalid_series_and_draws_once() {
    let factory = NullSurfaceFactory::new();
    let chart = Chart::from_json(CONFIG, factory.clone()).expect("chart from json");

    let names: Vec<&str> = chart.registrations().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["sold", "returned"]);
    assert_eq!(chart.selector(), "#sales");
    assert_eq!(chart.generation(), 1);
    assert!(chart.has_plugin(GUIDE_LINE_PLUGIN_ID));
    assert!(chart.has_plugin(DRAG_SELECTION_PLUGIN_ID));
    assert_eq!(
        chart.scales().by_field("sold").and_then(|s| s.domain_bounds()),
        Some((0.0, 40.0))
    );
    // Base, the line canvas and the overlay.
    assert_eq!(factory.surface_count(), 3);
}

#[test]
fn default_plugins_follow_zoom_options() {
    let mut config = ChartConfig::from_json(CONFIG).expect("config");
    config.zoom.enabled = false;
    config.zoom.guide_line = false;
    let chart = Chart::from_config(&config, NullSurfaceFactory::new()).expect("chart");
    assert_eq!(chart.plugin_count(), 0);
    assert_eq!(chart.pointer_surface(), chart.surfaces().overlay());
}

#[test]
fn webgl_series_without_gpu_aborts_bootstrap() {
    let mut config = ChartConfig::from_json(CONFIG).expect("config");
    config.series = vec![serde_json::json!({
        "type": "scatter",
        "name": "points",
        "x": "day",
        "y": "sold",
        "surface": "webgl"
    })];
    let err = Chart::from_config(&config, NullSurfaceFactory::new().without_gpu())
        .expect_err("gpu missing");
    assert!(matches!(err, ChartError::GpuContextUnavailable { series } if series == "points"));

    let chart = Chart::from_config(&config, NullSurfaceFactory::new()).expect("gpu present");
    let surface = chart.registration("points").expect("points").surface();
    assert_eq!(
        chart.surfaces().get(surface).map(|s| s.kind()),
        Some(SurfaceKind::WebGl)
    );
}

#[test]
fn series_entries_parse_by_type_tag() {
    let entry = serde_json::json!({
        "type": "line", "name": "a", "x": "t", "y": "v", "dots": "always"
    });
    let series = series_from_config(&entry).expect("line entry");
    assert_eq!(series.name(), "a");
    assert_eq!(series.surface_kind(), SurfaceKind::Canvas);

    let svg_scatter = serde_json::json!({
        "type": "scatter", "name": "s", "x": "t", "y": "v", "surface": "svg"
    });
    assert!(series_from_config(&svg_scatter).is_err());
    let bad_color = serde_json::json!({
        "type": "bar", "name": "b", "x": "t", "y": "v", "color": "teal"
    });
    assert!(series_from_config(&bad_color).is_err());
    assert!(matches!(
        series_from_config(&serde_json::json!({"type": "area"})),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn config_survives_json_round_trip() {
    let config = ChartConfig::from_json(CONFIG).expect("config");
    assert_eq!(config.interaction.hover_debounce_ms, 30);
    assert_eq!(config.interaction.index_rebuild_delay_ms, 200);
    assert!(config.is_resize);
    let typed: Vec<SeriesConfig> = config
        .series
        .iter()
        .filter_map(|value| serde_json::from_value(value.clone()).ok())
        .collect();
    assert_eq!(typed.len(), 3);

    let json = config.to_json_pretty().expect("serialize");
    let restored = ChartConfig::from_json(&json).expect("parse back");
    assert_eq!(restored, config);
}

#[test]
fn malformed_config_is_rejected() {
    assert!(matches!(
        ChartConfig::from_json("{\"width\": 10}"),
        Err(ChartError::InvalidConfig(_))
    ));
    let zero = r#"{"width": 0, "height": 100}"#;
    assert!(Chart::from_json(zero, NullSurfaceFactory::new()).is_err());
}
