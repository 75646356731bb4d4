use proptest::prelude::*;
use stacked_chart::core::{IndexedPoint, PixelPoint, SpatialIndex};
use stacked_chart::interaction::{HitCandidate, pick_candidate};

fn points_from(raw: &[(f64, f64)]) -> Vec<IndexedPoint> {
    raw.iter()
        .enumerate()
        .map(|(i, (x, y))| IndexedPoint::new(*x, *y, i))
        .collect()
}

proptest! {
    #[test]
    fn half_open_query_matches_brute_force(
        raw in prop::collection::vec((-50.0f64..550.0, -50.0f64..450.0), 0..400),
        qx in -60.0f64..560.0,
        qy in -60.0f64..460.0,
        qw in 0.0f64..300.0,
        qh in 0.0f64..300.0
    ) {
        let points = points_from(&raw);
        let index = SpatialIndex::build(points.clone(), 500.0, 400.0);
        let (x3, y3) = (qx + qw, qy + qh);

        let expected: Vec<usize> = points
            .iter()
            .filter(|p| p.x >= qx && p.x < x3 && p.y >= qy && p.y < y3)
            .map(|p| p.datum)
            .collect();
        let actual: Vec<usize> = index.query(qx, qy, x3, y3).iter().map(|p| p.datum).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn closed_window_query_matches_brute_force(
        raw in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 0..300),
        cx in 0.0f64..100.0,
        cy in 0.0f64..100.0,
        radius in 0.0f64..20.0
    ) {
        // Snap to a coarse grid so window edges are actually hit.
        let raw: Vec<(f64, f64)> = raw.iter().map(|(x, y)| (x.round(), y.round())).collect();
        let (cx, cy) = (cx.round(), cy.round());
        let points = points_from(&raw);
        let index = SpatialIndex::build(points.clone(), 100.0, 100.0);

        let expected: Vec<usize> = points
            .iter()
            .filter(|p| (p.x - cx).abs() <= radius && (p.y - cy).abs() <= radius)
            .map(|p| p.datum)
            .collect();
        let actual: Vec<usize> = index
            .query_around(cx, cy, radius)
            .iter()
            .map(|p| p.datum)
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn empty_index_returns_no_match() {
    let index = SpatialIndex::build(Vec::new(), 100.0, 100.0);
    assert!(index.is_empty());
    assert!(index.query_around(50.0, 50.0, 10.0).is_empty());
}

#[test]
fn tie_break_prefers_nearest_then_topmost_then_latest() {
    let cursor = PixelPoint::new(10.0, 10.0);
    let near = HitCandidate::new("lower", 0, IndexedPoint::new(11.0, 10.0, 0), cursor);
    let far = HitCandidate::new("upper", 1, IndexedPoint::new(13.0, 10.0, 1), cursor);
    assert_eq!(
        pick_candidate(&[far.clone(), near.clone()]).map(|c| c.point.datum),
        Some(0)
    );

    let same_distance_upper =
        HitCandidate::new("upper", 1, IndexedPoint::new(9.0, 10.0, 2), cursor);
    let candidates = [same_distance_upper, near];
    let picked = pick_candidate(&candidates).expect("hit");
    assert_eq!(picked.series, "upper");

    let first = HitCandidate::new("lower", 0, IndexedPoint::new(10.0, 12.0, 3), cursor);
    let second = HitCandidate::new("lower", 0, IndexedPoint::new(10.0, 8.0, 4), cursor);
    assert_eq!(pick_candidate(&[first, second]).map(|c| c.point.datum), Some(4));
    assert!(pick_candidate(&[]).is_none());
}
