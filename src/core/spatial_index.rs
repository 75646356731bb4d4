//! Region quadtree over rendered points.
//!
//! The index is built once per redraw from pixel positions and never updated
//! incrementally. Queries return points in input order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

const LEAF_CAPACITY: usize = 16;
const MAX_DEPTH: usize = 16;

/// A rendered point: pixel position, index of the source record in the
/// chart data, and renderer specific extras (for example a bar height).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedPoint {
    pub x: f64,
    pub y: f64,
    pub datum: usize,
    pub extras: SmallVec<[f64; 2]>,
}

impl IndexedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, datum: usize) -> Self {
        Self {
            x,
            y,
            datum,
            extras: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, extra: f64) -> Self {
        self.extras.push(extra);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Bounds {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn midpoint(self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    fn quadrant(self, index: usize) -> Self {
        let (mx, my) = self.midpoint();
        match index {
            0 => Self::new(self.x0, self.y0, mx, my),
            1 => Self::new(mx, self.y0, self.x1, my),
            2 => Self::new(self.x0, my, mx, self.y1),
            _ => Self::new(mx, my, self.x1, self.y1),
        }
    }

    /// Node bounds are closed on the far edge because points on the extent
    /// maximum live in the last quadrant.
    fn intersects(self, query: Query) -> bool {
        let x_hit = if query.closed {
            self.x0 <= query.x1 && query.x0 <= self.x1
        } else {
            self.x0 < query.x1 && query.x0 <= self.x1
        };
        let y_hit = if query.closed {
            self.y0 <= query.y1 && query.y0 <= self.y1
        } else {
            self.y0 < query.y1 && query.y0 <= self.y1
        };
        x_hit && y_hit
    }
}

#[derive(Debug, Clone, Copy)]
struct Query {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    closed: bool,
}

impl Query {
    fn contains(self, point: &IndexedPoint) -> bool {
        if self.closed {
            point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
        } else {
            point.x >= self.x0 && point.x < self.x1 && point.y >= self.y0 && point.y < self.y1
        }
    }
}

#[derive(Debug, Clone)]
enum QuadNode {
    Leaf(Vec<u32>),
    Branch(Box<[QuadNode; 4]>),
}

/// Quadtree keyed by `(x, y)` pixel positions.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    points: Vec<IndexedPoint>,
    root: QuadNode,
    extent: Bounds,
    skipped: usize,
}

impl SpatialIndex {
    /// Builds the index over `[[0, 0], [viewport_width, viewport_height]]`,
    /// widened to cover every finite point. Points with non-finite positions
    /// are kept out of the tree.
    #[must_use]
    pub fn build(points: Vec<IndexedPoint>, viewport_width: f64, viewport_height: f64) -> Self {
        let mut extent = Bounds {
            x0: 0.0,
            y0: 0.0,
            x1: viewport_width.max(0.0),
            y1: viewport_height.max(0.0),
        };
        let mut members = Vec::with_capacity(points.len());
        for (position, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                continue;
            }
            extent.x0 = extent.x0.min(point.x);
            extent.y0 = extent.y0.min(point.y);
            extent.x1 = extent.x1.max(point.x);
            extent.y1 = extent.y1.max(point.y);
            members.push(position as u32);
        }
        let skipped = points.len() - members.len();
        if skipped > 0 {
            debug!(skipped, "spatial index skipped points with non-finite positions");
        }

        let root = build_node(&points, members, extent, 0);
        Self {
            points,
            root,
            extent,
            skipped,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len() - self.skipped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(x0, y0, x1, y1)` covered by the tree.
    #[must_use]
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (self.extent.x0, self.extent.y0, self.extent.x1, self.extent.y1)
    }

    /// Points whose stored position lies in `[x0, x3) x [y0, y3)`.
    #[must_use]
    pub fn query(&self, x0: f64, y0: f64, x3: f64, y3: f64) -> Vec<&IndexedPoint> {
        self.run(Query {
            x0,
            y0,
            x1: x3,
            y1: y3,
            closed: false,
        })
    }

    /// Points inside the closed square window of half-size `radius`
    /// centred on `(x, y)`.
    #[must_use]
    pub fn query_around(&self, x: f64, y: f64, radius: f64) -> Vec<&IndexedPoint> {
        self.run(Query {
            x0: x - radius,
            y0: y - radius,
            x1: x + radius,
            y1: y + radius,
            closed: true,
        })
    }

    fn run(&self, query: Query) -> Vec<&IndexedPoint> {
        let mut hits: Vec<u32> = Vec::new();
        let mut stack = vec![(&self.root, self.extent)];
        while let Some((node, bounds)) = stack.pop() {
            if !bounds.intersects(query) {
                continue;
            }
            match node {
                QuadNode::Leaf(members) => hits.extend(
                    members
                        .iter()
                        .copied()
                        .filter(|&i| query.contains(&self.points[i as usize])),
                ),
                QuadNode::Branch(children) => {
                    for (quadrant, child) in children.iter().enumerate() {
                        stack.push((child, bounds.quadrant(quadrant)));
                    }
                }
            }
        }
        hits.sort_unstable();
        hits.into_iter()
            .map(|i| &self.points[i as usize])
            .collect()
    }
}

fn build_node(
    points: &[IndexedPoint],
    members: Vec<u32>,
    bounds: Bounds,
    depth: usize,
) -> QuadNode {
    if members.len() <= LEAF_CAPACITY || depth >= MAX_DEPTH {
        return QuadNode::Leaf(members);
    }

    let (mx, my) = bounds.midpoint();
    let mut buckets: [Vec<u32>; 4] = Default::default();
    for member in members {
        let point = &points[member as usize];
        let right = usize::from(point.x >= mx);
        let bottom = usize::from(point.y >= my);
        buckets[bottom * 2 + right].push(member);
    }

    let [top_left, top_right, bottom_left, bottom_right] = buckets;
    QuadNode::Branch(Box::new([
        build_node(points, top_left, bounds.quadrant(0), depth + 1),
        build_node(points, top_right, bounds.quadrant(1), depth + 1),
        build_node(points, bottom_left, bounds.quadrant(2), depth + 1),
        build_node(points, bottom_right, bounds.quadrant(3), depth + 1),
    ]))
}
