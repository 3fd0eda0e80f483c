//! Geometric primitives for the annotation engine.
//!
//! Geometry lives in world (map) coordinates; `ScreenPoint` is the pixel-space
//! counterpart produced by the view projector. All types serialize so sketches
//! can round-trip through the persistence payload.

use serde::{Deserialize, Serialize};

/// A 2D point in world (map) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A 2D point in screen (pixel) coordinates, origin top-left, Y down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a new screen point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding extent in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Creates an extent from corner coordinates.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    /// Extent covering a single point.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// The center of the extent.
    pub fn center(&self) -> Point {
        Point::new((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Expands the extent to cover the given point.
    pub fn expand_to(&mut self, p: Point) {
        self.xmin = self.xmin.min(p.x);
        self.ymin = self.ymin.min(p.y);
        self.xmax = self.xmax.max(p.x);
        self.ymax = self.ymax.max(p.y);
    }

    /// Returns the union of two extents.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent::new(
            self.xmin.min(other.xmin),
            self.ymin.min(other.ymin),
            self.xmax.max(other.xmax),
            self.ymax.max(other.ymax),
        )
    }

    /// Whether two extents overlap (touching edges count).
    pub fn intersects(&self, other: &Extent) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    /// Whether the extent contains the given point.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Grows the extent by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Extent {
        Extent::new(
            self.xmin - margin,
            self.ymin - margin,
            self.xmax + margin,
            self.ymax + margin,
        )
    }
}

fn extent_of_paths(paths: &[Vec<Point>]) -> Option<Extent> {
    let mut points = paths.iter().flatten();
    let first = points.next()?;
    let mut extent = Extent::from_point(*first);
    for p in points {
        extent.expand_to(*p);
    }
    Some(extent)
}

/// A polyline made of one or more paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub paths: Vec<Vec<Point>>,
}

impl Polyline {
    /// Creates a polyline from a list of paths.
    pub fn new(paths: Vec<Vec<Point>>) -> Self {
        Self { paths }
    }

    /// Creates a single-path polyline.
    pub fn single(path: Vec<Point>) -> Self {
        Self { paths: vec![path] }
    }

    /// Bounding extent, `None` when the polyline has no vertices.
    pub fn extent(&self) -> Option<Extent> {
        extent_of_paths(&self.paths)
    }
}

/// A polygon made of one or more rings. The first ring is the outer boundary.
///
/// Rings may be stored open or explicitly closed; consumers that walk edges
/// must include the closure edge either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon from a list of rings.
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        Self { rings }
    }

    /// Creates a single-ring polygon.
    pub fn single(ring: Vec<Point>) -> Self {
        Self { rings: vec![ring] }
    }

    /// Axis-aligned rectangle polygon, the marquee shape.
    pub fn rectangle(extent: Extent) -> Self {
        Self::single(vec![
            Point::new(extent.xmin, extent.ymin),
            Point::new(extent.xmax, extent.ymin),
            Point::new(extent.xmax, extent.ymax),
            Point::new(extent.xmin, extent.ymax),
            Point::new(extent.xmin, extent.ymin),
        ])
    }

    /// The outer ring, `None` for an empty polygon.
    pub fn outer_ring(&self) -> Option<&[Point]> {
        self.rings.first().map(|r| r.as_slice()).filter(|r| !r.is_empty())
    }

    /// Bounding extent, `None` when the polygon has no vertices.
    pub fn extent(&self) -> Option<Extent> {
        extent_of_paths(&self.rings)
    }

    /// Area-weighted centroid of the outer ring.
    ///
    /// Falls back to the vertex average when the ring is degenerate (fewer
    /// than three distinct vertices or zero signed area), so collapsed
    /// polygons still get a usable anchor.
    pub fn centroid(&self) -> Option<Point> {
        let ring = self.outer_ring()?;
        let closed = ring_is_closed(ring);
        let n = if closed { ring.len() - 1 } else { ring.len() };
        if n == 0 {
            return None;
        }

        let mut signed_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            signed_area += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        signed_area /= 2.0;

        if signed_area.abs() < 1e-12 {
            let sum = ring[..n]
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            return Some(Point::new(sum.0 / n as f64, sum.1 / n as f64));
        }

        Some(Point::new(
            cx / (6.0 * signed_area),
            cy / (6.0 * signed_area),
        ))
    }
}

/// Whether a ring explicitly repeats its first vertex at the end.
pub fn ring_is_closed(ring: &[Point]) -> bool {
    ring.len() >= 2 && ring.first() == ring.last()
}

/// Kinds of geometry the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "point"),
            GeometryKind::Polyline => write!(f, "polyline"),
            GeometryKind::Polygon => write!(f, "polygon"),
        }
    }
}

/// Enum wrapper for all annotatable geometries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Point(Point),
    Polyline(Polyline),
    Polygon(Polygon),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Polyline(_) => GeometryKind::Polyline,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Bounding extent, `None` for empty geometry.
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(p) => Some(Extent::from_point(*p)),
            Geometry::Polyline(l) => l.extent(),
            Geometry::Polygon(p) => p.extent(),
        }
    }

    /// The point labels anchor to: the polygon centroid, the extent center
    /// for polylines, the point itself for points.
    ///
    /// `None` when no anchor can be derived; callers skip label placement in
    /// that case rather than failing.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Polyline(l) => l.extent().map(|e| e.center()),
            Geometry::Polygon(p) => p.centroid().or_else(|| p.extent().map(|e| e.center())),
        }
    }
}
