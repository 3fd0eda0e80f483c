//! Measurement computation over sketch geometry.
//!
//! All numeric work funnels through the external [`GeometryEngine`]; this
//! module owns the derivations the engine has no primitive for (perimeter as
//! outer-ring length, circle radius as centroid-to-vertex distance, per-edge
//! segments) and the fallbacks that keep measurement non-fatal.

use std::rc::Rc;

use crate::engine::GeometryEngine;
use crate::graphics::{DrawTool, Graphic, LabelPolicy};
use crate::identity::ShapeId;
use mapsketch_core::geometry::{Geometry, GeometryKind, Point, Polygon, Polyline};
use mapsketch_core::units::{self, UnitFormat};

/// One edge of a polyline path or polygon ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Edge midpoint.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Bearing in degrees via `atan2(dy, dx)`, in (-180, 180].
    pub fn angle_deg(&self) -> f64 {
        (self.end.y - self.start.y)
            .atan2(self.end.x - self.start.x)
            .to_degrees()
    }
}

/// One labeled row of a measurement projection.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRow {
    pub label: &'static str,
    pub value: String,
}

/// Read-only measurement projection for one shape.
///
/// Published whenever the selected or in-progress shape set changes; never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub id: ShapeId,
    pub kind: GeometryKind,
    pub tool: Option<DrawTool>,
    pub rows: Vec<MeasureRow>,
}

/// Turns geometry plus unit configuration into values and formatted strings.
#[derive(Clone)]
pub struct MeasureComputer {
    engine: Rc<dyn GeometryEngine>,
    units: UnitFormat,
}

impl MeasureComputer {
    pub fn new(engine: Rc<dyn GeometryEngine>) -> Self {
        Self {
            engine,
            units: UnitFormat::default(),
        }
    }

    /// Replaces the unit configuration for subsequent computations.
    pub fn set_units(&mut self, units: UnitFormat) {
        self.units = units;
    }

    pub fn units(&self) -> UnitFormat {
        self.units
    }

    /// Geodesic polyline length; non-finite engine results collapse to 0.
    pub fn length(&self, line: &Polyline) -> f64 {
        let value = self.engine.geodesic_length(line, self.units.length);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Polygon perimeter: the outer ring rebuilt as a polyline.
    ///
    /// Polygons have no perimeter primitive of their own, and the closure
    /// edge must be walked, so the ring is closed explicitly first.
    pub fn perimeter(&self, polygon: &Polygon) -> f64 {
        let Some(ring) = polygon.outer_ring() else {
            return 0.0;
        };
        let mut path = ring.to_vec();
        if !mapsketch_core::geometry::ring_is_closed(&path) {
            path.push(path[0]);
        }
        self.length(&Polyline::single(path))
    }

    /// Geodesic polygon area, with a planar recomputation when the geodesic
    /// path returns a non-finite or exactly-zero result (degenerate and
    /// anti-meridian rings).
    pub fn area(&self, polygon: &Polygon) -> f64 {
        let geodesic = self.engine.geodesic_area(polygon, self.units.area);
        if geodesic.is_finite() && geodesic != 0.0 {
            return geodesic;
        }
        let planar = self.engine.planar_area(polygon, self.units.area);
        if planar.is_finite() {
            planar
        } else {
            0.0
        }
    }

    /// Circle radius approximated as centroid-to-first-ring-vertex distance.
    ///
    /// Only meaningful when the polygon was drawn with the circle tool.
    pub fn radius(&self, polygon: &Polygon) -> f64 {
        let (Some(centroid), Some(ring)) = (polygon.centroid(), polygon.outer_ring()) else {
            return 0.0;
        };
        let value = self.engine.distance(centroid, ring[0], self.units.length);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Per-edge endpoint pairs across every path or ring.
    ///
    /// Ring closure edges are included for polygons whose rings are stored
    /// open; explicitly closed rings already carry them.
    pub fn segments(&self, geometry: &Geometry) -> Vec<Segment> {
        match geometry {
            Geometry::Point(_) => Vec::new(),
            Geometry::Polyline(line) => line
                .paths
                .iter()
                .flat_map(|path| path_segments(path, false))
                .collect(),
            Geometry::Polygon(polygon) => polygon
                .rings
                .iter()
                .flat_map(|ring| path_segments(ring, true))
                .collect(),
        }
    }

    /// Per-edge lengths in the configured length unit.
    pub fn segment_lengths(&self, geometry: &Geometry) -> Vec<f64> {
        self.segments(geometry)
            .iter()
            .map(|s| {
                let value = self.engine.distance(s.start, s.end, self.units.length);
                if value.is_finite() {
                    value
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Formats a length value per the unit configuration.
    pub fn format_length(&self, value: f64) -> String {
        units::format_length(value, self.units.length, self.units.precision)
    }

    /// Formats an area value per the unit configuration.
    pub fn format_area(&self, value: f64) -> String {
        units::format_area(value, self.units.area, self.units.precision)
    }

    /// Builds the published measurement projection for a shape.
    ///
    /// Returns `None` when the graphic has no geometry; that shape is simply
    /// skipped.
    pub fn measurement_of(
        &self,
        id: ShapeId,
        graphic: &Graphic,
        policy: &LabelPolicy,
    ) -> Option<Measurement> {
        let geometry = graphic.geometry.as_ref()?;
        let mut rows = Vec::new();
        match geometry {
            Geometry::Point(_) => {}
            Geometry::Polyline(line) => {
                rows.push(MeasureRow {
                    label: "Length",
                    value: self.format_length(self.length(line)),
                });
            }
            Geometry::Polygon(polygon) => {
                rows.push(MeasureRow {
                    label: "Area",
                    value: self.format_area(self.area(polygon)),
                });
                rows.push(MeasureRow {
                    label: "Perimeter",
                    value: self.format_length(self.perimeter(polygon)),
                });
                if graphic.tool == Some(DrawTool::Circle) && policy.show_circle_radius {
                    rows.push(MeasureRow {
                        label: "Radius",
                        value: self.format_length(self.radius(polygon)),
                    });
                }
            }
        }
        Some(Measurement {
            id,
            kind: geometry.kind(),
            tool: graphic.tool,
            rows,
        })
    }
}

fn path_segments(path: &[Point], close: bool) -> Vec<Segment> {
    let mut segments: Vec<Segment> = path
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect();
    if close && path.len() >= 3 && !mapsketch_core::geometry::ring_is_closed(path) {
        segments.push(Segment::new(path[path.len() - 1], path[0]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlanarEngine;
    use crate::graphics::Symbol;
    use mapsketch_core::units::{AreaUnit, LengthUnit};

    /// Engine stub whose geodesic paths misbehave, for fallback coverage.
    struct BrokenGeodesics;

    impl GeometryEngine for BrokenGeodesics {
        fn geodesic_length(&self, _line: &Polyline, _unit: LengthUnit) -> f64 {
            f64::NAN
        }
        fn geodesic_area(&self, _polygon: &Polygon, _unit: AreaUnit) -> f64 {
            f64::INFINITY
        }
        fn planar_area(&self, polygon: &Polygon, unit: AreaUnit) -> f64 {
            PlanarEngine::new().planar_area(polygon, unit)
        }
        fn distance(&self, a: Point, b: Point, unit: LengthUnit) -> f64 {
            PlanarEngine::new().distance(a, b, unit)
        }
        fn intersects(&self, a: &Geometry, b: &Geometry) -> bool {
            PlanarEngine::new().intersects(a, b)
        }
    }

    fn planar_computer() -> MeasureComputer {
        MeasureComputer::new(Rc::new(PlanarEngine::new()))
    }

    fn square() -> Polygon {
        Polygon::single(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_perimeter_includes_closure_edge() {
        let computer = planar_computer();
        assert_eq!(computer.perimeter(&square()), 40.0);
    }

    #[test]
    fn test_non_finite_length_falls_back_to_zero() {
        let computer = MeasureComputer::new(Rc::new(BrokenGeodesics));
        let line = Polyline::single(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(computer.length(&line), 0.0);
    }

    #[test]
    fn test_area_falls_back_to_planar() {
        let computer = MeasureComputer::new(Rc::new(BrokenGeodesics));
        assert_eq!(computer.area(&square()), 100.0);
    }

    #[test]
    fn test_segments_close_polygon_rings() {
        let computer = planar_computer();
        let segs = computer.segments(&Geometry::Polygon(square()));
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[3].end, Point::new(0.0, 0.0));

        let line = Geometry::Polyline(Polyline::single(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]));
        assert_eq!(computer.segments(&line).len(), 2);
    }

    #[test]
    fn test_segment_angle() {
        let east = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let north = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!(east.angle_deg().abs() < 1e-9);
        assert!((north.angle_deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_radius_of_unit_circleish_polygon() {
        let computer = planar_computer();
        let sides = 64;
        let ring: Vec<Point> = (0..sides)
            .map(|i| {
                let a = 2.0 * std::f64::consts::PI * i as f64 / sides as f64;
                Point::new(5.0 * a.cos(), 5.0 * a.sin())
            })
            .collect();
        let radius = computer.radius(&Polygon::single(ring));
        assert!((radius - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_measurement_has_radius_row() {
        let computer = planar_computer();
        let policy = LabelPolicy::default();

        let circle = Graphic::new(
            Some(Geometry::Polygon(square())),
            Symbol::default_marker(),
        )
        .with_tool(DrawTool::Circle);
        let m = computer.measurement_of(1, &circle, &policy).unwrap();
        assert!(m.rows.iter().any(|r| r.label == "Radius"));

        let plain = Graphic::new(
            Some(Geometry::Polygon(square())),
            Symbol::default_marker(),
        )
        .with_tool(DrawTool::Polygon);
        let m = computer.measurement_of(2, &plain, &policy).unwrap();
        assert!(m.rows.iter().all(|r| r.label != "Radius"));
    }

    #[test]
    fn test_measurement_skips_missing_geometry() {
        let computer = planar_computer();
        let empty = Graphic::new(None, Symbol::default_marker());
        assert!(computer
            .measurement_of(1, &empty, &LabelPolicy::default())
            .is_none());
    }
}
