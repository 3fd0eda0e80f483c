//! Geometry engine capability.
//!
//! The engine never does its own geodesic math; length, area, distance, and
//! intersection queries go through this trait so the surrounding application
//! can plug in whichever geodesy implementation backs its maps.
//! [`PlanarEngine`] is the bundled Euclidean reference used for planar maps
//! and for tests; world units are meters.

use mapsketch_core::geometry::{Geometry, Point, Polygon, Polyline};
use mapsketch_core::units::{AreaUnit, LengthUnit};

/// External geometry capability, unit-parameterized.
pub trait GeometryEngine {
    /// Geodesic length of a polyline in the given unit.
    fn geodesic_length(&self, line: &Polyline, unit: LengthUnit) -> f64;

    /// Geodesic area of a polygon in the given unit.
    fn geodesic_area(&self, polygon: &Polygon, unit: AreaUnit) -> f64;

    /// Planar area of a polygon in the given unit; the fallback path for
    /// degenerate and anti-meridian cases.
    fn planar_area(&self, polygon: &Polygon, unit: AreaUnit) -> f64;

    /// Distance between two points in the given unit.
    fn distance(&self, a: Point, b: Point, unit: LengthUnit) -> f64;

    /// Whether two geometries intersect.
    fn intersects(&self, a: &Geometry, b: &Geometry) -> bool;
}

/// Euclidean reference engine for planar maps with meter world units.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarEngine;

impl PlanarEngine {
    pub fn new() -> Self {
        Self
    }

    fn shoelace(polygon: &Polygon) -> f64 {
        let Some(ring) = polygon.outer_ring() else {
            return 0.0;
        };
        let closed = mapsketch_core::geometry::ring_is_closed(ring);
        let n = if closed { ring.len() - 1 } else { ring.len() };
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum / 2.0).abs()
    }
}

impl GeometryEngine for PlanarEngine {
    fn geodesic_length(&self, line: &Polyline, unit: LengthUnit) -> f64 {
        let meters: f64 = line
            .paths
            .iter()
            .flat_map(|path| path.windows(2))
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();
        unit.from_meters(meters)
    }

    fn geodesic_area(&self, polygon: &Polygon, unit: AreaUnit) -> f64 {
        self.planar_area(polygon, unit)
    }

    fn planar_area(&self, polygon: &Polygon, unit: AreaUnit) -> f64 {
        unit.from_square_meters(Self::shoelace(polygon))
    }

    fn distance(&self, a: Point, b: Point, unit: LengthUnit) -> f64 {
        unit.from_meters(a.distance_to(&b))
    }

    fn intersects(&self, a: &Geometry, b: &Geometry) -> bool {
        // Extent overlap, the same test the marquee needs. Fine-grained
        // boolean ops belong to a real geodesy backend.
        match (a.extent(), b.extent()) {
            (Some(ea), Some(eb)) => ea.intersects(&eb),
            _ => false,
        }
    }
}
