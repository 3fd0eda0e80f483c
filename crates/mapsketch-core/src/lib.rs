//! # MapSketch Core
//!
//! Core types shared across the MapSketch crates:
//!
//! - **Geometry**: points, polylines, polygons and the extent/anchor
//!   derivations the annotation engine builds on.
//! - **Units**: length/area unit configuration and display formatting.
//! - **Errors**: the typed error surface for persistence and import.
//!
//! This crate deliberately contains no rendering, projection, or geodesic
//! math; those capabilities are provided by the surrounding application and
//! consumed through traits defined in `mapsketch-annotate`.

pub mod error;
pub mod geometry;
pub mod units;

pub use error::{Error, Result};
pub use geometry::{Extent, Geometry, GeometryKind, Point, Polygon, Polyline, ScreenPoint};
pub use units::{AreaUnit, LengthUnit, UnitFormat};
