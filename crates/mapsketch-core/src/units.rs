//! Unit configuration and measurement formatting.
//!
//! Length and area values arrive from the geometry engine already expressed
//! in the configured unit; this module owns the display side. Metric base
//! units auto-switch to their kilometer forms at the usual thresholds, other
//! units render with fixed decimals and a suffix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold at which meters switch to kilometers for display.
pub const KILOMETER_THRESHOLD: f64 = 1000.0;

/// Threshold at which square meters switch to square kilometers for display.
pub const SQ_KILOMETER_THRESHOLD: f64 = 1_000_000.0;

/// Length unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Meters
    Meters,
    /// Kilometers
    Kilometers,
    /// Feet
    Feet,
    /// Miles
    Miles,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Meters
    }
}

impl LengthUnit {
    /// Short display suffix for the unit.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Feet => "ft",
            Self::Miles => "mi",
        }
    }

    /// Converts a value in meters into this unit.
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            Self::Meters => meters,
            Self::Kilometers => meters / 1000.0,
            Self::Feet => meters / 0.3048,
            Self::Miles => meters / 1609.344,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meters" | "m" => Ok(Self::Meters),
            "kilometers" | "km" => Ok(Self::Kilometers),
            "feet" | "ft" => Ok(Self::Feet),
            "miles" | "mi" => Ok(Self::Miles),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Area unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    /// Square meters
    SquareMeters,
    /// Square kilometers
    SquareKilometers,
    /// Square feet
    SquareFeet,
    /// Acres
    Acres,
}

impl Default for AreaUnit {
    fn default() -> Self {
        Self::SquareMeters
    }
}

impl AreaUnit {
    /// Short display suffix for the unit.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::SquareMeters => "m\u{b2}",
            Self::SquareKilometers => "km\u{b2}",
            Self::SquareFeet => "ft\u{b2}",
            Self::Acres => "ac",
        }
    }

    /// Converts a value in square meters into this unit.
    pub fn from_square_meters(&self, sq_meters: f64) -> f64 {
        match self {
            Self::SquareMeters => sq_meters,
            Self::SquareKilometers => sq_meters / 1_000_000.0,
            Self::SquareFeet => sq_meters / 0.09290304,
            Self::Acres => sq_meters / 4046.8564224,
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for AreaUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "square_meters" | "m2" | "m\u{b2}" => Ok(Self::SquareMeters),
            "square_kilometers" | "km2" | "km\u{b2}" => Ok(Self::SquareKilometers),
            "square_feet" | "ft2" | "ft\u{b2}" => Ok(Self::SquareFeet),
            "acres" | "ac" => Ok(Self::Acres),
            _ => Err(format!("Unknown area unit: {}", s)),
        }
    }
}

/// Display configuration for measurement values.
///
/// Threaded explicitly through the measurement computer; there is no ambient
/// global unit state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitFormat {
    pub length: LengthUnit,
    pub area: AreaUnit,
    pub precision: usize,
}

impl Default for UnitFormat {
    fn default() -> Self {
        Self {
            length: LengthUnit::Meters,
            area: AreaUnit::SquareMeters,
            precision: 2,
        }
    }
}

/// Format a length value for display
///
/// * `value` - Length already expressed in `unit`
/// * `unit` - Configured length unit
/// * `precision` - Decimal places
///
/// A metric base unit switches to kilometers at 1000; every other unit keeps
/// its suffix unchanged.
pub fn format_length(value: f64, unit: LengthUnit, precision: usize) -> String {
    if unit == LengthUnit::Meters && value >= KILOMETER_THRESHOLD {
        return format!(
            "{:.*} {}",
            precision,
            value / KILOMETER_THRESHOLD,
            LengthUnit::Kilometers.abbreviation()
        );
    }
    format!("{:.*} {}", precision, value, unit.abbreviation())
}

/// Format an area value for display
///
/// * `value` - Area already expressed in `unit`
/// * `unit` - Configured area unit
/// * `precision` - Decimal places
pub fn format_area(value: f64, unit: AreaUnit, precision: usize) -> String {
    if unit == AreaUnit::SquareMeters && value >= SQ_KILOMETER_THRESHOLD {
        return format!(
            "{:.*} {}",
            precision,
            value / SQ_KILOMETER_THRESHOLD,
            AreaUnit::SquareKilometers.abbreviation()
        );
    }
    format!("{:.*} {}", precision, value, unit.abbreviation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_below_threshold() {
        assert_eq!(format_length(10.5, LengthUnit::Meters, 2), "10.50 m");
        assert_eq!(format_length(999.99, LengthUnit::Meters, 2), "999.99 m");
    }

    #[test]
    fn test_length_switches_to_kilometers() {
        assert_eq!(format_length(1000.0, LengthUnit::Meters, 2), "1.00 km");
        assert_eq!(format_length(2500.0, LengthUnit::Meters, 1), "2.5 km");
    }

    #[test]
    fn test_non_metric_length_never_switches() {
        assert_eq!(format_length(5280.0, LengthUnit::Feet, 0), "5280 ft");
        assert_eq!(format_length(1200.0, LengthUnit::Miles, 2), "1200.00 mi");
        // An explicit kilometer base stays in kilometers too.
        assert_eq!(format_length(0.5, LengthUnit::Kilometers, 2), "0.50 km");
    }

    #[test]
    fn test_area_switches_to_square_kilometers() {
        assert_eq!(
            format_area(1_000_000.0, AreaUnit::SquareMeters, 2),
            "1.00 km\u{b2}"
        );
        assert_eq!(
            format_area(999_999.0, AreaUnit::SquareMeters, 0),
            "999999 m\u{b2}"
        );
    }

    #[test]
    fn test_non_metric_area_never_switches() {
        assert_eq!(format_area(2_000_000.0, AreaUnit::Acres, 1), "2000000.0 ac");
    }

    #[test]
    fn test_meter_conversions() {
        assert!((LengthUnit::Feet.from_meters(0.3048) - 1.0).abs() < 1e-9);
        assert!((LengthUnit::Miles.from_meters(1609.344) - 1.0).abs() < 1e-9);
        assert!((AreaUnit::Acres.from_square_meters(4046.8564224) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("km".parse::<LengthUnit>().unwrap(), LengthUnit::Kilometers);
        assert_eq!("ac".parse::<AreaUnit>().unwrap(), AreaUnit::Acres);
        assert!("furlongs".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_default_format() {
        let fmt = UnitFormat::default();
        assert_eq!(fmt.length, LengthUnit::Meters);
        assert_eq!(fmt.area, AreaUnit::SquareMeters);
        assert_eq!(fmt.precision, 2);
    }
}
