//! Graphics, symbols, and drawing configuration.
//!
//! A [`Graphic`] is a geometry plus its styling, the unit every render
//! collection holds. Shapes authored by the user carry a tool tag and an
//! optional title; labels are plain text graphics owned by the label
//! collection.

use serde::{Deserialize, Serialize};

use crate::identity::ShapeId;
use mapsketch_core::geometry::Geometry;

/// Drawing tools available to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    Point,
    Polyline,
    Polygon,
    Rectangle,
    Circle,
    Freehand,
    Text,
}

impl DrawTool {
    /// Tag string stored on completed shapes.
    pub fn tag(&self) -> &'static str {
        match self {
            DrawTool::Point => "point",
            DrawTool::Polyline => "polyline",
            DrawTool::Polygon => "polygon",
            DrawTool::Rectangle => "rectangle",
            DrawTool::Circle => "circle",
            DrawTool::Freehand => "freehand",
            DrawTool::Text => "text",
        }
    }
}

impl std::fmt::Display for DrawTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

/// Outline styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(230, 60, 50),
            width: 2.0,
        }
    }
}

/// Fill styling with an outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Color,
    pub outline: StrokeStyle,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: Color::rgba(230, 60, 50, 60),
            outline: StrokeStyle::default(),
        }
    }
}

/// Marker styling for point shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    pub size: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(230, 60, 50),
            size: 8.0,
        }
    }
}

/// Text styling shared by labels and free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: Color,
    pub halo_color: Color,
    pub halo_width: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            color: Color::BLACK,
            halo_color: Color::WHITE,
            halo_width: 2.0,
        }
    }
}

/// A positioned piece of text with rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSymbol {
    pub text: String,
    pub style: TextStyle,
    /// Rotation in degrees, counter-clockwise, 0 = horizontal.
    pub angle_deg: f64,
}

impl TextSymbol {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            angle_deg: 0.0,
        }
    }

    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle_deg = angle_deg;
        self
    }
}

/// Symbol variants a graphic can render with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Symbol {
    Marker(MarkerStyle),
    Stroke(StrokeStyle),
    Fill(FillStyle),
    Text(TextSymbol),
}

impl Symbol {
    pub fn default_marker() -> Symbol {
        Symbol::Marker(MarkerStyle::default())
    }

    /// The text carried by a text symbol, `None` otherwise.
    pub fn text(&self) -> Option<&str> {
        match self {
            Symbol::Text(t) => Some(t.text.as_str()),
            _ => None,
        }
    }
}

/// Label visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPolicy {
    pub show_during_draw: bool,
    pub show_segment_lengths: bool,
    pub show_totals: bool,
    pub show_circle_radius: bool,
    pub show_title: bool,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            show_during_draw: true,
            show_segment_lengths: true,
            show_totals: true,
            show_circle_radius: true,
            show_title: true,
        }
    }
}

/// Per-session drawing configuration, immutable during an operation.
///
/// The editor holds the most recently supplied value; only an explicit
/// `update_settings` replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub tool: DrawTool,
    pub fill: FillStyle,
    pub stroke: StrokeStyle,
    pub marker: MarkerStyle,
    pub text: TextStyle,
    pub labels: LabelPolicy,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            tool: DrawTool::Polyline,
            fill: FillStyle::default(),
            stroke: StrokeStyle::default(),
            marker: MarkerStyle::default(),
            text: TextStyle::default(),
            labels: LabelPolicy::default(),
        }
    }
}

impl DrawSettings {
    /// The default symbol a shape drawn with `tool` renders with.
    pub fn symbol_for(&self, tool: DrawTool) -> Symbol {
        match tool {
            DrawTool::Point => Symbol::Marker(self.marker),
            DrawTool::Polyline | DrawTool::Freehand => Symbol::Stroke(self.stroke),
            DrawTool::Polygon | DrawTool::Rectangle | DrawTool::Circle => Symbol::Fill(self.fill),
            DrawTool::Text => Symbol::Text(TextSymbol::new(String::new(), self.text.clone())),
        }
    }
}

/// A drawable shape: geometry, styling, and user attributes.
///
/// The identifier field is private; it is assigned lazily through
/// [`crate::identity::IdRegistry`] and survives cloning, which is how join
/// session clones borrow their source's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub geometry: Option<Geometry>,
    pub tool: Option<DrawTool>,
    pub title: Option<String>,
    pub symbol: Symbol,
    #[serde(default)]
    shape_id: Option<ShapeId>,
}

impl Graphic {
    /// Creates a new graphic.
    pub fn new(geometry: Option<Geometry>, symbol: Symbol) -> Self {
        Self {
            geometry,
            tool: None,
            title: None,
            symbol,
            shape_id: None,
        }
    }

    /// Creates a text graphic at a point.
    pub fn text(position: mapsketch_core::geometry::Point, symbol: TextSymbol) -> Self {
        Self::new(Some(Geometry::Point(position)), Symbol::Text(symbol))
    }

    pub fn with_tool(mut self, tool: DrawTool) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The identifier previously assigned, if any.
    pub fn assigned_id(&self) -> Option<ShapeId> {
        self.shape_id
    }

    pub(crate) fn assign_id(&mut self, id: ShapeId) {
        self.shape_id = Some(id);
    }

    pub(crate) fn restore_id(&mut self, id: Option<ShapeId>) {
        self.shape_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsketch_core::geometry::Point;

    #[test]
    fn test_symbol_for_tool() {
        let settings = DrawSettings::default();
        assert!(matches!(
            settings.symbol_for(DrawTool::Point),
            Symbol::Marker(_)
        ));
        assert!(matches!(
            settings.symbol_for(DrawTool::Polyline),
            Symbol::Stroke(_)
        ));
        assert!(matches!(
            settings.symbol_for(DrawTool::Circle),
            Symbol::Fill(_)
        ));
    }

    #[test]
    fn test_text_graphic_carries_content() {
        let g = Graphic::text(
            Point::new(1.0, 2.0),
            TextSymbol::new("hello", TextStyle::default()),
        );
        assert_eq!(g.symbol.text(), Some("hello"));
    }

    #[test]
    fn test_clone_preserves_identity() {
        let mut g = Graphic::new(None, Symbol::default_marker());
        g.assign_id(7);
        assert_eq!(g.clone().assigned_id(), Some(7));
    }
}
