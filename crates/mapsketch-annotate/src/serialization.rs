//! Versioned sketch payload.
//!
//! The wire format is `{version, draw[], labels[], text[]}`. The importer
//! accepts the current version and the one prior legacy version, which
//! predates the free-text collection; anything else fails outright with no
//! partial import. The exporter always emits the current version.

use serde::{Deserialize, Serialize};

use crate::graphics::{DrawTool, Graphic, Symbol};
use crate::identity::ShapeId;
use mapsketch_core::geometry::Geometry;
use mapsketch_core::{Error, Result};

/// Current payload version.
pub const PAYLOAD_VERSION: u32 = 2;

/// Oldest payload version still accepted; lacks the `text` collection.
pub const OLDEST_SUPPORTED_VERSION: u32 = 1;

/// Serialized form of one graphic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicData {
    #[serde(default)]
    pub id: Option<ShapeId>,
    /// For labels: the shape this label belongs to in the label index.
    #[serde(default)]
    pub owner: Option<ShapeId>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub tool: Option<DrawTool>,
    #[serde(default)]
    pub title: Option<String>,
    pub symbol: Symbol,
}

impl GraphicData {
    /// Captures a graphic for export.
    pub fn from_graphic(graphic: &Graphic, owner: Option<ShapeId>) -> Self {
        Self {
            id: graphic.assigned_id(),
            owner,
            geometry: graphic.geometry.clone(),
            tool: graphic.tool,
            title: graphic.title.clone(),
            symbol: graphic.symbol.clone(),
        }
    }

    /// Rebuilds the graphic, restoring its identifier if one was persisted.
    pub fn into_graphic(self) -> Graphic {
        let mut graphic = Graphic::new(self.geometry, self.symbol);
        graphic.tool = self.tool;
        graphic.title = self.title;
        graphic.restore_id(self.id);
        graphic
    }
}

/// Complete persisted sketch state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchPayload {
    pub version: u32,
    pub draw: Vec<GraphicData>,
    pub labels: Vec<GraphicData>,
    #[serde(default)]
    pub text: Vec<GraphicData>,
}

impl SketchPayload {
    /// Creates an empty payload at the current version.
    pub fn new() -> Self {
        Self {
            version: PAYLOAD_VERSION,
            draw: Vec::new(),
            labels: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Rejects unsupported versions; the caller must surface this to the
    /// user and import nothing.
    pub fn check_version(&self) -> Result<()> {
        if (OLDEST_SUPPORTED_VERSION..=PAYLOAD_VERSION).contains(&self.version) {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                found: self.version,
                oldest: OLDEST_SUPPORTED_VERSION,
                newest: PAYLOAD_VERSION,
            })
        }
    }
}

impl Default for SketchPayload {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{MarkerStyle, Symbol};
    use mapsketch_core::geometry::Point;

    #[test]
    fn test_current_version_accepted() {
        assert!(SketchPayload::new().check_version().is_ok());
    }

    #[test]
    fn test_legacy_version_accepted() {
        let mut payload = SketchPayload::new();
        payload.version = OLDEST_SUPPORTED_VERSION;
        assert!(payload.check_version().is_ok());
    }

    #[test]
    fn test_future_version_rejected() {
        let mut payload = SketchPayload::new();
        payload.version = PAYLOAD_VERSION + 1;
        let err = payload.check_version().unwrap_err();
        assert!(err.is_version_mismatch());
    }

    #[test]
    fn test_legacy_json_without_text_field_parses() {
        let json = r#"{"version":1,"draw":[],"labels":[]}"#;
        let payload: SketchPayload = serde_json::from_str(json).unwrap();
        assert!(payload.text.is_empty());
        assert!(payload.check_version().is_ok());
    }

    #[test]
    fn test_graphic_round_trip_preserves_identity() {
        let mut graphic = Graphic::new(
            Some(Geometry::Point(Point::new(1.0, 2.0))),
            Symbol::Marker(MarkerStyle::default()),
        )
        .with_tool(DrawTool::Point)
        .with_title("Pin");
        graphic.assign_id(17);

        let data = GraphicData::from_graphic(&graphic, None);
        let restored = data.into_graphic();
        assert_eq!(restored, graphic);
        assert_eq!(restored.assigned_id(), Some(17));
    }
}
