//! Save/load through the versioned payload.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use super::SketchEditor;
use crate::graphic_store::GraphicKey;
use crate::identity::ShapeId;
use crate::serialization::{GraphicData, SketchPayload, PAYLOAD_VERSION};

impl SketchEditor {
    /// Captures the current sketch state; always emits the current payload
    /// version. Clones and transient labels are never persisted.
    pub fn export_payload(&self) -> SketchPayload {
        let mut owners: HashMap<GraphicKey, ShapeId> = HashMap::new();
        for id in self.label_index.ids() {
            for key in self.label_index.get(id).unwrap_or(&[]) {
                owners.insert(*key, id);
            }
        }
        SketchPayload {
            version: PAYLOAD_VERSION,
            draw: self
                .draw
                .iter()
                .map(|(_, g)| GraphicData::from_graphic(g, None))
                .collect(),
            labels: self
                .labels
                .iter()
                .filter(|(key, _)| !self.transient_labels.contains(key))
                .map(|(key, g)| GraphicData::from_graphic(g, owners.get(&key).copied()))
                .collect(),
            text: self
                .text
                .iter()
                .map(|(_, g)| GraphicData::from_graphic(g, None))
                .collect(),
        }
    }

    /// Replaces the sketch state from a payload.
    ///
    /// Fails with no partial import on an unsupported version. A legacy
    /// payload simply restores an empty text collection.
    pub fn import_payload(&mut self, payload: SketchPayload) -> mapsketch_core::Result<()> {
        payload.check_version()?;
        self.clear();
        for data in payload.draw {
            let graphic = data.into_graphic();
            if let Some(id) = graphic.assigned_id() {
                self.registry.reserve_through(id);
            }
            self.draw.add(graphic);
        }
        for data in payload.labels {
            let owner = data.owner;
            let graphic = data.into_graphic();
            let key = self.labels.add(graphic);
            if let Some(id) = owner {
                self.registry.reserve_through(id);
                self.label_index.record(id, key);
            }
        }
        for data in payload.text {
            let graphic = data.into_graphic();
            if let Some(id) = graphic.assigned_id() {
                self.registry.reserve_through(id);
            }
            self.text.add(graphic);
        }
        Ok(())
    }

    /// Saves the sketch as pretty-printed JSON.
    ///
    /// A failed save leaves the in-memory session untouched; the caller
    /// decides whether to surface or just log it.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let payload = self.export_payload();
        let json =
            serde_json::to_string_pretty(&payload).context("Failed to serialize sketch")?;
        std::fs::write(path.as_ref(), json).context("Failed to write sketch file")?;
        Ok(())
    }

    /// Loads a sketch file, replacing the current state.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read sketch file")?;
        let payload: SketchPayload =
            serde_json::from_str(&content).context("Failed to parse sketch file")?;
        self.import_payload(payload)
            .context("Failed to import sketch payload")?;
        Ok(())
    }
}
