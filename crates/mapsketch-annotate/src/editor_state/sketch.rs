//! Creation and update phase handling.

use super::events::{EditorEffect, SketchPhase, UpdateTarget};
use super::{EditorMode, SketchEditor};
use crate::graphics::{DrawTool, Graphic};
use crate::labeling;
use mapsketch_core::geometry::Geometry;

impl SketchEditor {
    pub(super) fn on_sketch(
        &mut self,
        phase: SketchPhase,
        geometry: Option<Geometry>,
    ) -> Vec<EditorEffect> {
        match self.mode {
            EditorMode::Selecting => self.on_marquee(phase, geometry),
            EditorMode::Creating(tool) => self.on_creation(tool, phase, geometry),
            _ => {
                tracing::warn!(?phase, "sketch phase outside a drawing operation, ignored");
                Vec::new()
            }
        }
    }

    fn on_creation(
        &mut self,
        tool: DrawTool,
        phase: SketchPhase,
        geometry: Option<Geometry>,
    ) -> Vec<EditorEffect> {
        match phase {
            SketchPhase::Active => {
                if !self.settings.labels.show_during_draw {
                    return Vec::new();
                }
                self.clear_transient_labels();
                let Some(geometry) = geometry else {
                    return Vec::new();
                };
                let title = self.pending_title.clone();
                let placements = self.draft_label_set(&geometry, Some(tool), title.as_deref());
                self.add_transient_labels(&placements);
                Vec::new()
            }
            SketchPhase::Complete => {
                self.clear_transient_labels();
                self.mode = EditorMode::Idle;
                let title = self.pending_title.take();
                let Some(geometry) = geometry else {
                    return Vec::new();
                };
                let mut graphic =
                    Graphic::new(Some(geometry.clone()), self.settings.symbol_for(tool))
                        .with_tool(tool);
                if let Some(title) = &title {
                    graphic = graphic.with_title(title.clone());
                }
                let id = self.registry.id_of(&mut graphic);
                self.draw.add(graphic);
                let placements = self.full_label_set(&geometry, Some(tool), title.as_deref());
                labeling::replace_labels(
                    &mut self.labels,
                    &mut self.label_index,
                    id,
                    &placements,
                    &self.settings,
                );
                tracing::debug!(id, tool = %tool, "shape completed");
                Vec::new()
            }
            SketchPhase::Cancel => {
                self.clear_transient_labels();
                self.mode = EditorMode::Idle;
                Vec::new()
            }
        }
    }

    pub(super) fn on_update(
        &mut self,
        phase: SketchPhase,
        targets: Vec<UpdateTarget>,
    ) -> Vec<EditorEffect> {
        match phase {
            SketchPhase::Active => self.on_update_active(targets),
            SketchPhase::Complete => self.on_update_complete(targets),
            SketchPhase::Cancel => {
                self.clear_transient_labels();
                if self.selection.is_active() {
                    self.selection.end(&mut self.working);
                }
                self.mode = EditorMode::Idle;
                vec![EditorEffect::SelectionCleared]
            }
        }
    }

    fn on_update_active(&mut self, targets: Vec<UpdateTarget>) -> Vec<EditorEffect> {
        self.mode = EditorMode::Updating;
        self.clear_transient_labels();
        let session = self.selection.is_active();

        let mut snapshots = Vec::new();
        for target in &targets {
            let store = if session { &mut self.working } else { &mut self.draw };
            let Some(graphic) = store.get_mut(target.key) else {
                tracing::warn!(key = target.key, "update target missing, skipped");
                continue;
            };
            if let Some(geometry) = &target.geometry {
                graphic.geometry = Some(geometry.clone());
            }
            if graphic.geometry.is_none() {
                continue;
            }
            let id = self.registry.id_of(graphic);
            snapshots.push((id, graphic.clone()));
        }

        let mut ids = Vec::with_capacity(snapshots.len());
        let mut rows = Vec::with_capacity(snapshots.len());
        for (id, graphic) in &snapshots {
            if self.settings.labels.show_during_draw {
                if let Some(geometry) = &graphic.geometry {
                    let placements =
                        self.draft_label_set(geometry, graphic.tool, graphic.title.as_deref());
                    self.add_transient_labels(&placements);
                }
            }
            if let Some(measurement) =
                self.computer.measurement_of(*id, graphic, &self.settings.labels)
            {
                rows.push(measurement);
            }
            ids.push(*id);
        }
        vec![
            EditorEffect::Measurements(rows),
            EditorEffect::SelectionChanged(ids),
        ]
    }

    fn on_update_complete(&mut self, targets: Vec<UpdateTarget>) -> Vec<EditorEffect> {
        self.clear_transient_labels();
        self.mode = EditorMode::Idle;

        if self.selection.is_active() {
            // Working-collection path: publish final rows, then geometry
            // flows back to the sources. Never regenerates per-shape labels;
            // the next reflow re-derives them.
            let mut rows = Vec::new();
            for target in &targets {
                let snapshot = {
                    let Some(graphic) = self.working.get_mut(target.key) else {
                        continue;
                    };
                    if let Some(geometry) = &target.geometry {
                        graphic.geometry = Some(geometry.clone());
                    }
                    if graphic.geometry.is_none() {
                        continue;
                    }
                    let id = self.registry.id_of(graphic);
                    (id, graphic.clone())
                };
                if let Some(measurement) =
                    self.computer
                        .measurement_of(snapshot.0, &snapshot.1, &self.settings.labels)
                {
                    rows.push(measurement);
                }
            }
            self.selection
                .commit(&mut self.draw, &mut self.text, &mut self.working);
            return vec![
                EditorEffect::Measurements(rows),
                EditorEffect::SelectionCleared,
            ];
        }

        // Direct edit of persisted shapes: regenerate each target's label
        // set exactly as on creation.
        let mut finalized = Vec::new();
        for target in &targets {
            let Some(graphic) = self.draw.get_mut(target.key) else {
                continue;
            };
            if let Some(geometry) = &target.geometry {
                graphic.geometry = Some(geometry.clone());
            }
            let Some(geometry) = graphic.geometry.clone() else {
                continue;
            };
            let id = self.registry.id_of(graphic);
            finalized.push((id, geometry, graphic.tool, graphic.title.clone()));
        }
        for (id, geometry, tool, title) in finalized {
            let placements = self.full_label_set(&geometry, tool, title.as_deref());
            labeling::replace_labels(
                &mut self.labels,
                &mut self.label_index,
                id,
                &placements,
                &self.settings,
            );
        }
        vec![EditorEffect::SelectionCleared]
    }
}
