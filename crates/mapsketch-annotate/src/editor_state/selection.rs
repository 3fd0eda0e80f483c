//! Marquee, click, and programmatic selection paths.
//!
//! All three converge on the same join-session start; only the way the
//! source set is discovered differs: geometric intersection for the
//! marquee, screen-space hit testing for clicks, identifier resolution for
//! the external list UI.

use super::events::{EditorEffect, SketchPhase};
use super::{EditorMode, SketchEditor};
use crate::identity::ShapeId;
use crate::selection_manager::SourceRef;
use mapsketch_core::geometry::{Geometry, ScreenPoint};

/// Pixel radius for click hit-testing against the text overlay.
const CLICK_TOLERANCE_PX: f64 = 8.0;

impl SketchEditor {
    pub(super) fn on_marquee(
        &mut self,
        phase: SketchPhase,
        geometry: Option<Geometry>,
    ) -> Vec<EditorEffect> {
        match phase {
            // No preview labels while dragging out the marquee.
            SketchPhase::Active => Vec::new(),
            SketchPhase::Complete => {
                self.mode = EditorMode::Idle;
                // The marquee shape itself is never persisted.
                let Some(marquee) = geometry else {
                    return vec![EditorEffect::SelectionCleared];
                };
                let sources = self.intersecting_sources(&marquee);
                if sources.is_empty() {
                    return vec![EditorEffect::SelectionCleared];
                }
                self.begin_session(&sources)
            }
            SketchPhase::Cancel => {
                self.mode = EditorMode::Idle;
                vec![EditorEffect::SelectionCleared]
            }
        }
    }

    /// Shapes in any source collection whose geometry intersects the
    /// marquee.
    fn intersecting_sources(&self, marquee: &Geometry) -> Vec<SourceRef> {
        let mut sources = Vec::new();
        for (key, graphic) in self.draw.iter() {
            if let Some(geometry) = &graphic.geometry {
                if self.engine.intersects(marquee, geometry) {
                    sources.push(SourceRef::draw(key));
                }
            }
        }
        for (key, graphic) in self.text.iter() {
            if let Some(geometry) = &graphic.geometry {
                if self.engine.intersects(marquee, geometry) {
                    sources.push(SourceRef::text(key));
                }
            }
        }
        sources
    }

    /// Starts a join session over resolved sources and enters update mode.
    fn begin_session(&mut self, sources: &[SourceRef]) -> Vec<EditorEffect> {
        let clones = self.selection.begin(
            sources,
            &mut self.draw,
            &mut self.text,
            &mut self.working,
            &mut self.registry,
        );
        if clones.is_empty() {
            self.mode = EditorMode::Idle;
            return vec![EditorEffect::SelectionCleared];
        }
        self.mode = EditorMode::Updating;
        let ids: Vec<ShapeId> = clones
            .iter()
            .filter_map(|key| self.working.get(*key).and_then(|g| g.assigned_id()))
            .collect();
        vec![EditorEffect::SelectionChanged(ids)]
    }

    /// Programmatic multi-select from an external list UI.
    ///
    /// Resolves each identifier across the source collections and begins a
    /// join session over the resolved set, mirroring the marquee path
    /// without the intersection test.
    pub fn select_ids(&mut self, ids: &[ShapeId]) -> Vec<EditorEffect> {
        let mut sources = Vec::new();
        for &id in ids {
            let in_draw = self
                .draw
                .iter()
                .find(|(_, g)| g.assigned_id() == Some(id))
                .map(|(key, _)| SourceRef::draw(key));
            let resolved = in_draw.or_else(|| {
                self.text
                    .iter()
                    .find(|(_, g)| g.assigned_id() == Some(id))
                    .map(|(key, _)| SourceRef::text(key))
            });
            match resolved {
                Some(source) => sources.push(source),
                None => tracing::warn!(id, "selected identifier not found, skipped"),
            }
        }
        if sources.is_empty() {
            return vec![EditorEffect::SelectionCleared];
        }
        self.begin_session(&sources)
    }

    pub(super) fn on_click(&mut self, position: ScreenPoint) -> Vec<EditorEffect> {
        // One-shot free-text placement consumes the click.
        if let Some(content) = self.pending_text.take() {
            match self.projector.to_map(position) {
                Some(point) => self.place_pending_text(point, content),
                None => tracing::warn!("click position unprojectable, free text dropped"),
            }
            return Vec::new();
        }
        if self.mode != EditorMode::Idle {
            return Vec::new();
        }
        let Some(hit) = self.hit_test_text(position) else {
            return Vec::new();
        };
        self.begin_session(&[hit])
    }

    /// Topmost text-overlay shape under the click, by extent containment or
    /// anchor proximity in screen space.
    fn hit_test_text(&self, position: ScreenPoint) -> Option<SourceRef> {
        let world = self.projector.to_map(position);
        let entries: Vec<_> = self.text.iter().collect();
        for (key, graphic) in entries.into_iter().rev() {
            let Some(geometry) = &graphic.geometry else {
                continue;
            };
            if let Some(world) = world {
                if geometry.extent().is_some_and(|e| e.contains(world)) {
                    return Some(SourceRef::text(key));
                }
            }
            if let Some(anchor) = geometry.anchor() {
                if let Some(screen) = self.projector.to_screen(anchor) {
                    let dx = screen.x - position.x;
                    let dy = screen.y - position.y;
                    if (dx * dx + dy * dy).sqrt() <= CLICK_TOLERANCE_PX {
                        return Some(SourceRef::text(key));
                    }
                }
            }
        }
        None
    }
}
