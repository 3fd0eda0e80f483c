//! View-driven label reflow.
//!
//! Pixel offsets baked into label positions go stale whenever the
//! screen/world mapping changes, so view-stationary and scale-change
//! notifications schedule a full regeneration of every persisted label.
//! The timer coalesces rapid triggers and stays quiet while an operation
//! is in progress, so drag feedback never races a full rebuild.

use std::time::{Duration, Instant};

use super::{EditorMode, SketchEditor};
use crate::graphic_store::GraphicKey;
use crate::identity::ShapeId;
use crate::labeling;

/// Debounce window for view-driven reflow.
pub const REFLOW_DEBOUNCE: Duration = Duration::from_millis(80);

/// Cancellable single-shot deadline, rearmed on each trigger.
#[derive(Debug, Clone)]
pub struct ReflowTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl ReflowTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Schedules (or reschedules) the deadline `window` from `now`;
    /// repeated triggers within the window coalesce into one firing.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the deadline if it has passed.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl SketchEditor {
    pub(super) fn on_view_changed(&mut self, now: Instant) {
        // Suppressed entirely while an operation is active.
        if self.mode == EditorMode::Idle {
            self.reflow.arm(now);
        }
    }

    /// Drives the debounce timer; runs the pending reflow once due.
    ///
    /// Returns whether a reflow ran. The no-active-operation guard is
    /// re-checked at fire time: an operation that started after arming
    /// swallows the pending reflow.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.reflow.fire_due(now) {
            return false;
        }
        if self.mode != EditorMode::Idle {
            return false;
        }
        self.reflow_all();
        true
    }

    /// Removes and regenerates every persisted label in the primary shape
    /// collection, rebuilding the label index from scratch.
    ///
    /// Idempotent: unchanged geometry and settings reproduce an identical
    /// index.
    pub fn reflow_all(&mut self) {
        let ids: Vec<ShapeId> = self.label_index.ids().collect();
        for id in ids {
            labeling::remove_labels(&mut self.labels, &mut self.label_index, id);
        }
        let keys: Vec<GraphicKey> = self.draw.keys().collect();
        for key in keys {
            let info = {
                let Some(graphic) = self.draw.get_mut(key) else {
                    continue;
                };
                let Some(geometry) = graphic.geometry.clone() else {
                    continue;
                };
                let id = self.registry.id_of(graphic);
                (id, geometry, graphic.tool, graphic.title.clone())
            };
            let (id, geometry, tool, title) = info;
            let placements = self.full_label_set(&geometry, tool, title.as_deref());
            labeling::replace_labels(
                &mut self.labels,
                &mut self.label_index,
                id,
                &placements,
                &self.settings,
            );
        }
        tracing::debug!(shapes = self.label_index.len(), "labels reflowed");
    }
}
