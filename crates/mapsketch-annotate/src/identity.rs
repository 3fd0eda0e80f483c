//! Stable shape identity.
//!
//! Identifiers are assigned lazily: a graphic gets one the first time it is
//! asked for, and keeps it for its lifetime. Clones carry the source's
//! identifier with them and never receive a registry entry of their own.

use crate::graphics::Graphic;

/// Stable per-shape identifier, unique within the process.
pub type ShapeId = u64;

/// Assigns and recalls identifiers for shapes.
#[derive(Debug, Clone)]
pub struct IdRegistry {
    next_id: ShapeId,
}

impl IdRegistry {
    /// Creates a registry whose first issued identifier is 1.
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Returns the graphic's identifier, assigning a fresh one on first call.
    ///
    /// Repeated calls for the same graphic always return the same value.
    pub fn id_of(&mut self, graphic: &mut Graphic) -> ShapeId {
        if let Some(id) = graphic.assigned_id() {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        graphic.assign_id(id);
        id
    }

    /// Ensures future identifiers are issued strictly above `id`.
    ///
    /// Called after import so restored shapes never collide with new ones.
    pub fn reserve_through(&mut self, id: ShapeId) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}
