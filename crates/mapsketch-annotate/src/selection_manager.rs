//! Joint editing sessions over cloned shapes.
//!
//! Editing shapes that live in separate render collections goes through a
//! transient working collection: sources are deep-cloned, edits render on
//! the clones, and geometry flows back to the sources only at commit. The
//! clone-to-source association is an explicit table owned here rather than
//! a back-pointer on the clones, and is purged as a unit at session end.

use std::collections::HashMap;

use crate::graphic_store::{GraphicKey, GraphicStore};
use crate::identity::IdRegistry;

/// Which source collection a shape came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCollection {
    Draw,
    Text,
}

/// Address of a source shape across the editor's source collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    pub collection: SourceCollection,
    pub key: GraphicKey,
}

impl SourceRef {
    pub fn draw(key: GraphicKey) -> Self {
        Self {
            collection: SourceCollection::Draw,
            key,
        }
    }

    pub fn text(key: GraphicKey) -> Self {
        Self {
            collection: SourceCollection::Text,
            key,
        }
    }
}

/// Manages clone-based joint editing sessions.
///
/// The clone map is non-empty exactly while a session is active; commit and
/// cancel both clear it completely.
#[derive(Debug, Default)]
pub struct SelectionManager {
    clone_map: HashMap<GraphicKey, SourceRef>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a join session is currently active.
    pub fn is_active(&self) -> bool {
        !self.clone_map.is_empty()
    }

    /// The source a working-collection clone maps to.
    pub fn source_of(&self, clone_key: GraphicKey) -> Option<SourceRef> {
        self.clone_map.get(&clone_key).copied()
    }

    /// Starts a session over the given sources.
    ///
    /// Any previous working set is discarded first. Each source is cloned
    /// into the working store (geometry, symbol, and attributes) and its
    /// identifier is assigned up front so the clone borrows it; clones never
    /// get a registry entry of their own. Returns the working keys in source
    /// order.
    pub fn begin(
        &mut self,
        sources: &[SourceRef],
        draw: &mut GraphicStore,
        text: &mut GraphicStore,
        working: &mut GraphicStore,
        registry: &mut IdRegistry,
    ) -> Vec<GraphicKey> {
        self.end(working);
        let mut clone_keys = Vec::with_capacity(sources.len());
        for source in sources {
            let store = match source.collection {
                SourceCollection::Draw => &mut *draw,
                SourceCollection::Text => &mut *text,
            };
            let Some(graphic) = store.get_mut(source.key) else {
                tracing::warn!(key = source.key, "selection source disappeared, skipping");
                continue;
            };
            registry.id_of(graphic);
            let clone = graphic.clone();
            let clone_key = working.add(clone);
            self.clone_map.insert(clone_key, *source);
            clone_keys.push(clone_key);
        }
        tracing::debug!(count = clone_keys.len(), "join session started");
        clone_keys
    }

    /// Commits edited clone geometry back to the sources and ends the
    /// session.
    ///
    /// Clones with no map entry are ignored; sources that vanished since the
    /// session began are skipped. Sources are touched here and nowhere else.
    pub fn commit(
        &mut self,
        draw: &mut GraphicStore,
        text: &mut GraphicStore,
        working: &mut GraphicStore,
    ) {
        let edited: Vec<(GraphicKey, Option<mapsketch_core::geometry::Geometry>)> = working
            .iter()
            .map(|(key, graphic)| (key, graphic.geometry.clone()))
            .collect();
        for (clone_key, geometry) in edited {
            let Some(source) = self.clone_map.get(&clone_key) else {
                continue;
            };
            let store = match source.collection {
                SourceCollection::Draw => &mut *draw,
                SourceCollection::Text => &mut *text,
            };
            if let Some(graphic) = store.get_mut(source.key) {
                graphic.geometry = geometry;
            }
        }
        tracing::debug!(count = self.clone_map.len(), "join session committed");
        self.end(working);
    }

    /// Discards the working set and the clone map without touching sources.
    pub fn end(&mut self, working: &mut GraphicStore) {
        working.remove_all();
        self.clone_map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{Graphic, Symbol};
    use mapsketch_core::geometry::{Geometry, Point};

    fn point_graphic(x: f64, y: f64) -> Graphic {
        Graphic::new(Some(Geometry::Point(Point::new(x, y))), Symbol::default_marker())
    }

    struct Fixture {
        draw: GraphicStore,
        text: GraphicStore,
        working: GraphicStore,
        registry: IdRegistry,
        manager: SelectionManager,
    }

    fn fixture() -> Fixture {
        Fixture {
            draw: GraphicStore::new(),
            text: GraphicStore::new(),
            working: GraphicStore::new(),
            registry: IdRegistry::new(),
            manager: SelectionManager::new(),
        }
    }

    #[test]
    fn test_begin_clones_without_touching_sources() {
        let mut f = fixture();
        let key = f.draw.add(point_graphic(1.0, 2.0));
        let clones = f.manager.begin(
            &[SourceRef::draw(key)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        assert_eq!(clones.len(), 1);
        assert!(f.manager.is_active());

        // Mutating the clone leaves the source alone.
        f.working.get_mut(clones[0]).unwrap().geometry =
            Some(Geometry::Point(Point::new(9.0, 9.0)));
        assert_eq!(
            f.draw.get(key).unwrap().geometry,
            Some(Geometry::Point(Point::new(1.0, 2.0)))
        );
    }

    #[test]
    fn test_clone_borrows_source_identifier() {
        let mut f = fixture();
        let key = f.draw.add(point_graphic(0.0, 0.0));
        let clones = f.manager.begin(
            &[SourceRef::draw(key)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        let source_id = f.draw.get(key).unwrap().assigned_id().unwrap();
        assert_eq!(
            f.working.get(clones[0]).unwrap().assigned_id(),
            Some(source_id)
        );
    }

    #[test]
    fn test_commit_copies_geometry_and_tears_down() {
        let mut f = fixture();
        let key = f.draw.add(point_graphic(1.0, 1.0));
        let clones = f.manager.begin(
            &[SourceRef::draw(key)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        f.working.get_mut(clones[0]).unwrap().geometry =
            Some(Geometry::Point(Point::new(5.0, 6.0)));
        f.manager.commit(&mut f.draw, &mut f.text, &mut f.working);

        assert_eq!(
            f.draw.get(key).unwrap().geometry,
            Some(Geometry::Point(Point::new(5.0, 6.0)))
        );
        assert!(f.working.is_empty());
        assert!(!f.manager.is_active());
    }

    #[test]
    fn test_cancel_leaves_sources_unchanged() {
        let mut f = fixture();
        let key = f.draw.add(point_graphic(1.0, 1.0));
        let clones = f.manager.begin(
            &[SourceRef::draw(key)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        f.working.get_mut(clones[0]).unwrap().geometry =
            Some(Geometry::Point(Point::new(5.0, 6.0)));
        f.manager.end(&mut f.working);

        assert_eq!(
            f.draw.get(key).unwrap().geometry,
            Some(Geometry::Point(Point::new(1.0, 1.0)))
        );
        assert!(f.working.is_empty());
        assert!(!f.manager.is_active());
    }

    #[test]
    fn test_begin_discards_previous_session() {
        let mut f = fixture();
        let a = f.draw.add(point_graphic(0.0, 0.0));
        let b = f.draw.add(point_graphic(1.0, 1.0));
        f.manager.begin(
            &[SourceRef::draw(a)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        let clones = f.manager.begin(
            &[SourceRef::draw(b)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        assert_eq!(clones.len(), 1);
        assert_eq!(f.working.len(), 1);
    }

    #[test]
    fn test_unmapped_clone_is_ignored_at_commit() {
        let mut f = fixture();
        let key = f.draw.add(point_graphic(1.0, 1.0));
        f.manager.begin(
            &[SourceRef::draw(key)],
            &mut f.draw,
            &mut f.text,
            &mut f.working,
            &mut f.registry,
        );
        // A stray graphic in the working store with no map entry.
        f.working.add(point_graphic(7.0, 7.0));
        f.manager.commit(&mut f.draw, &mut f.text, &mut f.working);
        assert_eq!(
            f.draw.get(key).unwrap().geometry,
            Some(Geometry::Point(Point::new(1.0, 1.0)))
        );
        assert!(f.working.is_empty());
    }
}
