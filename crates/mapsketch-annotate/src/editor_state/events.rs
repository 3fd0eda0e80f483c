//! Event and effect types for the editor state machine.
//!
//! The view layer reports sketch operations as asynchronous phase
//! notifications; the editor consumes them through a single
//! `handle_event` entry point and answers with deterministic effects
//! (publications) instead of relying on callback ordering.

use crate::graphic_store::GraphicKey;
use crate::identity::ShapeId;
use crate::measure::Measurement;
use mapsketch_core::geometry::{Geometry, ScreenPoint};

/// Phase of a creation or update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchPhase {
    /// In-progress geometry, e.g. while dragging.
    Active,
    /// Finalized geometry.
    Complete,
    /// Aborted; no shape produced.
    Cancel,
}

/// One shape targeted by an update operation, with its latest geometry.
///
/// A missing geometry means the view had nothing usable for this shape on
/// this event; the editor skips it silently.
#[derive(Debug, Clone)]
pub struct UpdateTarget {
    pub key: GraphicKey,
    pub geometry: Option<Geometry>,
}

/// Input events driving the state machine.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A creation operation phase (the marquee, while selecting).
    Sketch {
        phase: SketchPhase,
        geometry: Option<Geometry>,
    },
    /// An in-place edit phase over one or more target shapes.
    Update {
        phase: SketchPhase,
        targets: Vec<UpdateTarget>,
    },
    /// Pointer click reported by the view.
    ViewClick { position: ScreenPoint },
    /// The view became stationary after navigation.
    ViewStationary,
    /// The view scale changed.
    ViewScaleChanged,
}

/// Publications produced by event handling, applied by the host in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    /// The identifiers now selected.
    SelectionChanged(Vec<ShapeId>),
    /// Selection is now empty.
    SelectionCleared,
    /// Live or final measurement rows for the affected shapes.
    Measurements(Vec<Measurement>),
}
