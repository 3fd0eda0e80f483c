//! Editor state machine for interactive annotation.
//!
//! Owns the render collections, the label index, and the session settings;
//! routes view events by mode. Split into submodules:
//! - `events`: event/effect types
//! - `sketch`: creation and update phase handling
//! - `selection`: marquee, click, and programmatic selection
//! - `reflow`: the debounced view-driven label rebuild
//! - `file_io`: save/load through the versioned payload

mod events;
mod file_io;
mod reflow;
mod selection;
mod sketch;

pub use events::{EditorEvent, EditorEffect, SketchPhase, UpdateTarget};
pub use reflow::{ReflowTimer, REFLOW_DEBOUNCE};

use std::rc::Rc;
use std::time::Instant;

use crate::engine::GeometryEngine;
use crate::graphic_store::{GraphicKey, GraphicStore};
use crate::graphics::{DrawSettings, DrawTool, Graphic, TextSymbol};
use crate::identity::IdRegistry;
use crate::labeling::{self, LabelIndex, LabelPlacement, LabelPlacer};
use crate::measure::MeasureComputer;
use crate::selection_manager::SelectionManager;
use crate::viewport::ViewProjector;
use mapsketch_core::geometry::Geometry;
use mapsketch_core::units::UnitFormat;

/// Current mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Creating(DrawTool),
    Updating,
    Selecting,
}

/// Top-level entry point of the annotation engine.
///
/// Single-threaded and event-driven: exactly one operation is active at a
/// time, and starting a new one implicitly cancels whatever the previous
/// one left in flight.
pub struct SketchEditor {
    engine: Rc<dyn GeometryEngine>,
    projector: Rc<dyn ViewProjector>,

    settings: DrawSettings,
    mode: EditorMode,

    draw: GraphicStore,
    labels: GraphicStore,
    text: GraphicStore,
    working: GraphicStore,

    registry: IdRegistry,
    computer: MeasureComputer,
    placer: LabelPlacer,
    label_index: LabelIndex,
    /// Labels for in-progress feedback; live outside the label index and are
    /// fully cleared before any new set is drawn.
    transient_labels: Vec<GraphicKey>,
    selection: SelectionManager,
    reflow: ReflowTimer,

    /// One-shot free-text placement awaiting a single click.
    pending_text: Option<String>,
    /// Title applied to the next completed shape.
    pending_title: Option<String>,
}

impl SketchEditor {
    /// Creates an editor over the given collaborator capabilities.
    pub fn new(engine: Rc<dyn GeometryEngine>, projector: Rc<dyn ViewProjector>) -> Self {
        Self {
            computer: MeasureComputer::new(Rc::clone(&engine)),
            placer: LabelPlacer::new(Rc::clone(&projector)),
            engine,
            projector,
            settings: DrawSettings::default(),
            mode: EditorMode::Idle,
            draw: GraphicStore::new(),
            labels: GraphicStore::new(),
            text: GraphicStore::new(),
            working: GraphicStore::new(),
            registry: IdRegistry::new(),
            label_index: LabelIndex::new(),
            transient_labels: Vec::new(),
            selection: SelectionManager::new(),
            reflow: ReflowTimer::new(REFLOW_DEBOUNCE),
            pending_text: None,
            pending_title: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    /// The primary shape collection.
    pub fn draw_layer(&self) -> &GraphicStore {
        &self.draw
    }

    /// The label collection.
    pub fn label_layer(&self) -> &GraphicStore {
        &self.labels
    }

    /// The free-text overlay collection.
    pub fn text_layer(&self) -> &GraphicStore {
        &self.text
    }

    /// The transient working collection; non-empty only during a join
    /// session.
    pub fn working_layer(&self) -> &GraphicStore {
        &self.working
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    /// Whether a joint editing session is active.
    pub fn session_active(&self) -> bool {
        self.selection.is_active()
    }

    /// Replaces the unit configuration of the measurement computer.
    pub fn set_units(&mut self, units: UnitFormat) {
        self.computer.set_units(units);
    }

    /// Sets the title applied to the next completed shape.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.pending_title = Some(title.into());
    }

    /// Arms the one-shot free-text handler; the next view click places the
    /// text.
    pub fn place_text(&mut self, content: impl Into<String>) {
        self.pending_text = Some(content.into());
    }

    /// Starts a drawing operation with the session tool.
    ///
    /// Cancels any pending one-shot handler and ends any active join
    /// session without persisting clones.
    pub fn begin_draw(&mut self) {
        self.interrupt_pending();
        self.mode = EditorMode::Creating(self.settings.tool);
        tracing::debug!(tool = %self.settings.tool, "draw started");
    }

    /// Enters the marquee selection sub-mode.
    pub fn begin_selection(&mut self) {
        self.interrupt_pending();
        self.mode = EditorMode::Selecting;
        tracing::debug!("selection started");
    }

    /// Replaces session settings, reapplies default symbology, and schedules
    /// a debounced reflow (suppressed while an operation is in progress).
    pub fn update_settings(&mut self, settings: DrawSettings, now: Instant) {
        self.settings = settings;
        let keys: Vec<GraphicKey> = self.draw.keys().collect();
        for key in keys {
            let Some(graphic) = self.draw.get_mut(key) else {
                continue;
            };
            if let Some(tool) = graphic.tool {
                graphic.symbol = self.settings.symbol_for(tool);
            }
        }
        if self.mode == EditorMode::Idle {
            self.reflow.arm(now);
        }
    }

    /// Routes one view event through the state machine.
    pub fn handle_event(&mut self, event: EditorEvent, now: Instant) -> Vec<EditorEffect> {
        match event {
            EditorEvent::Sketch { phase, geometry } => self.on_sketch(phase, geometry),
            EditorEvent::Update { phase, targets } => self.on_update(phase, targets),
            EditorEvent::ViewClick { position } => self.on_click(position),
            EditorEvent::ViewStationary | EditorEvent::ViewScaleChanged => {
                self.on_view_changed(now);
                Vec::new()
            }
        }
    }

    /// Removes every shape, label, and session artifact.
    pub fn clear(&mut self) {
        self.clear_transient_labels();
        self.selection.end(&mut self.working);
        self.draw.remove_all();
        self.labels.remove_all();
        self.text.remove_all();
        self.label_index.clear();
        self.reflow.cancel();
        self.mode = EditorMode::Idle;
        self.pending_text = None;
        self.pending_title = None;
    }

    /// Removes one shape and its persisted labels.
    pub fn remove_shape(&mut self, key: GraphicKey) -> Option<Graphic> {
        let graphic = self.draw.remove(key)?;
        if let Some(id) = graphic.assigned_id() {
            labeling::remove_labels(&mut self.labels, &mut self.label_index, id);
        }
        Some(graphic)
    }

    // Cancels whatever a previous operation left in flight: the one-shot
    // text handler, an active join session, and any transient labels.
    fn interrupt_pending(&mut self) {
        self.pending_text = None;
        if self.selection.is_active() {
            self.selection.end(&mut self.working);
        }
        self.clear_transient_labels();
    }

    /// Cleanup branch shared by every cancel path; runs before any step
    /// that can bail out, so a partially failed handler still cleans up.
    fn clear_transient_labels(&mut self) {
        for key in self.transient_labels.drain(..) {
            self.labels.remove(key);
        }
    }

    fn add_transient_labels(&mut self, placements: &[LabelPlacement]) {
        for placement in placements {
            let key = self
                .labels
                .add(labeling::placement_graphic(placement, &self.settings));
            self.transient_labels.push(key);
        }
    }

    /// The persisted label set of a finalized shape: segment labels, the
    /// center block, and the standalone title.
    fn full_label_set(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        title: Option<&str>,
    ) -> Vec<LabelPlacement> {
        let mut placements =
            self.placer
                .place_shape(geometry, tool, title, false, &self.computer, &self.settings);
        if let Some(title) = title {
            if let Some(placement) =
                self.placer
                    .standalone_title(geometry, tool, title, &self.settings)
            {
                placements.push(placement);
            }
        }
        placements
    }

    /// In-progress label set with the title shown inline in the center
    /// block.
    fn draft_label_set(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        title: Option<&str>,
    ) -> Vec<LabelPlacement> {
        self.placer
            .place_shape(geometry, tool, title, true, &self.computer, &self.settings)
    }

    fn place_pending_text(&mut self, position: mapsketch_core::geometry::Point, content: String) {
        let mut graphic = Graphic::text(
            position,
            TextSymbol::new(content, self.settings.text.clone()),
        )
        .with_tool(DrawTool::Text);
        self.registry.id_of(&mut graphic);
        self.text.add(graphic);
    }
}
