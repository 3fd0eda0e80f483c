//! # MapSketch Annotate
//!
//! Interactive vector-annotation engine: drives the lifecycle of user-drawn
//! shapes (create, edit, select, cancel), derives geometric measurements,
//! synthesizes and repositions text labels as the view changes, and supports
//! cross-collection joint editing via temporary clones.
//!
//! ## Core Components
//!
//! - **Graphics**: shapes, symbols, and the session drawing settings
//! - **Graphic stores**: the ordered render collections (draw, label, text,
//!   and the transient working collection)
//! - **Identity**: lazy stable identifiers per shape
//! - **Measure**: length/area/perimeter/radius values and formatted strings
//! - **Labeling**: segment labels, the stacked center block, standalone
//!   titles, and the per-shape label index
//! - **Selection manager**: clone-based joint editing sessions
//! - **Editor state**: the mode-dependent event router owning all of the
//!   above
//!
//! ## Architecture
//!
//! ```text
//! SketchEditor (event entry point)
//!   ├── GraphicStore ×4 (draw / label / text / working)
//!   ├── IdRegistry
//!   ├── MeasureComputer ──▶ GeometryEngine (external capability)
//!   ├── LabelPlacer ──────▶ ViewProjector (external capability)
//!   ├── LabelIndex
//!   ├── SelectionManager (clone ↔ source table)
//!   └── ReflowTimer (debounced label rebuild)
//! ```
//!
//! Everything is single-threaded and cooperative: events arrive from the
//! view layer one at a time, effects come back as explicit publications,
//! and the only timing construct is the reflow debounce driven by
//! [`SketchEditor::poll`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use mapsketch_annotate::{PlanarEngine, SketchEditor, Viewport};
//!
//! let mut editor = SketchEditor::new(
//!     Rc::new(PlanarEngine::new()),
//!     Rc::new(Viewport::new(1280.0, 720.0)),
//! );
//! editor.begin_draw();
//! // feed sketch phases from the view layer...
//! ```

pub mod editor_state;
pub mod engine;
pub mod graphic_store;
pub mod graphics;
pub mod identity;
pub mod labeling;
pub mod measure;
pub mod selection_manager;
pub mod serialization;
pub mod viewport;

pub use editor_state::{
    EditorEffect, EditorEvent, EditorMode, ReflowTimer, SketchEditor, SketchPhase, UpdateTarget,
    REFLOW_DEBOUNCE,
};
pub use engine::{GeometryEngine, PlanarEngine};
pub use graphic_store::{GraphicKey, GraphicStore};
pub use graphics::{
    Color, DrawSettings, DrawTool, FillStyle, Graphic, LabelPolicy, MarkerStyle, StrokeStyle,
    Symbol, TextStyle, TextSymbol,
};
pub use identity::{IdRegistry, ShapeId};
pub use labeling::{LabelIndex, LabelPlacement, LabelPlacer, SEGMENT_LABEL_OFFSET_PX};
pub use measure::{MeasureComputer, MeasureRow, Measurement, Segment};
pub use selection_manager::{SelectionManager, SourceCollection, SourceRef};
pub use serialization::{GraphicData, SketchPayload, OLDEST_SUPPORTED_VERSION, PAYLOAD_VERSION};
pub use viewport::{ViewProjector, Viewport};
