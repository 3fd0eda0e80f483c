//! Label synthesis and placement.
//!
//! Three label families: per-edge segment labels rotated along their edge,
//! the stacked center block of totals at a shape's anchor, and the
//! standalone title placed above the block on finalize. Pixel offsets are
//! routed through the view projector so labels stay put on screen as the
//! view changes; a reflow regenerates everything from scratch.

use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::graphic_store::{GraphicKey, GraphicStore};
use crate::graphics::{DrawSettings, DrawTool, Graphic, TextSymbol};
use crate::identity::ShapeId;
use crate::measure::MeasureComputer;
use crate::viewport::ViewProjector;
use mapsketch_core::geometry::{Geometry, Point, ScreenPoint};

/// Perpendicular screen offset applied to segment labels.
pub const SEGMENT_LABEL_OFFSET_PX: f64 = 10.0;

/// A positioned label ready to become a text graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub position: Point,
    pub text: String,
    pub angle_deg: f64,
}

/// Normalizes a bearing into [-90°, 90°] so label text never renders
/// upside-down.
pub fn normalize_bearing(mut deg: f64) -> f64 {
    while deg > 90.0 {
        deg -= 180.0;
    }
    while deg < -90.0 {
        deg += 180.0;
    }
    deg
}

/// Mapping from shape identifier to the labels currently representing it.
///
/// At most one entry per shape; replacement is atomic, with the old labels
/// fully removed from the label store before any new one is added.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    entries: HashMap<ShapeId, SmallVec<[GraphicKey; 4]>>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label keys currently recorded for a shape.
    pub fn get(&self, id: ShapeId) -> Option<&[GraphicKey]> {
        self.entries.get(&id).map(|keys| keys.as_slice())
    }

    /// Removes and returns a shape's entry.
    pub fn take(&mut self, id: ShapeId) -> SmallVec<[GraphicKey; 4]> {
        self.entries.remove(&id).unwrap_or_default()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, id: ShapeId, keys: SmallVec<[GraphicKey; 4]>) {
        if keys.is_empty() {
            self.entries.remove(&id);
        } else {
            self.entries.insert(id, keys);
        }
    }

    /// Appends one label key to a shape's entry; used when rebuilding the
    /// index from a persisted payload.
    pub(crate) fn record(&mut self, id: ShapeId, key: GraphicKey) {
        self.entries.entry(id).or_default().push(key);
    }
}

/// Atomically replaces a shape's persisted labels.
///
/// Old labels leave the store before new ones are added, so no interleaved
/// state is ever observable.
pub fn replace_labels(
    store: &mut GraphicStore,
    index: &mut LabelIndex,
    id: ShapeId,
    placements: &[LabelPlacement],
    settings: &DrawSettings,
) {
    for key in index.take(id) {
        store.remove(key);
    }
    let mut keys = SmallVec::new();
    for placement in placements {
        keys.push(store.add(placement_graphic(placement, settings)));
    }
    index.insert(id, keys);
}

/// Removes a shape's labels without regenerating them.
pub fn remove_labels(store: &mut GraphicStore, index: &mut LabelIndex, id: ShapeId) {
    for key in index.take(id) {
        store.remove(key);
    }
}

/// Builds the text graphic for one placement.
pub fn placement_graphic(placement: &LabelPlacement, settings: &DrawSettings) -> Graphic {
    Graphic::text(
        placement.position,
        TextSymbol::new(placement.text.clone(), settings.text.clone())
            .with_angle(placement.angle_deg),
    )
}

/// Produces positioned labels for a shape from its geometry, the session
/// settings, and measurement results.
#[derive(Clone)]
pub struct LabelPlacer {
    projector: Rc<dyn ViewProjector>,
}

impl LabelPlacer {
    pub fn new(projector: Rc<dyn ViewProjector>) -> Self {
        Self { projector }
    }

    /// Offsets a world anchor by screen pixels, degrading to the plain
    /// anchor when either projection direction is unavailable.
    fn offset_px(&self, anchor: Point, dx_px: f64, dy_px: f64) -> Point {
        let Some(screen) = self.projector.to_screen(anchor) else {
            return anchor;
        };
        let shifted = ScreenPoint::new(screen.x + dx_px, screen.y + dy_px);
        self.projector.to_map(shifted).unwrap_or(anchor)
    }

    /// Per-edge length labels, rotated along their edge and nudged
    /// perpendicular so they clear the stroke.
    pub fn segment_labels(
        &self,
        geometry: &Geometry,
        computer: &MeasureComputer,
    ) -> Vec<LabelPlacement> {
        let segments = computer.segments(geometry);
        let lengths = computer.segment_lengths(geometry);
        segments
            .iter()
            .zip(lengths)
            .map(|(segment, length)| {
                let angle = normalize_bearing(segment.angle_deg());
                let theta = (angle + 90.0).to_radians();
                let position = self.offset_px(
                    segment.midpoint(),
                    SEGMENT_LABEL_OFFSET_PX * theta.cos(),
                    -SEGMENT_LABEL_OFFSET_PX * theta.sin(),
                );
                LabelPlacement {
                    position,
                    text: computer.format_length(length),
                    angle_deg: angle,
                }
            })
            .collect()
    }

    /// The vertically stacked totals block at the shape's anchor.
    ///
    /// Line order is fixed: title (inline form only), then totals, then
    /// circle radius. `dy = (i - (n - 1)) * line_height` puts the first line
    /// highest.
    pub fn center_block(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        inline_title: Option<&str>,
        computer: &MeasureComputer,
        settings: &DrawSettings,
    ) -> Vec<LabelPlacement> {
        let Some(anchor) = geometry.anchor() else {
            return Vec::new();
        };
        let lines = self.block_lines(geometry, tool, inline_title, computer, settings);
        if lines.is_empty() {
            return Vec::new();
        }
        let line_height = (settings.text.font_size * 1.2).round();
        let n = lines.len();
        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let dy = (i as f64 - (n as f64 - 1.0)) * line_height;
                LabelPlacement {
                    position: self.offset_px(anchor, 0.0, dy),
                    text,
                    angle_deg: 0.0,
                }
            })
            .collect()
    }

    fn block_lines(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        inline_title: Option<&str>,
        computer: &MeasureComputer,
        settings: &DrawSettings,
    ) -> Vec<String> {
        let policy = settings.labels;
        let mut lines = Vec::new();
        if policy.show_title {
            if let Some(title) = inline_title.filter(|t| !t.is_empty()) {
                lines.push(title.to_string());
            }
        }
        match geometry {
            Geometry::Point(_) => {}
            Geometry::Polyline(line) => {
                if policy.show_totals {
                    lines.push(format!("L={}", computer.format_length(computer.length(line))));
                }
            }
            Geometry::Polygon(polygon) => {
                if policy.show_totals {
                    lines.push(format!("A={}", computer.format_area(computer.area(polygon))));
                    lines.push(format!(
                        "P={}",
                        computer.format_length(computer.perimeter(polygon))
                    ));
                }
                if tool == Some(DrawTool::Circle) && policy.show_circle_radius {
                    lines.push(format!(
                        "R={}",
                        computer.format_length(computer.radius(polygon))
                    ));
                }
            }
        }
        lines
    }

    /// Number of measurement lines the center block shows for a polygon,
    /// used to size the standalone title's separation.
    fn measurement_line_count(&self, tool: Option<DrawTool>, settings: &DrawSettings) -> usize {
        let policy = settings.labels;
        let mut count = 0;
        if policy.show_totals {
            count += 2;
        }
        if tool == Some(DrawTool::Circle) && policy.show_circle_radius {
            count += 1;
        }
        count
    }

    /// The standalone title label placed above the measurement block when a
    /// shape is finalized.
    ///
    /// Returns `None` when titles are disabled, the title is empty, or the
    /// geometry has no derivable anchor.
    pub fn standalone_title(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        title: &str,
        settings: &DrawSettings,
    ) -> Option<LabelPlacement> {
        if !settings.labels.show_title || title.is_empty() {
            return None;
        }
        let anchor = geometry.anchor()?;
        let line_height = (settings.text.font_size * 1.2).round();
        let spacing = settings.text.font_size.round();
        let separation = match geometry {
            Geometry::Point(_) => 0.0,
            Geometry::Polyline(_) => {
                if settings.labels.show_totals {
                    line_height
                } else {
                    0.0
                }
            }
            Geometry::Polygon(_) => {
                let count = self.measurement_line_count(tool, settings) as f64;
                ((count + 1.0) / 2.0 * spacing).round()
            }
        };
        Some(LabelPlacement {
            position: self.offset_px(anchor, 0.0, -separation),
            text: title.to_string(),
            angle_deg: 0.0,
        })
    }

    /// The full label set for one shape: segment labels plus the center
    /// block. The title appears inline during draw feedback
    /// (`inline_title = true`); finalized shapes place it standalone via
    /// [`LabelPlacer::standalone_title`] instead.
    pub fn place_shape(
        &self,
        geometry: &Geometry,
        tool: Option<DrawTool>,
        title: Option<&str>,
        inline_title: bool,
        computer: &MeasureComputer,
        settings: &DrawSettings,
    ) -> Vec<LabelPlacement> {
        let mut placements = Vec::new();
        if settings.labels.show_segment_lengths {
            placements.extend(self.segment_labels(geometry, computer));
        }
        let inline = if inline_title { title } else { None };
        placements.extend(self.center_block(geometry, tool, inline, computer, settings));
        placements
    }
}
