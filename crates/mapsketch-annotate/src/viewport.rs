//! View projection between map and screen space.
//!
//! Label offsets are specified in pixels, so placement has to round-trip
//! world positions through the active view. The engine only depends on the
//! [`ViewProjector`] trait; [`Viewport`] is the bundled implementation for
//! hosts that render a flat map with center/scale navigation.

use mapsketch_core::geometry::{Extent, Point, ScreenPoint};

/// Screen/world coordinate conversion provided by the view layer.
///
/// Either direction may fail (view not ready, point outside the projectable
/// range); callers degrade to the unprojected anchor instead of erroring.
pub trait ViewProjector {
    /// Projects a world point into screen pixels.
    fn to_screen(&self, point: Point) -> Option<ScreenPoint>;

    /// Unprojects screen pixels into a world point.
    fn to_map(&self, point: ScreenPoint) -> Option<Point>;
}

/// Flat-map view state: world center, pixels-per-world-unit scale, and
/// canvas size. Screen origin is top-left with Y down; world Y goes up.
#[derive(Debug, Clone)]
pub struct Viewport {
    center: Point,
    scale: f64,
    width_px: f64,
    height_px: f64,
}

const MIN_SCALE: f64 = 1e-6;
const MAX_SCALE: f64 = 1e6;
const ZOOM_STEP: f64 = 1.25;

impl Viewport {
    /// Creates a viewport centered on the origin at 1 px per world unit.
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            scale: 1.0,
            width_px,
            height_px,
        }
    }

    /// Sets the canvas dimensions (typically on window resize).
    pub fn set_canvas_size(&mut self, width_px: f64, height_px: f64) {
        self.width_px = width_px;
        self.height_px = height_px;
    }

    /// Pixels per world unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the scale, clamped to a sane range.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / ZOOM_STEP);
    }

    /// The world point at the canvas center.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Centers the view on a world point.
    pub fn center_on(&mut self, point: Point) {
        self.center = point;
    }

    /// Pans by a screen-pixel delta.
    pub fn pan_by(&mut self, dx_px: f64, dy_px: f64) {
        self.center.x -= dx_px / self.scale;
        self.center.y += dy_px / self.scale;
    }

    /// Centers and scales so `extent` fills the canvas with `padding`
    /// (fraction of each canvas dimension) left around it.
    pub fn fit_to_extent(&mut self, extent: Extent, padding: f64) {
        let width = extent.xmax - extent.xmin;
        let height = extent.ymax - extent.ymin;
        if width <= 0.0 && height <= 0.0 {
            self.center = extent.center();
            return;
        }
        let usable = (1.0 - 2.0 * padding).max(0.1);
        let scale_x = if width > 0.0 {
            self.width_px * usable / width
        } else {
            MAX_SCALE
        };
        let scale_y = if height > 0.0 {
            self.height_px * usable / height
        } else {
            MAX_SCALE
        };
        self.set_scale(scale_x.min(scale_y));
        self.center = extent.center();
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

impl ViewProjector for Viewport {
    fn to_screen(&self, point: Point) -> Option<ScreenPoint> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        let x = (point.x - self.center.x) * self.scale + self.width_px / 2.0;
        let y = self.height_px / 2.0 - (point.y - self.center.y) * self.scale;
        Some(ScreenPoint::new(x, y))
    }

    fn to_map(&self, point: ScreenPoint) -> Option<Point> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return None;
        }
        let x = (point.x - self.width_px / 2.0) / self.scale + self.center.x;
        let y = (self.height_px / 2.0 - point.y) / self.scale + self.center.y;
        Some(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let view = Viewport::new(800.0, 600.0);
        let p = Point::new(123.5, -42.25);
        let s = view.to_screen(p).unwrap();
        let back = view.to_map(s).unwrap();
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_center_maps_to_canvas_center() {
        let mut view = Viewport::new(800.0, 600.0);
        view.center_on(Point::new(10.0, 20.0));
        let s = view.to_screen(Point::new(10.0, 20.0)).unwrap();
        assert_eq!(s, ScreenPoint::new(400.0, 300.0));
    }

    #[test]
    fn test_world_y_up_screen_y_down() {
        let view = Viewport::new(800.0, 600.0);
        let above = view.to_screen(Point::new(0.0, 10.0)).unwrap();
        let below = view.to_screen(Point::new(0.0, -10.0)).unwrap();
        assert!(above.y < below.y);
    }

    #[test]
    fn test_non_finite_point_does_not_project() {
        let view = Viewport::default();
        assert!(view.to_screen(Point::new(f64::NAN, 0.0)).is_none());
        assert!(view.to_map(ScreenPoint::new(f64::INFINITY, 0.0)).is_none());
    }

    #[test]
    fn test_fit_to_extent_contains_corners() {
        let mut view = Viewport::new(800.0, 600.0);
        view.fit_to_extent(Extent::new(0.0, 0.0, 400.0, 100.0), 0.05);
        let a = view.to_screen(Point::new(0.0, 0.0)).unwrap();
        let b = view.to_screen(Point::new(400.0, 100.0)).unwrap();
        for s in [a, b] {
            assert!(s.x >= 0.0 && s.x <= 800.0);
            assert!(s.y >= 0.0 && s.y <= 600.0);
        }
    }

    #[test]
    fn test_pan_by_moves_center() {
        let mut view = Viewport::new(800.0, 600.0);
        view.pan_by(100.0, 0.0);
        // Dragging the map 100 px right shows world 100 units further left.
        assert_eq!(view.center(), Point::new(-100.0, 0.0));
    }
}
