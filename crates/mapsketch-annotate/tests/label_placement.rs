//! Label placement property tests

use std::rc::Rc;

use proptest::prelude::*;

use mapsketch_annotate::labeling::normalize_bearing;
use mapsketch_annotate::{
    DrawSettings, LabelPlacer, MeasureComputer, PlanarEngine, Segment, Viewport,
};
use mapsketch_core::geometry::{Geometry, Point, Polyline};

#[test]
fn test_steep_bearing_normalizes_downward() {
    // An edge bearing of 170 degrees stores a label angle of -10.
    let angle = 170.0_f64;
    let dir = angle.to_radians();
    let segment = Segment::new(
        Point::new(0.0, 0.0),
        Point::new(dir.cos() * 100.0, dir.sin() * 100.0),
    );
    assert!((segment.angle_deg() - 170.0).abs() < 1e-9);
    assert!((normalize_bearing(segment.angle_deg()) - (-10.0)).abs() < 1e-9);
}

#[test]
fn test_segment_labels_survive_projection_failure() {
    /// Projector stub with no usable view.
    struct BlindProjector;

    impl mapsketch_annotate::ViewProjector for BlindProjector {
        fn to_screen(
            &self,
            _point: Point,
        ) -> Option<mapsketch_core::geometry::ScreenPoint> {
            None
        }
        fn to_map(
            &self,
            _point: mapsketch_core::geometry::ScreenPoint,
        ) -> Option<Point> {
            None
        }
    }

    let placer = LabelPlacer::new(Rc::new(BlindProjector));
    let computer = MeasureComputer::new(Rc::new(PlanarEngine::new()));
    let line = Geometry::Polyline(Polyline::single(vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
    ]));
    let labels = placer.segment_labels(&line, &computer);
    assert_eq!(labels.len(), 1);
    // The offset degrades to the unmodified midpoint.
    assert_eq!(labels[0].position, Point::new(50.0, 0.0));
}

proptest! {
    #[test]
    fn prop_normalized_bearing_is_never_upside_down(deg in -720.0f64..720.0) {
        let normalized = normalize_bearing(deg);
        prop_assert!((-90.0..=90.0).contains(&normalized));
        // Normalization only ever adds or subtracts half turns.
        let delta = (deg - normalized).rem_euclid(180.0);
        prop_assert!(delta.abs() < 1e-9 || (delta - 180.0).abs() < 1e-9);
    }

    #[test]
    fn prop_segment_label_angles_are_normalized(
        x1 in -1000.0f64..1000.0,
        y1 in -1000.0f64..1000.0,
        x2 in -1000.0f64..1000.0,
        y2 in -1000.0f64..1000.0,
    ) {
        prop_assume!((x1 - x2).abs() > 1e-6 || (y1 - y2).abs() > 1e-6);
        let placer = LabelPlacer::new(Rc::new(Viewport::new(800.0, 600.0)));
        let computer = MeasureComputer::new(Rc::new(PlanarEngine::new()));
        let line = Geometry::Polyline(Polyline::single(vec![
            Point::new(x1, y1),
            Point::new(x2, y2),
        ]));
        for label in placer.segment_labels(&line, &computer) {
            prop_assert!((-90.0..=90.0).contains(&label.angle_deg));
        }
    }

    #[test]
    fn prop_center_block_lines_stack_highest_first(size in 1.0f64..5000.0) {
        let placer = LabelPlacer::new(Rc::new(Viewport::new(800.0, 600.0)));
        let computer = MeasureComputer::new(Rc::new(PlanarEngine::new()));
        let settings = DrawSettings::default();
        let square = Geometry::Polygon(mapsketch_core::geometry::Polygon::rectangle(
            mapsketch_core::geometry::Extent::new(0.0, 0.0, size, size),
        ));
        let block = placer.center_block(
            &square,
            Some(mapsketch_annotate::DrawTool::Polygon),
            Some("title"),
            &computer,
            &settings,
        );
        prop_assert_eq!(block.len(), 3);
        for pair in block.windows(2) {
            prop_assert!(pair[0].position.y > pair[1].position.y);
        }
    }
}
