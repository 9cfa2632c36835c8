//! Property tests for the polygon pipeline

use broadcast_areas_core::models::{AxisOrder, Ring};
use broadcast_areas_geo::PolygonSet;
use proptest::prelude::*;

fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Ring {
    vec![[x, y], [x + width, y], [x + width, y + height], [x, y + height], [x, y]]
}

fn circle(cx: f64, cy: f64, radius: f64, points: usize) -> Ring {
    let mut ring: Ring = (0..points)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / points as f64;
            [cx + radius * angle.cos(), cy + radius * angle.sin()]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

proptest! {
    #[test]
    fn test_remove_too_small_is_idempotent(
        sizes in prop::collection::vec(0.00005f64..0.01, 1..8),
    ) {
        let rings: Vec<Ring> = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| rectangle(i as f64, 0.0, *size, *size))
            .collect();
        let polygons = PolygonSet::from_coordinates(&rings).unwrap();

        let once = polygons.remove_too_small();
        let twice = once.remove_too_small();
        prop_assert_eq!(once, twice);
        prop_assert!(once.len() <= polygons.len());
    }

    #[test]
    fn test_area_scales_with_square_of_size(
        x in -10.0f64..10.0,
        y in 40.0f64..60.0,
        size in 0.01f64..1.0,
        k in 1.0f64..5.0,
    ) {
        let small = PolygonSet::from_coordinates(&[rectangle(x, y, size, size)]).unwrap();
        let large = PolygonSet::from_coordinates(&[rectangle(x, y, size * k, size * k)]).unwrap();

        let ratio = large.estimated_area() / small.estimated_area();
        prop_assert!((ratio - k * k).abs() < 1e-6 * k * k);
    }

    #[test]
    fn test_coordinate_pairs_round_trip(
        x in -8.0f64..2.0,
        y in 49.0f64..61.0,
        width in 0.001f64..2.0,
        height in 0.001f64..2.0,
    ) {
        let ring = rectangle(x, y, width, height);
        let polygons = PolygonSet::from_coordinates(&[ring.clone()]).unwrap();

        prop_assert_eq!(&polygons.as_coordinate_pairs_long_lat()[0], &ring);

        let lat_long = polygons.as_coordinate_pairs_lat_long();
        let back = PolygonSet::from_coordinate_pairs(&lat_long, AxisOrder::LatLong).unwrap();
        prop_assert_eq!(back, polygons);
    }

    #[test]
    fn test_inward_buffer_is_smaller_than_outward(
        width in 0.001f64..5.0,
        height in 0.001f64..5.0,
    ) {
        let polygons = PolygonSet::from_coordinates(&[rectangle(0.0, 0.0, width, height)]).unwrap();

        prop_assert!(polygons.buffer_inward_in_degrees() < polygons.buffer_outward_in_degrees());
        prop_assert!(polygons.simplification_tolerance_in_degrees() > 0.0);
    }
}

#[test]
fn test_smooth_and_simplify_reduce_detailed_outline() {
    let polygons = PolygonSet::from_coordinates(&[circle(-1.5, 53.0, 0.2, 200)]).unwrap();
    let simple = polygons.smooth().simplify();

    assert_eq!(polygons.point_count(), 201);
    assert!(simple.point_count() < polygons.point_count());
    assert!(simple.estimated_area() >= polygons.estimated_area() * 0.999);
}
