//! Polygon sets and the broadcast shape pipeline
//!
//! A `PolygonSet` is an immutable collection of longitude/latitude polygons
//! treated as one shape. Every transformation returns a new set, and every
//! derived value is computed at most once per set.

use std::fmt;
use std::sync::OnceLock;

use broadcast_areas_core::error::Result;
use broadcast_areas_core::models::{AxisOrder, Ring};
use geo::{Geometry, MultiPolygon, Polygon, Rect};
use tracing::debug;

use crate::primitives::{self, JoinStyle};
use crate::validation::polygon_from_rings;

pub const APPROX_METRES_TO_DEGREE: f64 = 111_320.0;
pub const APPROX_SQUARE_METRES_TO_SQUARE_DEGREE: f64 =
    APPROX_METRES_TO_DEGREE * APPROX_METRES_TO_DEGREE;
pub const SQUARE_DEGREES_TO_SQUARE_MILES: f64 =
    APPROX_SQUARE_METRES_TO_SQUARE_DEGREE / 1_000_000.0 * 0.386102;

/// How far cell broadcast signal reaches beyond the edge of an area
pub const APPROX_BLEED_IN_DEGREES: f64 = 1500.0 / APPROX_METRES_TO_DEGREE;

pub const PERIMETER_TO_BUFFER_RATIO: f64 = 360.0;
pub const PERIMETER_TO_SIMPLIFICATION_RATIO: f64 = 1620.0;

/// Polygons smaller than this are digitisation artefacts, not places
pub const MINIMUM_AREA_SIZE_SQUARE_METRES: f64 = 6500.0;

const OUTWARD_RESOLUTION: u32 = 4;
const INWARD_RESOLUTION: u32 = 1;

#[derive(Clone, Default)]
pub struct PolygonSet {
    polygons: Vec<Polygon<f64>>,
    perimeter_length: OnceLock<f64>,
    estimated_area: OnceLock<f64>,
    smooth: OnceLock<Box<PolygonSet>>,
    simplify: OnceLock<Box<PolygonSet>>,
    bleed: OnceLock<Box<PolygonSet>>,
    remove_too_small: OnceLock<Box<PolygonSet>>,
}

impl PolygonSet {
    /// Wrap polygons that are already known to be well formed
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        Self { polygons, ..Default::default() }
    }

    /// Build a set from one closed exterior ring per polygon, in `[long, lat]` order
    pub fn from_coordinates(rings: &[Ring]) -> Result<Self> {
        Self::from_coordinate_pairs(rings, AxisOrder::LongLat)
    }

    /// Build a set from one closed exterior ring per polygon in the given axis order
    pub fn from_coordinate_pairs(rings: &[Ring], order: AxisOrder) -> Result<Self> {
        let polygons = rings
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let ring: Ring = ring.iter().map(|pair| order.apply(*pair)).collect();
                polygon_from_rings(&[ring], &format!("polygon[{}]", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(polygons))
    }

    /// Build a set from polygons given as an exterior ring followed by any holes
    pub fn from_polygon_rings(polygons: &[Vec<Ring>]) -> Result<Self> {
        let polygons = polygons
            .iter()
            .enumerate()
            .map(|(i, rings)| polygon_from_rings(rings, &format!("polygon[{}]", i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(polygons))
    }

    /// Concatenate several sets into one, without merging any shapes
    pub fn combined<'a>(sets: impl IntoIterator<Item = &'a PolygonSet>) -> Self {
        Self::new(sets.into_iter().flat_map(|set| set.polygons.iter().cloned()).collect())
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon<f64>> {
        self.polygons.iter()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    fn as_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.clone())
    }

    /// Sum of all ring lengths, in degrees
    pub fn perimeter_length(&self) -> f64 {
        *self.perimeter_length.get_or_init(|| self.polygons.iter().map(primitives::length).sum())
    }

    /// Larger, more intricate shapes get a larger buffer so that nearby
    /// fragments (islands, for example) merge without over-smoothing small areas.
    pub fn buffer_outward_in_degrees(&self) -> f64 {
        APPROX_BLEED_IN_DEGREES / 3.0 + self.perimeter_length() / PERIMETER_TO_BUFFER_RATIO
    }

    /// Leaves a margin of half the simplification tolerance after buffering
    /// back in, so simplifying can never pull the boundary inside the original shape.
    pub fn buffer_inward_in_degrees(&self) -> f64 {
        self.buffer_outward_in_degrees() - self.simplification_tolerance_in_degrees() / 2.0
    }

    pub fn simplification_tolerance_in_degrees(&self) -> f64 {
        self.perimeter_length() / PERIMETER_TO_SIMPLIFICATION_RATIO
    }

    /// Fill small concave gaps and merge nearby shapes
    pub fn smooth(&self) -> &PolygonSet {
        self.smooth.get_or_init(|| {
            let outward = self.buffer_outward_in_degrees();
            let inward = self.buffer_inward_in_degrees();

            let buffered: Vec<MultiPolygon<f64>> = self
                .polygons
                .iter()
                .map(|polygon| {
                    primitives::buffer(polygon, outward, JoinStyle::Round, OUTWARD_RESOLUTION)
                })
                .collect();
            let unioned = primitives::flatten_polygons(Geometry::MultiPolygon(primitives::union(
                &buffered,
            )));

            let smoothed: Vec<Polygon<f64>> = unioned
                .iter()
                .flat_map(|polygon| {
                    primitives::flatten_polygons(Geometry::MultiPolygon(primitives::buffer(
                        polygon,
                        -inward,
                        JoinStyle::Bevel,
                        INWARD_RESOLUTION,
                    )))
                })
                .collect();

            debug!(
                input = self.polygons.len(),
                output = smoothed.len(),
                outward,
                inward,
                "Smoothed polygon set"
            );
            Box::new(PolygonSet::new(smoothed))
        })
    }

    /// Reduce the number of points in every polygon
    pub fn simplify(&self) -> &PolygonSet {
        self.simplify.get_or_init(|| {
            let tolerance = self.simplification_tolerance_in_degrees();
            let simplified = PolygonSet::new(
                self.polygons
                    .iter()
                    .map(|polygon| primitives::simplify(polygon, tolerance))
                    .collect(),
            );

            debug!(
                before = self.point_count(),
                after = simplified.point_count(),
                tolerance,
                "Simplified polygon set"
            );
            Box::new(simplified)
        })
    }

    /// Expand by the distance cell broadcast signal is expected to reach
    /// beyond the target area. Only used for estimates, never transmitted.
    pub fn bleed(&self) -> &PolygonSet {
        self.bleed.get_or_init(|| Box::new(self.bleed_by(APPROX_BLEED_IN_DEGREES)))
    }

    /// Expand every polygon by `degrees` (round joins) and union the results
    pub fn bleed_by(&self, degrees: f64) -> PolygonSet {
        let buffered: Vec<MultiPolygon<f64>> = self
            .polygons
            .iter()
            .map(|polygon| primitives::buffer(polygon, degrees, JoinStyle::Round, OUTWARD_RESOLUTION))
            .collect();
        PolygonSet::new(primitives::flatten_polygons(Geometry::MultiPolygon(primitives::union(
            &buffered,
        ))))
    }

    /// Drop polygons below `MINIMUM_AREA_SIZE_SQUARE_METRES`
    pub fn remove_too_small(&self) -> &PolygonSet {
        self.remove_too_small.get_or_init(|| {
            let kept: Vec<Polygon<f64>> = self
                .polygons
                .iter()
                .filter(|polygon| {
                    primitives::area(polygon) * APPROX_SQUARE_METRES_TO_SQUARE_DEGREE
                        >= MINIMUM_AREA_SIZE_SQUARE_METRES
                })
                .cloned()
                .collect();

            if kept.len() < self.polygons.len() {
                debug!(removed = self.polygons.len() - kept.len(), "Removed polygons too small");
            }
            Box::new(PolygonSet::new(kept))
        })
    }

    /// Approximate total area in square miles
    pub fn estimated_area(&self) -> f64 {
        *self.estimated_area.get_or_init(|| {
            self.polygons.iter().map(primitives::area).sum::<f64>() * SQUARE_DEGREES_TO_SQUARE_MILES
        })
    }

    /// Number of exterior ring coordinates across every polygon
    pub fn point_count(&self) -> usize {
        self.polygons.iter().map(|polygon| polygon.exterior().0.len()).sum()
    }

    /// Exterior rings as `[long, lat]` pairs; holes are not exported
    pub fn as_coordinate_pairs_long_lat(&self) -> Vec<Ring> {
        self.as_coordinate_pairs(AxisOrder::LongLat)
    }

    /// Exterior rings as `[lat, long]` pairs; holes are not exported
    pub fn as_coordinate_pairs_lat_long(&self) -> Vec<Ring> {
        self.as_coordinate_pairs(AxisOrder::LatLong)
    }

    pub fn as_coordinate_pairs(&self, order: AxisOrder) -> Vec<Ring> {
        self.polygons
            .iter()
            .map(|polygon| {
                polygon.exterior().coords().map(|c| order.apply([c.x, c.y])).collect()
            })
            .collect()
    }

    /// Bounding rectangle of the whole set; `None` when empty
    pub fn bounds(&self) -> Option<Rect<f64>> {
        primitives::bounds(&self.as_multi_polygon())
    }

    /// Whether any polygon in this set touches any polygon in `other`
    pub fn intersects(&self, other: &PolygonSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        primitives::intersects(&self.as_multi_polygon(), &other.as_multi_polygon())
    }

    /// Fraction of `other`'s area that lies inside this set, from 0 to 1
    pub fn coverage_of(&self, other: &PolygonSet) -> f64 {
        let other_area: f64 = other.polygons.iter().map(primitives::area).sum();
        if other_area <= 0.0 || self.is_empty() {
            return 0.0;
        }

        let overlap: f64 =
            primitives::intersection(&self.as_multi_polygon(), &other.as_multi_polygon())
                .iter()
                .map(primitives::area)
                .sum();
        (overlap / other_area).clamp(0.0, 1.0)
    }
}

impl From<Vec<Polygon<f64>>> for PolygonSet {
    fn from(polygons: Vec<Polygon<f64>>) -> Self {
        Self::new(polygons)
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon<f64>;
    type IntoIter = std::slice::Iter<'a, Polygon<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl PartialEq for PolygonSet {
    fn eq(&self, other: &Self) -> bool {
        self.polygons == other.polygons
    }
}

impl fmt::Debug for PolygonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolygonSet")
            .field("polygons", &self.polygons.len())
            .field("points", &self.point_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Ring {
        vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]
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

    #[test]
    fn test_constants() {
        assert_eq!(APPROX_SQUARE_METRES_TO_SQUARE_DEGREE, 12_392_142_400.0);
        assert!((SQUARE_DEGREES_TO_SQUARE_MILES - 12_392.1424 * 0.386102).abs() < 1e-6);
        assert!((APPROX_BLEED_IN_DEGREES - 0.013474668).abs() < 1e-9);
    }

    #[test]
    fn test_perimeter_and_derived_parameters() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1)]).unwrap();

        assert!((polygons.perimeter_length() - 0.4).abs() < 1e-12);
        assert!(
            (polygons.buffer_outward_in_degrees() - (APPROX_BLEED_IN_DEGREES / 3.0 + 0.4 / 360.0))
                .abs()
                < 1e-12
        );
        assert!((polygons.simplification_tolerance_in_degrees() - 0.4 / 1620.0).abs() < 1e-12);
        assert!(polygons.buffer_inward_in_degrees() < polygons.buffer_outward_in_degrees());
    }

    #[test]
    fn test_empty_set() {
        let polygons = PolygonSet::default();

        assert_eq!(polygons.perimeter_length(), 0.0);
        assert_eq!(polygons.estimated_area(), 0.0);
        assert_eq!(polygons.point_count(), 0);
        assert!(polygons.smooth().is_empty());
        assert!(polygons.simplify().is_empty());
        assert!(polygons.bleed().is_empty());
        assert!(polygons.bounds().is_none());
    }

    #[test]
    fn test_smooth_merges_nearby_shapes() {
        let polygons =
            PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1), square(0.101, 0.0, 0.1)])
                .unwrap();

        let smoothed = polygons.smooth();
        assert_eq!(smoothed.len(), 1);
        assert!(smoothed.estimated_area() >= polygons.estimated_area());
    }

    #[test]
    fn test_smooth_keeps_distant_shapes_apart() {
        let polygons =
            PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1), square(5.0, 5.0, 0.1)]).unwrap();

        assert_eq!(polygons.smooth().len(), 2);
    }

    #[test]
    fn test_smooth_never_cuts_into_original() {
        let polygons = PolygonSet::from_coordinates(&[square(-2.2, 51.8, 0.2)]).unwrap();
        let simplified = polygons.smooth().simplify();

        assert!(simplified.coverage_of(&polygons) > 0.999);
    }

    #[test]
    fn test_smooth_then_simplify_reduces_points() {
        let polygons = PolygonSet::from_coordinates(&[circle(-2.0, 52.0, 0.05, 200)]).unwrap();
        let simplified = polygons.smooth().simplify();

        assert!(simplified.point_count() <= polygons.point_count());
        assert_eq!(simplified.len(), 1);
    }

    #[test]
    fn test_derived_sets_are_cached() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1)]).unwrap();

        assert!(std::ptr::eq(polygons.smooth(), polygons.smooth()));
        assert!(std::ptr::eq(polygons.bleed(), polygons.bleed()));
    }

    #[test]
    fn test_bleed_grows_area() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.1)]).unwrap();
        let bleed = polygons.bleed();

        assert_eq!(bleed.len(), 1);
        assert!(bleed.estimated_area() > polygons.estimated_area());
        // Grows by at least the straight edges' strips
        let minimum_increase = 4.0 * 0.1 * APPROX_BLEED_IN_DEGREES * SQUARE_DEGREES_TO_SQUARE_MILES;
        assert!(bleed.estimated_area() - polygons.estimated_area() > minimum_increase);
    }

    #[test]
    fn test_remove_too_small() {
        let polygons = PolygonSet::from_coordinates(&[
            square(0.0, 0.0, 0.0001),
            square(1.0, 1.0, 0.001),
        ])
        .unwrap();

        let kept = polygons.remove_too_small();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.as_coordinate_pairs_long_lat()[0], square(1.0, 1.0, 0.001));
    }

    #[test]
    fn test_remove_too_small_can_remove_everything() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 0.0001)]).unwrap();
        assert!(polygons.remove_too_small().is_empty());
    }

    #[test]
    fn test_estimated_area_of_one_square_degree() {
        let polygons = PolygonSet::from_coordinates(&[square(0.0, 0.0, 1.0)]).unwrap();
        assert!((polygons.estimated_area() - SQUARE_DEGREES_TO_SQUARE_MILES).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_exports() {
        let polygons = PolygonSet::from_coordinates(&[square(-2.0, 51.0, 0.5)]).unwrap();

        let long_lat = polygons.as_coordinate_pairs_long_lat();
        let lat_long = polygons.as_coordinate_pairs_lat_long();

        assert_eq!(long_lat[0][0], [-2.0, 51.0]);
        assert_eq!(lat_long[0][0], [51.0, -2.0]);
        assert_eq!(polygons.point_count(), 5);

        let back = PolygonSet::from_coordinate_pairs(&lat_long, AxisOrder::LatLong).unwrap();
        assert_eq!(back, polygons);
    }

    #[test]
    fn test_holes_are_not_exported() {
        let polygons = PolygonSet::from_polygon_rings(&[vec![
            square(0.0, 0.0, 1.0),
            square(0.25, 0.25, 0.5),
        ]])
        .unwrap();

        assert_eq!(polygons.as_coordinate_pairs_long_lat(), vec![square(0.0, 0.0, 1.0)]);
        assert!((polygons.perimeter_length() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_unclosed_ring_fails() {
        let mut ring = square(0.0, 0.0, 1.0);
        ring.pop();
        assert!(PolygonSet::from_coordinates(&[ring]).is_err());
    }

    #[test]
    fn test_intersects_and_coverage() {
        let big = PolygonSet::from_coordinates(&[square(0.0, 0.0, 1.0)]).unwrap();
        let half_inside = PolygonSet::from_coordinates(&[square(0.5, 0.0, 1.0)]).unwrap();
        let outside = PolygonSet::from_coordinates(&[square(5.0, 5.0, 1.0)]).unwrap();

        assert!(big.intersects(&half_inside));
        assert!(!big.intersects(&outside));
        assert!((big.coverage_of(&half_inside) - 0.5).abs() < 1e-6);
        assert_eq!(big.coverage_of(&outside), 0.0);
    }

    #[test]
    fn test_combined_concatenates() {
        let a = PolygonSet::from_coordinates(&[square(0.0, 0.0, 1.0)]).unwrap();
        let b = PolygonSet::from_coordinates(&[square(0.5, 0.5, 1.0)]).unwrap();

        let combined = PolygonSet::combined([&a, &b]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.point_count(), 10);
    }
}
