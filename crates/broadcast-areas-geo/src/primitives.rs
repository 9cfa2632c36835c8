//! Geometry primitives
//!
//! Every call into the `geo` crate made by the pipeline goes through this module.

use geo::algorithm::buffer::{Buffer, BufferStyle, LineJoin};
use geo::{
    Area, BooleanOps, BoundingRect, Distance, Euclidean, Geometry, Intersects, MultiPolygon,
    Polygon, Rect, Simplify,
};
use std::f64::consts::FRAC_PI_2;

/// How the corners of a buffered shape are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStyle {
    /// Arc around the corner, approximated with `resolution` segments per quarter circle
    Round,
    /// Straight line across the corner
    Bevel,
}

/// Grow (positive distance) or shrink (negative distance) a polygon
pub fn buffer(
    polygon: &Polygon<f64>,
    distance: f64,
    join_style: JoinStyle,
    resolution: u32,
) -> MultiPolygon<f64> {
    let line_join = match join_style {
        JoinStyle::Round => LineJoin::Round(FRAC_PI_2 / f64::from(resolution.max(1))),
        JoinStyle::Bevel => LineJoin::Bevel,
    };
    polygon.buffer_with_style(BufferStyle::new(distance).line_join(line_join))
}

/// Union a collection of shapes into one multi-polygon
pub fn union(shapes: &[MultiPolygon<f64>]) -> MultiPolygon<f64> {
    shapes.iter().fold(MultiPolygon::new(Vec::new()), |acc, shape| acc.union(shape))
}

/// Intersection of two shapes
pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

/// Whether two shapes share any point
pub fn intersects(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    a.intersects(b)
}

/// Ramer–Douglas–Peucker simplification
pub fn simplify(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    polygon.simplify(tolerance)
}

/// Unsigned area in square coordinate units
pub fn area(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

/// Total length of the exterior and interior rings, in coordinate units
pub fn length(polygon: &Polygon<f64>) -> f64 {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .flat_map(|ring| ring.lines())
        .map(|line| Euclidean.distance(line.start_point(), line.end_point()))
        .sum()
}

/// Bounding rectangle of a shape; `None` when it has no coordinates
pub fn bounds(shape: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    shape.bounding_rect()
}

/// Flatten any geometry into the simple polygons it is made of.
///
/// Empty collections give an empty list, multi-polygons give their members and
/// nested collections are flattened recursively. Points and lines have no area
/// and contribute nothing.
pub fn flatten_polygons(geometry: Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(multi) => multi.0,
        Geometry::GeometryCollection(collection) => {
            collection.0.into_iter().flat_map(flatten_polygons).collect()
        }
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        _ => Vec::new(),
    }
}
