use crate::polygons::PolygonSet;
use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

/// Shape bounding box with the caller's ID
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedShape {
    pub id: usize,
    envelope: AABB<[f64; 2]>,
}

impl IndexedShape {
    /// Index a shape by its bounds. Returns `None` for empty shapes, which can never overlap anything.
    pub fn new(id: usize, shape: &PolygonSet) -> Option<Self> {
        shape.bounds().map(|rect| Self { id, envelope: to_envelope(&rect) })
    }
}

impl RTreeObject for IndexedShape {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    let min = rect.min();
    let max = rect.max();
    AABB::from_corners([min.x, min.y], [max.x, max.y])
}

/// Bounding box index over a fixed collection of shapes
pub struct ShapeIndex {
    tree: RTree<IndexedShape>,
}

impl ShapeIndex {
    /// Build the index in one pass from `(id, shape)` pairs
    pub fn from_shapes<'a>(shapes: impl IntoIterator<Item = (usize, &'a PolygonSet)>) -> Self {
        let indexed: Vec<IndexedShape> = shapes
            .into_iter()
            .filter_map(|(id, shape)| IndexedShape::new(id, shape))
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// IDs whose bounding boxes intersect `bounds`
    pub fn candidates(&self, bounds: &Rect<f64>) -> Vec<usize> {
        self.tree
            .locate_in_envelope_intersecting(&to_envelope(bounds))
            .map(|shape| shape.id)
            .collect()
    }

    /// IDs of the shapes that geometrically intersect `query`, in ascending order.
    ///
    /// The index only narrows the search; `shape_for` supplies the geometry
    /// for the exact test.
    pub fn overlapping<'a, F>(&self, query: &PolygonSet, shape_for: F) -> Vec<usize>
    where
        F: Fn(usize) -> &'a PolygonSet,
    {
        let Some(bounds) = query.bounds() else {
            return Vec::new();
        };

        let mut ids: Vec<usize> = self
            .candidates(&bounds)
            .into_iter()
            .filter(|id| shape_for(*id).intersects(query))
            .collect();
        ids.sort_unstable();
        ids
    }
}
