use crate::core::geometry::Vertex;
use log::warn;
use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box of a set of vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis size of the box.
    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        let extent = self.extents();
        extent.x.max(extent.y).max(extent.z)
    }
}

/// Scans all vertex positions and returns their bounding box.
///
/// Returns `None` for an empty slice.
pub fn compute_bounding_box(vertices: &[Vertex]) -> Option<BoundingBox> {
    let first = vertices.first()?.position;
    let mut min_bound = first;
    let mut max_bound = first;

    for vertex in &vertices[1..] {
        min_bound.x = min_bound.x.min(vertex.position.x);
        min_bound.y = min_bound.y.min(vertex.position.y);
        min_bound.z = min_bound.z.min(vertex.position.z);

        max_bound.x = max_bound.x.max(vertex.position.x);
        max_bound.y = max_bound.y.max(vertex.position.y);
        max_bound.z = max_bound.z.max(vertex.position.z);
    }

    Some(BoundingBox {
        min: min_bound,
        max: max_bound,
    })
}

/// Centers the vertices at the origin and scales them uniformly so the largest
/// axis of their bounding box has length 1.
///
/// Returns the bounding box as it was before the transform, or `None` (leaving
/// the slice untouched) when there are no vertices. A box with no extent is
/// only translated.
pub fn normalize_to_unit_box(vertices: &mut [Vertex]) -> Option<BoundingBox> {
    let bounds = compute_bounding_box(vertices)?;
    let center = bounds.center();
    let max_dimension = bounds.max_extent();

    let scale = if max_dimension > 1e-6 {
        max_dimension
    } else {
        warn!(
            "Bounding box has no extent ({:e}), translating without scaling",
            max_dimension
        );
        1.0
    };

    for vertex in vertices.iter_mut() {
        vertex.position = Point3::from((vertex.position - center) / scale);
    }

    Some(bounds)
}
