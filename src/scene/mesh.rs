use crate::core::geometry::Vertex;
use nalgebra::{Point3, Vector2, Vector3};
use thiserror::Error;

/// A collection of vertices and indices representing a 3D object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// List of unique vertices.
    pub vertices: Vec<Vertex>,
    /// List of indices defining triangles (3 indices per triangle).
    pub indices: Vec<u32>,
}

/// Violations of the indexed-mesh invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("index count {len} is not a multiple of 3")]
    RaggedIndices { len: usize },
    #[error("index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfBounds {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over the index triples, one per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Vertex data flattened into a single float buffer, ready for upload.
    pub fn interleaved(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(Vertex::to_array).collect()
    }

    /// Checks that the index buffer is made of whole triangles referencing existing vertices.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices {
                len: self.indices.len(),
            });
        }
        let vertex_count = self.vertices.len();
        match self
            .indices
            .iter()
            .position(|&index| index as usize >= vertex_count)
        {
            Some(position) => Err(MeshError::IndexOutOfBounds {
                position,
                index: self.indices[position],
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Creates a simple triangle mesh for testing purposes.
    ///
    /// Vertices are arranged in Counter-Clockwise (CCW) order.
    pub fn create_test_triangle() -> Self {
        let vertices = vec![
            Vertex::new(
                Point3::new(0.0, 0.5, 0.0), // Top
                Vector2::new(0.5, 1.0),
                Vector3::new(0.0, 0.0, 1.0), // Normal facing Z+
            ),
            Vertex::new(
                Point3::new(-0.5, -0.5, 0.0), // Bottom Left
                Vector2::new(0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ),
            Vertex::new(
                Point3::new(0.5, -0.5, 0.0), // Bottom Right
                Vector2::new(1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ),
        ];

        Self::new(vertices, vec![0, 1, 2])
    }
}
