use nalgebra::{Point3, Vector2, Vector3};
use std::mem::{offset_of, size_of};

/// Represents a single vertex of an indexed mesh.
///
/// The struct is `#[repr(C)]` so a slice of vertices can be handed to a graphics
/// API as-is: position (3 x f32), uv (2 x f32), normal (3 x f32).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub uv: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
}

impl Vertex {
    /// Number of floats in one vertex record.
    pub const FLOATS: usize = 8;
    /// Byte distance between consecutive vertices.
    pub const STRIDE: usize = size_of::<Vertex>();
    pub const POSITION_OFFSET: usize = offset_of!(Vertex, position);
    pub const UV_OFFSET: usize = offset_of!(Vertex, uv);
    pub const NORMAL_OFFSET: usize = offset_of!(Vertex, normal);

    pub fn new(position: Point3<f32>, uv: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    /// Flattens the vertex in attribute order.
    pub fn to_array(&self) -> [f32; Self::FLOATS] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.uv.x,
            self.uv.y,
            self.normal.x,
            self.normal.y,
            self.normal.z,
        ]
    }
}
