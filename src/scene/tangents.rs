use crate::scene::mesh::{Mesh, MeshError};
use log::{debug, warn};
use nalgebra::Vector3;

/// Per-vertex tangent space for normal mapping, parallel to `Mesh::vertices`.
///
/// Uploaded as two vec3 attribute streams next to the vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TangentFrames {
    pub tangents: Vec<Vector3<f32>>,
    pub bitangents: Vec<Vector3<f32>>,
}

/// Accumulates per-triangle tangents and bitangents from position and UV
/// deltas onto each triangle's vertices, then normalizes them.
///
/// Triangles whose UVs are collinear contribute nothing. Vertices left without
/// any contribution get `+X` as tangent and `+Y` as bitangent.
pub fn compute_tangent_frames(mesh: &Mesh) -> Result<TangentFrames, MeshError> {
    mesh.validate()?;

    let vertex_count = mesh.vertex_count();
    let mut tangents = vec![Vector3::zeros(); vertex_count];
    let mut bitangents = vec![Vector3::zeros(); vertex_count];
    let mut degenerate = 0;

    for [i0, i1, i2] in mesh.triangles() {
        let v0 = &mesh.vertices[i0 as usize];
        let v1 = &mesh.vertices[i1 as usize];
        let v2 = &mesh.vertices[i2 as usize];

        let dp1 = v1.position - v0.position;
        let dp2 = v2.position - v0.position;
        let duv1 = v1.uv - v0.uv;
        let duv2 = v2.uv - v0.uv;

        let det = duv1.x * duv2.y - duv1.y * duv2.x;
        if det.abs() < 1e-12 {
            degenerate += 1;
            continue;
        }
        let r = 1.0 / det;

        let tangent = (dp1 * duv2.y - dp2 * duv1.y) * r;
        let bitangent = (dp2 * duv1.x - dp1 * duv2.x) * r;

        for i in [i0, i1, i2] {
            tangents[i as usize] += tangent;
            bitangents[i as usize] += bitangent;
        }
    }

    if degenerate > 0 {
        warn!(
            "{} of {} triangles have degenerate UVs and were left out of tangent generation",
            degenerate,
            mesh.triangle_count()
        );
    }

    for tangent in tangents.iter_mut() {
        *tangent = tangent.try_normalize(1e-12).unwrap_or_else(Vector3::x);
    }
    for bitangent in bitangents.iter_mut() {
        *bitangent = bitangent.try_normalize(1e-12).unwrap_or_else(Vector3::y);
    }

    debug!("Computed tangent frames for {} vertices", vertex_count);

    Ok(TangentFrames {
        tangents,
        bitangents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vertex;
    use nalgebra::{Point3, Vector2};

    const EPS: f32 = 1e-5;

    fn quad_with_uvs(uvs: [[f32; 2]; 4]) -> Mesh {
        let positions = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ];
        let vertices = positions
            .iter()
            .zip(uvs)
            .map(|(&p, uv)| Vertex::new(Point3::from(p), Vector2::from(uv), Vector3::z()))
            .collect();
        Mesh::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn planar_quad_tangents_follow_uv_axes() {
        let mesh = quad_with_uvs([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let frames = compute_tangent_frames(&mesh).unwrap();

        assert_eq!(frames.tangents.len(), 4);
        for (t, b) in frames.tangents.iter().zip(&frames.bitangents) {
            assert!((t - Vector3::x()).norm() < EPS, "tangent {t:?}");
            assert!((b - Vector3::y()).norm() < EPS, "bitangent {b:?}");
        }
    }

    #[test]
    fn flipped_v_flips_bitangent() {
        let mesh = quad_with_uvs([[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
        let frames = compute_tangent_frames(&mesh).unwrap();

        for (t, b) in frames.tangents.iter().zip(&frames.bitangents) {
            assert!((t - Vector3::x()).norm() < EPS);
            assert!((b + Vector3::y()).norm() < EPS);
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_axes() {
        let mesh = quad_with_uvs([[0.5, 0.5]; 4]);
        let frames = compute_tangent_frames(&mesh).unwrap();

        assert!(frames.tangents.iter().all(|t| *t == Vector3::x()));
        assert!(frames.bitangents.iter().all(|b| *b == Vector3::y()));
    }

    #[test]
    fn invalid_mesh_is_rejected() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.indices.push(7);
        assert!(compute_tangent_frames(&mesh).is_err());
    }
}
