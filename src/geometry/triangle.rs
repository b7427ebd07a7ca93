use super::TriangleMesh;
use crate::error::TransportError;
use crate::math::*;
use crate::vec2d::UV;

/// single triangle mesh with flat normals, wound counter clockwise around `(b - a) x (c - a)`.
pub fn triangle_fragment(
    name: impl Into<String>,
    a: Point3,
    b: Point3,
    c: Point3,
) -> Result<TriangleMesh, TransportError> {
    let normal = (b - a).cross(c - a).normalized();
    TriangleMesh::from_parts(
        name,
        vec![a, b, c],
        vec![normal; 3],
        vec![UV(0.0, 0.0), UV(1.0, 0.0), UV(0.0, 1.0)],
        vec![[0, 1, 2]],
    )
}
