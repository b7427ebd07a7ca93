use super::TriangleMesh;
use crate::error::TransportError;
use crate::math::*;
use crate::vec2d::UV;

/// parallelogram spanned by `edge_u` and `edge_v` from `corner`, facing `edge_u x edge_v`.
pub fn quad(
    name: impl Into<String>,
    corner: Point3,
    edge_u: Vec3,
    edge_v: Vec3,
) -> Result<TriangleMesh, TransportError> {
    let normal = edge_u.cross(edge_v).normalized();
    TriangleMesh::from_parts(
        name,
        vec![
            corner,
            corner + edge_u,
            corner + edge_u + edge_v,
            corner + edge_v,
        ],
        vec![normal; 4],
        vec![UV(0.0, 0.0), UV(1.0, 0.0), UV(1.0, 1.0), UV(0.0, 1.0)],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}
