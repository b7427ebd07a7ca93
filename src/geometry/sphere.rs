use super::{Triangle, TriangleMesh};
use crate::error::TransportError;
use crate::math::*;

/// latitude/longitude tessellated sphere with `res` stacks and `res` slices.
/// normals face outward unless `flip_normal` is set.
pub fn uv_sphere(
    name: impl Into<String>,
    center: Point3,
    radius: f32,
    res: u32,
    flip_normal: bool,
) -> Result<TriangleMesh, TransportError> {
    let name = name.into();
    if res < 3 {
        return Err(TransportError::Configuration(format!(
            "{}: sphere resolution must be at least 3, got {}",
            name, res
        )));
    }
    if !(radius > 0.0) {
        return Err(TransportError::DegenerateGeometry(format!(
            "{}: sphere radius {}",
            name, radius
        )));
    }
    let sign = if flip_normal { -1.0 } else { 1.0 };

    let mut normals = vec![Vec3::Z];
    for i in 1..res {
        let theta = PI * i as f32 / res as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for j in 0..res {
            let phi = 2.0 * PI * j as f32 / res as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            normals.push(Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta));
        }
    }
    normals.push(-Vec3::Z);

    let top = 0u32;
    let bottom = normals.len() as u32 - 1;
    let ring = |i: u32, j: u32| 1 + (i - 1) * res + (j % res);

    let mut triangles: Vec<Triangle> = Vec::new();
    for j in 0..res {
        triangles.push([top, ring(1, j), ring(1, j + 1)]);
    }
    for i in 1..res - 1 {
        for j in 0..res {
            let (a, b) = (ring(i, j), ring(i, j + 1));
            let (c, d) = (ring(i + 1, j), ring(i + 1, j + 1));
            triangles.push([a, c, d]);
            triangles.push([a, d, b]);
        }
    }
    for j in 0..res {
        triangles.push([ring(res - 1, j), bottom, ring(res - 1, j + 1)]);
    }

    if flip_normal {
        for tri in triangles.iter_mut() {
            tri.swap(1, 2);
        }
    }

    let vertices = normals.iter().map(|n| center + *n * radius).collect();
    let normals = normals.into_iter().map(|n| n * sign).collect();
    TriangleMesh::from_parts(name, vertices, normals, vec![], triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabb::HasBoundingBox;
    use crate::geometry::Geometry;

    #[test]
    fn test_area_approaches_sphere() {
        let sphere = uv_sphere("ball", Point3::new(1.0, 2.0, 3.0), 2.0, 64, false).unwrap();
        let analytic = 4.0 * PI * 4.0;
        let area = sphere.surface_area();
        assert!(area < analytic);
        assert!((area - analytic).abs() / analytic < 0.02, "{} vs {}", area, analytic);
        assert!((sphere.aabb().center() - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-4);
    }

    #[test]
    fn test_winding_matches_normals() {
        for flip in [false, true] {
            let sphere = uv_sphere("ball", Point3::ORIGIN, 1.0, 8, flip).unwrap();
            for face in 0..sphere.triangles().len() {
                let geometric = sphere.face_normal(face);
                let vertex = sphere.normals()[sphere.triangles()[face][0] as usize];
                assert!(geometric * vertex > 0.0, "face {} flip {}", face, flip);
            }
        }
    }

    #[test]
    fn test_resolution_too_low() {
        assert!(uv_sphere("ball", Point3::ORIGIN, 1.0, 2, false).is_err());
    }
}
