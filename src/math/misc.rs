use crate::math::{Sample2D, Vec3, PI};

/// cosine weighted direction on the +z hemisphere. pdf is `z / PI`.
pub fn random_cosine_direction(r: Sample2D) -> Vec3 {
    let r1: f32 = r.x;
    let r2: f32 = r.y;
    let z: f32 = (1.0 - r2).sqrt();
    let phi: f32 = 2.0 * PI * r1;
    let (mut y, mut x) = phi.sin_cos();
    x *= r2.sqrt();
    y *= r2.sqrt();
    Vec3::new(x, y, z)
}

/// uniform point on a triangle, returned as barycentric weights (b0, b1, b2).
pub fn uniform_barycentric(r: Sample2D) -> (f32, f32, f32) {
    let su0 = r.x.sqrt();
    let b0 = 1.0 - su0;
    let b1 = r.y * su0;
    (b0, b1, 1.0 - b0 - b1)
}

pub fn power_heuristic(a: f32, b: f32) -> f32 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    (a * a) / (a * a + b * b)
}

pub fn balance_heuristic(a: f32, b: f32) -> f32 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    a / (a + b)
}

pub fn reflect(wo: Vec3, normal: Vec3) -> Vec3 {
    2.0 * (wo * normal) * normal - wo
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cosine_direction_is_unit_and_upper() {
        for i in 0..16 {
            for j in 0..16 {
                let s = Sample2D::new(i as f32 / 16.0, j as f32 / 16.0);
                let v = random_cosine_direction(s);
                assert!(v.is_unit(1e-5), "{:?}", v);
                assert!(v.z() >= 0.0);
            }
        }
    }

    #[test]
    fn test_heuristics_sum_to_one() {
        let (a, b) = (0.3, 1.7);
        assert!((power_heuristic(a, b) + power_heuristic(b, a) - 1.0).abs() < 1e-6);
        assert!((balance_heuristic(a, b) + balance_heuristic(b, a) - 1.0).abs() < 1e-6);
        assert_eq!(power_heuristic(0.0, 0.0), 0.0);
    }
}
