use crate::math::Vec3;

// also known as an orthonormal basis.
#[derive(Copy, Clone, Debug)]
pub struct TangentFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl TangentFrame {
    // Duff et al., "Building an Orthonormal Basis, Revisited"
    pub fn from_normal(normal: Vec3) -> Self {
        let (x, y, z) = (normal.x(), normal.y(), normal.z());
        let sign = 1.0f32.copysign(z);
        let a = -1.0 / (sign + z);
        let b = x * y * a;
        TangentFrame {
            tangent: Vec3::new(1.0 + sign * x * x * a, sign * b, -sign * x),
            bitangent: Vec3::new(b, sign + y * y * a, -y),
            normal,
        }
    }

    #[inline(always)]
    pub fn to_world(&self, v: &Vec3) -> Vec3 {
        self.tangent * v.x() + self.bitangent * v.y() + self.normal * v.z()
    }

    #[inline(always)]
    pub fn to_local(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.tangent * (*v),
            self.bitangent * (*v),
            self.normal * (*v),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_through_frame() {
        let normal = Vec3::new(0.3, -0.5, 0.8).normalized();
        let frame = TangentFrame::from_normal(normal);
        assert!((frame.tangent * frame.normal).abs() < 1e-5);
        assert!((frame.bitangent * frame.normal).abs() < 1e-5);

        let local = frame.to_local(&normal);
        assert!((local.z() - 1.0).abs() < 1e-5);

        let v = Vec3::new(0.1, 0.7, -0.2);
        let back = frame.to_world(&frame.to_local(&v));
        assert!((back - v).norm() < 1e-5);
    }

    #[test]
    fn test_negative_z_normal() {
        let frame = TangentFrame::from_normal(-Vec3::Z);
        assert!((frame.to_local(&-Vec3::Z).z() - 1.0).abs() < 1e-6);
    }
}
