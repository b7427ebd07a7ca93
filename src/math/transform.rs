use crate::math::{Point3, Vec3};

use nalgebra::{Matrix4, Vector3, Vector4};
use std::ops::Mul;

/// affine transform carrying both the forward matrix and its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3 {
    pub forward: Matrix4<f32>,
    pub reverse: Matrix4<f32>,
}

impl Transform3 {
    pub fn identity() -> Self {
        Transform3 {
            forward: Matrix4::identity(),
            reverse: Matrix4::identity(),
        }
    }

    /// returns None when `forward` is singular.
    pub fn new_from_matrix(forward: Matrix4<f32>) -> Option<Self> {
        let reverse = forward.try_inverse()?;
        Some(Transform3 { forward, reverse })
    }

    pub fn translation(shift: Vec3) -> Self {
        Transform3 {
            forward: Matrix4::new_translation(&Vector3::new(shift.x(), shift.y(), shift.z())),
            reverse: Matrix4::new_translation(&Vector3::new(-shift.x(), -shift.y(), -shift.z())),
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        debug_assert!(scale.x() != 0.0 && scale.y() != 0.0 && scale.z() != 0.0);
        Transform3 {
            forward: Matrix4::new_nonuniform_scaling(&Vector3::new(
                scale.x(),
                scale.y(),
                scale.z(),
            )),
            reverse: Matrix4::new_nonuniform_scaling(&Vector3::new(
                1.0 / scale.x(),
                1.0 / scale.y(),
                1.0 / scale.z(),
            )),
        }
    }

    pub fn axis_angle(axis: Vec3, radians: f32) -> Self {
        let axis = axis.normalized();
        let axis = Vector3::new(axis.x(), axis.y(), axis.z());
        Transform3 {
            forward: Matrix4::new_rotation(axis * radians),
            reverse: Matrix4::new_rotation(axis * -radians),
        }
    }

    /// scale first, then rotate, then translate.
    pub fn from_stack(
        scale: Option<Transform3>,
        rotate: Option<Transform3>,
        translate: Option<Transform3>,
    ) -> Transform3 {
        let identity = Transform3::identity();
        translate.unwrap_or(identity) * rotate.unwrap_or(identity) * scale.unwrap_or(identity)
    }

    pub fn inverse(self) -> Transform3 {
        Transform3 {
            forward: self.reverse,
            reverse: self.forward,
        }
    }

    pub fn to_world_point(&self, p: Point3) -> Point3 {
        let v = self.forward * Vector4::new(p.x(), p.y(), p.z(), 1.0);
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    }

    /// normals transform by the inverse transpose.
    pub fn to_world_normal(&self, n: Vec3) -> Vec3 {
        let v = self.reverse.transpose() * Vector4::new(n.x(), n.y(), n.z(), 0.0);
        Vec3::new(v.x, v.y, v.z).normalized()
    }
}

impl Mul for Transform3 {
    type Output = Transform3;
    fn mul(self, rhs: Transform3) -> Transform3 {
        Transform3 {
            forward: self.forward * rhs.forward,
            reverse: rhs.reverse * self.reverse,
        }
    }
}
