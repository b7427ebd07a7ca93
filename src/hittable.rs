use crate::materials::MaterialId;
use crate::math::*;
use crate::vec2d::UV;
use crate::INTERSECTION_TIME_OFFSET;

pub use crate::aabb::{HasBoundingBox, AABB};

#[derive(Debug, Copy, Clone)]
pub struct HitRecord {
    pub time: f32,
    pub point: Point3,
    pub uv: UV,
    pub normal: Vec3,
    pub material: Option<MaterialId>,
    pub geometry_id: usize,
}

impl HitRecord {
    pub fn new(
        time: f32,
        point: Point3,
        uv: UV,
        normal: Vec3,
        material: Option<MaterialId>,
        geometry_id: usize,
    ) -> Self {
        HitRecord {
            time,
            point,
            uv,
            normal: normal.normalized(),
            material,
            geometry_id,
        }
    }
}

/// the intersection collaborator: nearest hit along a ray, or none.
pub trait Hittable {
    fn hit(&self, r: Ray, t0: f32, t1: f32) -> Option<HitRecord>;

    fn intersect(&self, origin: Point3, direction: Vec3) -> Option<HitRecord> {
        self.hit(Ray::new(origin, direction), INTERSECTION_TIME_OFFSET, INFINITY)
    }
}
