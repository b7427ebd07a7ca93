use crate::math::*;

pub trait HasBoundingBox {
    fn aabb(&self) -> AABB;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Point3,
    pub max: Point3,
}

impl AABB {
    pub fn new(min: Point3, max: Point3) -> Self {
        AABB {
            min: min.min_by_component(max),
            max: min.max_by_component(max),
        }
    }
    // empty AABB contains nothing.
    pub const fn empty() -> Self {
        AABB {
            min: Point3::INFINITY,
            max: Point3::NEG_INFINITY,
        }
    }

    pub fn contains(&self, point: Point3) -> bool {
        (0..3).all(|i| point.0[i] >= self.min.0[i] && point.0[i] <= self.max.0[i])
    }

    /// slab test. returns the parametric interval where the ray overlaps the box, clipped to [t0, t1].
    pub fn hit(&self, r: &Ray, t0: f32, t1: f32) -> Option<(f32, f32)> {
        let (mut tmin, mut tmax) = (t0, t1);
        for axis in 0..3 {
            let inv_d = 1.0 / r.direction.0[axis];
            let mut near = (self.min.0[axis] - r.origin.0[axis]) * inv_d;
            let mut far = (self.max.0[axis] - r.origin.0[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }
            // NaN from 0 * inf leaves the interval untouched on that axis
            if near > tmin {
                tmin = near;
            }
            if far < tmax {
                tmax = far;
            }
            if tmax < tmin {
                return None;
            }
        }
        Some((tmin, tmax))
    }

    pub fn expand_mut(&mut self, other: &AABB) {
        self.min = self.min.min_by_component(other.min);
        self.max = self.max.max_by_component(other.max);
    }

    pub fn grow_mut(&mut self, other: &Point3) {
        self.min = self.min.min_by_component(*other);
        self.max = self.max.max_by_component(*other);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min.0[i] > self.max.0[i])
    }

    pub fn center(&self) -> Point3 {
        self.min + (self.size() / 2.0)
    }

    pub fn surface_area(&self) -> f32 {
        let s = self.size();
        2.0 * (s.x() * s.y() + s.x() * s.z() + s.y() * s.z())
    }
}

impl Default for AABB {
    fn default() -> AABB {
        AABB::empty()
    }
}
