use super::PathTracer;
use crate::hittable::{HasBoundingBox, Hittable};
use crate::math::*;
use crate::profile::Profile;
use crate::world::World;
use crate::INTERSECTION_TIME_OFFSET;

/// shading normal at the first hit, mapped from [-1, 1] to [0, 1] per channel.
#[derive(Debug, Copy, Clone, Default)]
pub struct NormalIntegrator;

/// first hit position relative to the scene bounds, [0, 1] per axis.
#[derive(Debug, Copy, Clone, Default)]
pub struct PositionIntegrator;

impl PathTracer for NormalIntegrator {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        _sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        profile.camera_rays += 1;
        match world.hit(camera_ray, INTERSECTION_TIME_OFFSET, camera_ray.tmax) {
            Some(hit) => {
                let n = hit.normal;
                RGBColor::new(n.x(), n.y(), n.z()) * 0.5 + RGBColor::from(0.5)
            }
            None => {
                profile.escaped += 1;
                RGBColor::ZERO
            }
        }
    }
}

impl PathTracer for PositionIntegrator {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        _sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        profile.camera_rays += 1;
        let Some(hit) = world.hit(camera_ray, INTERSECTION_TIME_OFFSET, camera_ray.tmax) else {
            profile.escaped += 1;
            return RGBColor::ZERO;
        };
        let bounds = world.aabb();
        let size = bounds.size();
        let offset = hit.point - bounds.min;
        let channel = |o: f32, s: f32| if s > 0.0 { (o / s).clamp(0.0, 1.0) } else { 0.5 };
        RGBColor::new(
            channel(offset.x(), size.x()),
            channel(offset.y(), size.y()),
            channel(offset.z(), size.z()),
        )
    }
}
