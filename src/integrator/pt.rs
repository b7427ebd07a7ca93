use super::utils::*;
use super::{MisHeuristic, PathTracer};
use crate::geometry::Geometry;
use crate::materials::Material;
use crate::math::*;
use crate::profile::Profile;
use crate::world::World;

/// camera paths with next event estimation. emission found by scattering and emission found by
/// light sampling are combined with `mis`.
#[derive(Debug, Clone)]
pub struct PathTracingIntegrator {
    /// vertex cap of a full path, camera and light vertex included.
    pub max_pathlen: usize,
    pub russian_roulette: Option<RussianRoulette>,
    pub light_samples: u16,
    pub mis: MisHeuristic,
}

impl PathTracingIntegrator {
    /// one light sample from `vertex`, already weighted against scattering.
    fn sample_light(
        &self,
        world: &World,
        vertex: &Vertex,
        sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        let Some(material_id) = vertex.material_id else {
            return RGBColor::ZERO;
        };
        let Some((light, pick_pdf)) = world.pick_random_light(sampler.draw_1d()) else {
            return RGBColor::ZERO;
        };
        let Ok(surface) = world.get_geometry(light.geometry_id).sample(sampler) else {
            return RGBColor::ZERO;
        };

        let to_light = surface.point - vertex.point;
        let dist_squared = to_light.norm_squared();
        if !(dist_squared > 0.0) {
            return RGBColor::ZERO;
        }
        let direction = to_light / dist_squared.sqrt();
        let cos_light = -(surface.normal * direction);
        let cos_surface = vertex.normal * direction;
        if cos_light <= 0.0 || cos_surface <= 0.0 {
            return RGBColor::ZERO;
        }

        let material = world.get_material(material_id);
        let f = material.eval(vertex.uv, vertex.normal, vertex.wi, direction);
        if f.is_zero() {
            return RGBColor::ZERO;
        }
        let light_pdf = pick_pdf * surface.area_pdf * dist_squared / cos_light;
        if !light_pdf.is_finite() {
            return RGBColor::ZERO;
        }

        profile.shadow_rays += 1;
        let light_point = surface.point + surface.normal * crate::NORMAL_OFFSET;
        if !world.visible(vertex.spawn_point(direction), light_point) {
            return RGBColor::ZERO;
        }

        let scatter_pdf = material.pdf(vertex.uv, vertex.normal, vertex.wi, direction);
        let weight = self
            .mis
            .weight(light_pdf * self.light_samples as f32, scatter_pdf);
        light.emission * f * (cos_surface * weight / light_pdf)
    }

    /// emission seen at `path[index]`, weighted against light sampling from the vertex before.
    fn emission_at(&self, world: &World, path: &Path, index: usize) -> RGBColor {
        let vertex = &path[index];
        let Some(geometry_id) = vertex.geometry_id else {
            return RGBColor::ZERO;
        };
        if vertex.backface {
            return RGBColor::ZERO;
        }
        let emission = world.emission(geometry_id, vertex.normal, vertex.wi);
        if emission.is_zero() {
            return RGBColor::ZERO;
        }
        if index == 1 || self.light_samples == 0 {
            // seen straight from the camera, light sampling cannot produce this path
            return vertex.throughput * emission;
        }
        let previous = &path[index - 1];
        let dist_squared = (previous.point - vertex.point).norm_squared();
        let cos_light = (vertex.normal * vertex.wi).abs();
        let light_pdf = world.light_area_pdf(geometry_id) * dist_squared / cos_light;
        let weight = if light_pdf.is_finite() {
            self.mis.weight(vertex.pdf_forward, light_pdf * self.light_samples as f32)
        } else {
            0.0
        };
        vertex.throughput * emission * weight
    }
}

impl PathTracer for PathTracingIntegrator {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        let settings = WalkSettings {
            max_vertices: self.max_pathlen,
            roulette: self.russian_roulette,
        };
        let path = trace_eye_path(world, camera_ray, &settings, sampler, profile);

        let mut sum = RGBColor::ZERO;
        for index in 1..path.len() {
            sum += self.emission_at(world, &path, index);

            // the light vertex would be one past this one
            if index + 2 > self.max_pathlen {
                continue;
            }
            let vertex = &path[index];
            let mut light_contribution = RGBColor::ZERO;
            for _ in 0..self.light_samples {
                light_contribution += self.sample_light(world, vertex, sampler, profile);
            }
            if self.light_samples > 0 {
                sum += vertex.throughput * light_contribution / self.light_samples as f32;
            }
        }
        sum.sanitized()
    }
}
