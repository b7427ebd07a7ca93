use crate::error::TransportError;
use crate::hittable::*;
use crate::math::*;

pub use crate::geometry::*;
pub use crate::materials::*;

mod scenes;
pub use scenes::{build_scene, cornell_box};

use tracing::{info, warn};

/// marks a geometry as an emitter. emission is one sided and leaves along the geometric normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub geometry_id: usize,
    pub emission: RGBColor,
}

impl Light {
    pub fn new(geometry_id: usize, emission: RGBColor) -> Self {
        Light {
            geometry_id,
            emission,
        }
    }
}

#[derive(Clone, Debug)]
pub struct World {
    geometries: Vec<TriangleMesh>,
    pub materials: MaterialTable,
    lights: Vec<Light>,
    // geometry id -> index into `lights`
    light_lookup: Vec<Option<usize>>,
    bounding_box: AABB,
}

impl World {
    pub fn new(
        geometries: Vec<TriangleMesh>,
        materials: MaterialTable,
        lights: Vec<Light>,
    ) -> Result<Self, TransportError> {
        let mut bounding_box = AABB::empty();
        for geometry in geometries.iter() {
            if let Some(id) = geometry.material_id() {
                if usize::from(id) >= materials.len() {
                    return Err(TransportError::UnknownMaterial(id.into()));
                }
            }
            bounding_box.expand_mut(&geometry.aabb());
        }

        let mut light_lookup = vec![None; geometries.len()];
        for (index, light) in lights.iter().enumerate() {
            let geometry = geometries
                .get(light.geometry_id)
                .ok_or(TransportError::UnknownGeometry(light.geometry_id))?;
            if !(geometry.surface_area() > 0.0) {
                return Err(TransportError::DegenerateGeometry(format!(
                    "light geometry {} has no area",
                    geometry.name()
                )));
            }
            if light_lookup[light.geometry_id].replace(index).is_some() {
                return Err(TransportError::Configuration(format!(
                    "geometry {} was registered as a light twice",
                    geometry.name()
                )));
            }
            info!(
                "adding light with emission {:?} on geometry {} ({})",
                light.emission,
                light.geometry_id,
                geometry.name()
            );
        }
        if lights.is_empty() {
            warn!("the world has no lights, every estimate will be black");
        }

        Ok(World {
            geometries,
            materials,
            lights,
            light_lookup,
            bounding_box,
        })
    }

    pub fn geometries(&self) -> &[TriangleMesh] {
        &self.geometries
    }

    pub fn get_geometry(&self, geometry_id: usize) -> &TriangleMesh {
        &self.geometries[geometry_id]
    }

    pub fn get_material(&self, mat_id: MaterialId) -> &MaterialEnum {
        let id: usize = mat_id.into();
        &self.materials[id]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_for_geometry(&self, geometry_id: usize) -> Option<&Light> {
        self.light_lookup
            .get(geometry_id)
            .copied()
            .flatten()
            .map(|index| &self.lights[index])
    }

    /// uniform light selection. the returned pdf is the probability of picking that light.
    pub fn pick_random_light(&self, s: Sample1D) -> Option<(&Light, f32)> {
        let length = self.lights.len();
        if length == 0 {
            None
        } else {
            let idx = ((length as f32 * s.x) as usize).min(length - 1);
            Some((&self.lights[idx], self.light_pick_pdf()))
        }
    }

    pub fn light_pick_pdf(&self) -> f32 {
        if self.lights.is_empty() {
            0.0
        } else {
            1.0 / self.lights.len() as f32
        }
    }

    /// area density of choosing `geometry_id` and then a point on it, or 0 when it is not a light.
    pub fn light_area_pdf(&self, geometry_id: usize) -> f32 {
        match self.light_for_geometry(geometry_id) {
            Some(light) => {
                self.light_pick_pdf() / self.geometries[light.geometry_id].surface_area()
            }
            None => 0.0,
        }
    }

    /// radiance leaving `geometry_id` at a point with geometric normal `normal`, toward `direction`.
    pub fn emission(&self, geometry_id: usize, normal: Vec3, direction: Vec3) -> RGBColor {
        match self.light_for_geometry(geometry_id) {
            Some(light) if normal * direction > 0.0 => light.emission,
            _ => RGBColor::ZERO,
        }
    }

    /// true when nothing blocks the open segment between `from` and `to`.
    pub fn visible(&self, from: Point3, to: Point3) -> bool {
        let diff = to - from;
        let distance = diff.norm();
        if !(distance > 0.0) {
            return false;
        }
        let ray = Ray::new(from, diff / distance);
        self.hit(ray, crate::INTERSECTION_TIME_OFFSET, distance * 0.999)
            .is_none()
    }
}

impl HasBoundingBox for World {
    fn aabb(&self) -> AABB {
        self.bounding_box
    }
}

impl Hittable for World {
    fn hit(&self, r: Ray, t0: f32, t1: f32) -> Option<HitRecord> {
        let mut closest = t1;
        let mut result = None;
        for (geometry_id, geometry) in self.geometries.iter().enumerate() {
            if let Some(mut hit) = geometry.hit(r, t0, closest) {
                closest = hit.time;
                hit.geometry_id = geometry_id;
                result = Some(hit);
            }
        }
        result
    }
}
