mod mesh;
mod rect;
mod sphere;
mod triangle;

pub use mesh::{Triangle, TriangleMesh};
pub use rect::quad;
pub use sphere::uv_sphere;
pub use triangle::triangle_fragment;

use crate::aabb::HasBoundingBox;
use crate::error::TransportError;
use crate::materials::MaterialId;
use crate::math::*;

/// a point drawn on a surface. `area_pdf` is a density per unit area, not per unit solid angle.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceSample {
    pub point: Point3,
    pub normal: Vec3,
    pub area_pdf: f32,
}

pub trait Geometry: HasBoundingBox {
    fn name(&self) -> &str;
    fn material_id(&self) -> Option<MaterialId>;
    /// replaces any previously attached material.
    fn attach_material(&mut self, id: MaterialId);
    /// uniform area sampling. fails on a surface with no area to sample.
    fn sample(&self, sampler: &mut dyn Sampler) -> Result<SurfaceSample, TransportError>;
    fn surface_area(&self) -> f32;
}
