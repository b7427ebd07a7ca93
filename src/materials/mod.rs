use crate::math::*;
use crate::vec2d::UV;

mod cook_torrance;
mod lambertian;
mod oren_nayar;

pub use cook_torrance::CookTorrance;
pub use lambertian::Lambertian;
pub use oren_nayar::OrenNayar;

// cosines below this are treated as grazing and scatter nothing.
pub(crate) const GRAZING_COSINE: f32 = 1e-6;

/// index into the material table.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct MaterialId(pub u16);

impl From<u16> for MaterialId {
    fn from(value: u16) -> Self {
        MaterialId(value)
    }
}

impl From<MaterialId> for usize {
    fn from(value: MaterialId) -> Self {
        value.0 as usize
    }
}

/// a sampled incident direction together with its density per unit solid angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionSample {
    pub direction: Vec3,
    pub pdf: f32,
}

impl DirectionSample {
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0 && self.pdf.is_finite() && self.direction.is_finite()
    }
}

/// reflectance model. all directions are world space unit vectors pointing away from the surface.
pub trait Material {
    fn name(&self) -> &str;

    /// scattering weight for light arriving along `incoming` and leaving along `outgoing`.
    /// symmetric in the two directions, finite and non-negative.
    fn eval(&self, uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> RGBColor;

    /// importance samples an incoming direction on the `normal` side of the surface.
    /// `None` when no valid direction could be produced; the caller must drop the sample.
    fn sample(
        &self,
        sampler: &mut dyn Sampler,
        uv: UV,
        normal: Vec3,
        outgoing: Vec3,
    ) -> Option<DirectionSample>;

    /// the solid angle density `sample` assigns to `incoming`.
    fn pdf(&self, uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> f32;
}

/// expresses a pair of world space directions in the tangent frame of `normal`.
pub(crate) fn to_local_pair(normal: Vec3, outgoing: Vec3, incoming: Vec3) -> (Vec3, Vec3) {
    let frame = TangentFrame::from_normal(normal.normalized());
    (
        frame.to_local(&outgoing.normalized()),
        frame.to_local(&incoming.normalized()),
    )
}

#[derive(Clone, Debug)]
pub enum MaterialEnum {
    CookTorrance(CookTorrance),
    OrenNayar(OrenNayar),
    Lambertian(Lambertian),
}

impl From<CookTorrance> for MaterialEnum {
    fn from(value: CookTorrance) -> Self {
        MaterialEnum::CookTorrance(value)
    }
}

impl From<OrenNayar> for MaterialEnum {
    fn from(value: OrenNayar) -> Self {
        MaterialEnum::OrenNayar(value)
    }
}

impl From<Lambertian> for MaterialEnum {
    fn from(value: Lambertian) -> Self {
        MaterialEnum::Lambertian(value)
    }
}

impl Material for MaterialEnum {
    fn name(&self) -> &str {
        match self {
            MaterialEnum::CookTorrance(inner) => inner.name(),
            MaterialEnum::OrenNayar(inner) => inner.name(),
            MaterialEnum::Lambertian(inner) => inner.name(),
        }
    }
    fn eval(&self, uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> RGBColor {
        debug_assert!(outgoing.is_finite() && incoming.is_finite());
        match self {
            MaterialEnum::CookTorrance(inner) => inner.eval(uv, normal, outgoing, incoming),
            MaterialEnum::OrenNayar(inner) => inner.eval(uv, normal, outgoing, incoming),
            MaterialEnum::Lambertian(inner) => inner.eval(uv, normal, outgoing, incoming),
        }
    }
    fn sample(
        &self,
        sampler: &mut dyn Sampler,
        uv: UV,
        normal: Vec3,
        outgoing: Vec3,
    ) -> Option<DirectionSample> {
        match self {
            MaterialEnum::CookTorrance(inner) => inner.sample(sampler, uv, normal, outgoing),
            MaterialEnum::OrenNayar(inner) => inner.sample(sampler, uv, normal, outgoing),
            MaterialEnum::Lambertian(inner) => inner.sample(sampler, uv, normal, outgoing),
        }
    }
    fn pdf(&self, uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> f32 {
        debug_assert!(outgoing.is_finite() && incoming.is_finite());
        match self {
            MaterialEnum::CookTorrance(inner) => inner.pdf(uv, normal, outgoing, incoming),
            MaterialEnum::OrenNayar(inner) => inner.pdf(uv, normal, outgoing, incoming),
            MaterialEnum::Lambertian(inner) => inner.pdf(uv, normal, outgoing, incoming),
        }
    }
}

pub type MaterialTable = Vec<MaterialEnum>;
