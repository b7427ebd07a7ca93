use super::{to_local_pair, DirectionSample, Material, GRAZING_COSINE};
use crate::math::*;
use crate::vec2d::UV;

// qualitative Oren-Nayar model, see pbrt 3rd edition section 8.4.
#[derive(Clone, Debug)]
pub struct OrenNayar {
    pub name: String,
    pub albedo: RGBColor,
    /// standard deviation of the facet slope angle, in radians.
    pub roughness: f32,
    a: f32,
    b: f32,
}

impl OrenNayar {
    pub fn new(name: impl Into<String>, albedo: RGBColor, roughness: f32) -> Self {
        let sigma2 = roughness * roughness;
        OrenNayar {
            name: name.into(),
            albedo,
            roughness,
            a: 1.0 - sigma2 / (2.0 * (sigma2 + 0.33)),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        }
    }
}

fn sin_theta(w: Vec3) -> f32 {
    (1.0 - w.z() * w.z()).max(0.0).sqrt()
}

impl Material for OrenNayar {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, _uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> RGBColor {
        let (wo, wi) = to_local_pair(normal, outgoing, incoming);
        let (cos_o, cos_i) = (wo.z(), wi.z());
        if cos_o <= GRAZING_COSINE || cos_i <= GRAZING_COSINE {
            return RGBColor::ZERO;
        }
        let (sin_o, sin_i) = (sin_theta(wo), sin_theta(wi));

        let max_cos = if sin_i > 1e-4 && sin_o > 1e-4 {
            // cos(phi_i - phi_o) from the projected directions
            ((wi.x() * wo.x() + wi.y() * wo.y()) / (sin_i * sin_o)).max(0.0)
        } else {
            0.0
        };

        let (sin_alpha, tan_beta) = if cos_i > cos_o {
            (sin_o, sin_i / cos_i)
        } else {
            (sin_i, sin_o / cos_o)
        };

        self.albedo * ((self.a + self.b * max_cos * sin_alpha * tan_beta) / PI)
    }

    fn sample(
        &self,
        sampler: &mut dyn Sampler,
        _uv: UV,
        normal: Vec3,
        _outgoing: Vec3,
    ) -> Option<DirectionSample> {
        let frame = TangentFrame::from_normal(normal.normalized());
        let wi = random_cosine_direction(sampler.draw_2d());
        // cos(theta) / pi, kept away from zero so the sample stays usable at the horizon
        let pdf = wi.z().max(GRAZING_COSINE) / PI;
        Some(DirectionSample {
            direction: frame.to_world(&wi).normalized(),
            pdf,
        })
    }

    fn pdf(&self, _uv: UV, normal: Vec3, _outgoing: Vec3, incoming: Vec3) -> f32 {
        let cosine = normal.normalized() * incoming.normalized();
        if cosine > 0.0 {
            cosine.max(GRAZING_COSINE) / PI
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::tests::*;

    fn test_material() -> OrenNayar {
        OrenNayar::new("test_oren_nayar", RGBColor::new(0.725, 0.710, 0.680), 0.078)
    }

    #[test]
    fn test_name() {
        assert_eq!(test_material().name(), "test_oren_nayar");
    }

    #[test]
    fn test_sample_dir() {
        let samples = validate_directions(&test_material());
        assert_eq!(samples.len(), SAMPLE_COUNT);
    }

    #[test]
    fn test_brdf() {
        validate_brdf(&test_material());
    }

    #[test]
    fn test_special_case() {
        validate_special_case(&test_material());
    }

    #[test]
    fn test_pdf_matches_sample() {
        validate_pdf_consistency(&test_material());
    }

    #[test]
    fn test_zero_roughness_is_lambertian() {
        let m = OrenNayar::new("smooth", RGBColor::from(0.5), 0.0);
        let o = Vec3::new(0.2, 0.4, 0.9).normalized();
        let i = Vec3::new(-0.7, 0.1, 0.3).normalized();
        let w = m.eval(UV::default(), Vec3::Z, o, i);
        assert!((w.r - 0.5 / PI).abs() < 1e-6);
    }
}
