use super::{to_local_pair, DirectionSample, Material, GRAZING_COSINE};
use crate::math::*;
use crate::vec2d::UV;

/// Beckmann distribution of microfacet normals, with `alpha` the rms slope.
fn beckmann_d(alpha: f32, cos_h: f32) -> f32 {
    if cos_h <= 0.0 {
        return 0.0;
    }
    let cos2 = cos_h * cos_h;
    let tan2 = (1.0 - cos2).max(0.0) / cos2;
    let a2 = alpha * alpha;
    (-tan2 / a2).exp() / (PI * a2 * cos2 * cos2)
}

// Cook-Torrance v-groove shadowing and masking. symmetric in wo and wi since wo.h == wi.h
fn v_groove_g(cos_h: f32, cos_o: f32, cos_i: f32, o_dot_h: f32) -> f32 {
    let two_cos_h = 2.0 * cos_h / o_dot_h;
    1.0f32.min(two_cos_h * cos_o).min(two_cos_h * cos_i)
}

fn schlick_fresnel(f0: f32, cos_theta: f32) -> f32 {
    f0 + (1.0 - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

#[derive(Clone, Debug)]
pub struct CookTorrance {
    pub name: String,
    pub color: RGBColor,
    pub roughness: f32,
    pub ior: f32,
    f0: f32,
}

impl CookTorrance {
    pub fn new(name: impl Into<String>, color: RGBColor, roughness: f32, ior: f32) -> Self {
        let r = (ior - 1.0) / (ior + 1.0);
        CookTorrance {
            name: name.into(),
            color,
            roughness: roughness.max(1e-3),
            ior,
            f0: r * r,
        }
    }

    fn local_pdf(&self, wo: Vec3, wi: Vec3) -> f32 {
        if wo.z() <= GRAZING_COSINE || wi.z() <= GRAZING_COSINE {
            return 0.0;
        }
        let h = wo + wi;
        if h.norm_squared() == 0.0 {
            return 0.0;
        }
        let h = h.normalized();
        let o_dot_h = wo * h;
        if o_dot_h <= GRAZING_COSINE {
            return 0.0;
        }
        beckmann_d(self.roughness, h.z()) * h.z() / (4.0 * o_dot_h)
    }
}

impl Material for CookTorrance {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, _uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> RGBColor {
        let (wo, wi) = to_local_pair(normal, outgoing, incoming);
        let (cos_o, cos_i) = (wo.z(), wi.z());
        if cos_o <= GRAZING_COSINE || cos_i <= GRAZING_COSINE {
            return RGBColor::ZERO;
        }
        let h = wo + wi;
        if h.norm_squared() == 0.0 {
            return RGBColor::ZERO;
        }
        let h = h.normalized();
        let o_dot_h = wo * h;
        if o_dot_h <= GRAZING_COSINE {
            return RGBColor::ZERO;
        }
        let d = beckmann_d(self.roughness, h.z());
        let g = v_groove_g(h.z(), cos_o, cos_i, o_dot_h);
        let f = schlick_fresnel(self.f0, o_dot_h);
        let weight = d * g * f / (4.0 * cos_i * cos_o);
        if !weight.is_finite() {
            return RGBColor::ZERO;
        }
        self.color * weight
    }

    fn sample(
        &self,
        sampler: &mut dyn Sampler,
        _uv: UV,
        normal: Vec3,
        outgoing: Vec3,
    ) -> Option<DirectionSample> {
        let frame = TangentFrame::from_normal(normal.normalized());
        let wo = frame.to_local(&outgoing.normalized());
        if wo.z() <= GRAZING_COSINE {
            return None;
        }

        let Sample2D { x, y } = sampler.draw_2d();
        let a2 = self.roughness * self.roughness;
        let tan2_theta = -a2 * (1.0 - x).ln();
        let cos_theta = 1.0 / (1.0 + tan2_theta).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let (sin_phi, cos_phi) = (2.0 * PI * y).sin_cos();
        let h = Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);

        let o_dot_h = wo * h;
        if o_dot_h <= 0.0 {
            return None;
        }
        let wi = reflect(wo, h);
        if wi.z() <= 0.0 {
            return None;
        }
        let pdf = self.local_pdf(wo, wi);
        let sample = DirectionSample {
            direction: frame.to_world(&wi).normalized(),
            pdf,
        };
        sample.is_valid().then_some(sample)
    }

    fn pdf(&self, _uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> f32 {
        let (wo, wi) = to_local_pair(normal, outgoing, incoming);
        self.local_pdf(wo, wi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::tests::*;

    fn test_material(roughness: f32) -> CookTorrance {
        CookTorrance::new("test_cook_torr", RGBColor::from(0.787), roughness, 2.93)
    }

    #[test]
    fn test_name() {
        assert_eq!(test_material(0.25).name(), "test_cook_torr");
    }

    #[test]
    fn test_sample_dir() {
        let samples = validate_directions(&test_material(0.2));
        let p_valid = samples.len() as f32 / SAMPLE_COUNT as f32;
        assert!(p_valid >= 0.8, "{}", p_valid);
    }

    #[test]
    fn test_brdf() {
        validate_brdf(&test_material(0.25));
    }

    #[test]
    fn test_special_case() {
        validate_special_case(&test_material(0.25));
    }

    #[test]
    fn test_pdf_matches_sample() {
        validate_pdf_consistency(&test_material(0.25));
    }

    #[test]
    fn test_grazing_and_opposite_hemispheres() {
        let m = test_material(0.25);
        let grazing = Vec3::new(1.0, 0.0, 1e-9).normalized();
        let w = m.eval(UV::default(), Vec3::Z, grazing, Vec3::Z);
        assert!(w.is_finite() && w.is_nonnegative());

        let below = Vec3::new(0.3, 0.0, -0.9).normalized();
        assert!(m.eval(UV::default(), Vec3::Z, Vec3::Z, below).is_zero());
        assert_eq!(m.pdf(UV::default(), Vec3::Z, Vec3::Z, below), 0.0);
    }

    #[test]
    fn test_beckmann_normalized() {
        // integral of D(h) cos(h) over the hemisphere is 1
        let alpha = 0.3;
        let n = 2000;
        let mut sum = 0.0;
        for k in 0..n {
            let theta = (k as f32 + 0.5) / n as f32 * PI / 2.0;
            let cos_h = theta.cos();
            sum += beckmann_d(alpha, cos_h) * cos_h * theta.sin() * (PI / 2.0 / n as f32);
        }
        sum *= 2.0 * PI;
        assert!((sum - 1.0).abs() < 0.01, "{}", sum);
    }
}
