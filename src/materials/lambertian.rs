use super::{DirectionSample, Material, GRAZING_COSINE};
use crate::math::*;
use crate::vec2d::UV;

#[derive(Clone, Debug)]
pub struct Lambertian {
    pub name: String,
    pub color: RGBColor,
}

impl Lambertian {
    pub fn new(name: impl Into<String>, color: RGBColor) -> Lambertian {
        Lambertian {
            name: name.into(),
            color,
        }
    }
}

impl Material for Lambertian {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, _uv: UV, normal: Vec3, outgoing: Vec3, incoming: Vec3) -> RGBColor {
        let normal = normal.normalized();
        if normal * outgoing.normalized() > GRAZING_COSINE
            && normal * incoming.normalized() > GRAZING_COSINE
        {
            self.color / PI
        } else {
            RGBColor::ZERO
        }
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
        Some(DirectionSample {
            direction: frame.to_world(&wi).normalized(),
            pdf: wi.z().max(GRAZING_COSINE) / PI,
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

    #[test]
    fn test_lambertian() {
        let lambertian = Lambertian::new("white", RGBColor::new(0.9, 0.2, 0.9));
        let samples = validate_directions(&lambertian);
        assert_eq!(samples.len(), SAMPLE_COUNT);
        validate_brdf(&lambertian);
        validate_pdf_consistency(&lambertian);
    }

    #[test]
    fn test_lambertian_integral() {
        // with f * cos / pdf == albedo for every sample, the estimate is exact
        let lambertian = Lambertian::new("white", RGBColor::from(1.0));
        let mut sampler = RandomSampler::new(5);
        let outgoing = Vec3::new(0.0, 0.3, 1.0).normalized();
        for _ in 0..1000 {
            let s = lambertian
                .sample(&mut sampler, UV::default(), Vec3::Z, outgoing)
                .unwrap();
            if s.direction.z() <= 1e-4 {
                continue;
            }
            let f = lambertian.eval(UV::default(), Vec3::Z, outgoing, s.direction);
            let estimate = f.r * s.direction.z() / s.pdf;
            assert!((estimate - 1.0).abs() < 1e-3, "{}", estimate);
        }
    }
}
