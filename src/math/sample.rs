use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Copy, Clone)]
pub struct Sample1D {
    pub x: f32,
}

impl Sample1D {
    pub const fn new(x: f32) -> Self {
        Sample1D { x }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Sample2D {
    pub x: f32,
    pub y: f32,
}

impl Sample2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Sample2D { x, y }
    }
}

pub trait Sampler: Send {
    fn draw_1d(&mut self) -> Sample1D;
    fn draw_2d(&mut self) -> Sample2D;
}

/// independent uniform samples backed by a seeded `StdRng`, so that a render is reproducible
/// given the same seed.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> RandomSampler {
        RandomSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn draw_1d(&mut self) -> Sample1D {
        Sample1D::new(self.rng.gen::<f32>())
    }
    fn draw_2d(&mut self) -> Sample2D {
        Sample2D::new(self.rng.gen::<f32>(), self.rng.gen::<f32>())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn function(x: f32) -> f32 {
        x * x - x + 1.0
    }

    #[test]
    fn test_random_sampler_1d() {
        let mut sampler = RandomSampler::new(13);
        let n = 100000;
        let mut sum = 0.0;
        for _ in 0..n {
            let s = sampler.draw_1d();
            assert!((0.0..1.0).contains(&s.x));
            sum += function(s.x);
        }
        // integral of x^2 - x + 1 over [0, 1] is 5/6
        let estimate = sum / n as f32;
        assert!((estimate - 5.0 / 6.0).abs() < 0.01, "{}", estimate);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomSampler::new(7);
        let mut b = RandomSampler::new(7);
        for _ in 0..32 {
            assert_eq!(a.draw_1d().x, b.draw_1d().x);
        }
    }
}
