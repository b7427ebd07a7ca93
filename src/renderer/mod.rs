mod frame;

pub use frame::{Frame, CLEAR};
pub use crate::vec2d::Vec2D;

use crate::camera::Camera;
use crate::config::RenderSettings;
use crate::error::TransportError;
use crate::integrator::PathTracer;
use crate::math::*;
use crate::profile::Profile;
use crate::tonemap::{parse_tonemapper, Pixel, TonemapSettings};
use crate::world::World;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{info, warn};

/// running sum of one pixel's radiance estimates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelAccumulator {
    pub sum: RGBColor,
    pub samples: u32,
}

impl PixelAccumulator {
    pub fn add(&mut self, estimate: RGBColor) {
        self.sum += estimate.sanitized();
        self.samples += 1;
    }

    pub fn mean(&self) -> RGBColor {
        if self.samples == 0 {
            return RGBColor::ZERO;
        }
        self.sum / self.samples as f32
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RenderReport {
    pub profile: Profile,
    pub pixels_done: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    samples_per_pixel: u16,
    seed: u64,
    threads: usize,
    tonemap_settings: TonemapSettings,
}

impl Renderer {
    pub fn new(
        samples_per_pixel: u16,
        seed: u64,
        threads: usize,
        tonemap_settings: TonemapSettings,
    ) -> Result<Self, TransportError> {
        if samples_per_pixel == 0 {
            return Err(TransportError::Configuration(
                "at least one sample per pixel is needed".to_string(),
            ));
        }
        if threads == 0 {
            return Err(TransportError::Configuration(
                "at least one render thread is needed".to_string(),
            ));
        }
        Ok(Renderer {
            samples_per_pixel,
            seed,
            threads,
            tonemap_settings,
        })
    }

    pub fn from_settings(settings: &RenderSettings) -> Result<Self, TransportError> {
        let seed = settings.seed.unwrap_or_else(|| {
            let seed = rand::random();
            info!("no seed given, using {}", seed);
            seed
        });
        Renderer::new(
            settings.min_samples,
            seed,
            settings.threads.map_or_else(num_cpus::get, |t| t as usize),
            settings.tonemap_settings,
        )
    }

    fn pixel_sampler(&self, index: usize) -> RandomSampler {
        RandomSampler::new(self.seed ^ (index as u64).wrapping_mul(0x9E3779B97F4A7C15))
    }

    /// every sample of pixel `(x, y)`, with `y = 0` the top row.
    pub fn render_pixel(
        &self,
        world: &World,
        camera: &Camera,
        tracer: &dyn PathTracer,
        (x, y): (usize, usize),
        (width, height): (usize, usize),
        profile: &mut Profile,
    ) -> PixelAccumulator {
        let mut sampler = self.pixel_sampler(y * width + x);
        let mut accumulator = PixelAccumulator::default();
        for _ in 0..self.samples_per_pixel {
            let sample = sampler.draw_2d();
            let s = (x as f32 + sample.x) / width as f32;
            let t = 1.0 - (y as f32 + sample.y) / height as f32;
            let estimate = tracer.estimate(world, camera.get_ray(s, t), &mut sampler, profile);
            debug_assert!(
                estimate.is_finite(),
                "({}, {}) resulted in {:?}",
                x,
                y,
                estimate
            );
            accumulator.add(estimate);
        }
        accumulator
    }

    /// fills the back surface of `frame`. the frame is left uncommitted.
    ///
    /// `cancel` is checked between pixels. pixels not reached keep their previous contents.
    pub fn render(
        &self,
        world: &World,
        camera: &Camera,
        tracer: &dyn PathTracer,
        frame: &Frame,
        cancel: &AtomicBool,
    ) -> Result<RenderReport, TransportError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        let (tonemapper, converter) = parse_tonemapper(self.tonemap_settings);

        let mut back = frame.back_mut();
        let (width, height) = (back.width, back.height);
        info!(
            "starting render with frame resolution {}x{} and {} samples per pixel",
            width, height, self.samples_per_pixel
        );
        if width == 0 || height == 0 {
            warn!("frame has no pixels, nothing to render");
            return Ok(RenderReport::default());
        }

        let now = Instant::now();
        let buffer: &mut [Pixel] = &mut back.buffer;
        let (profile, pixels_done) = pool.install(|| {
            buffer
                .par_chunks_mut(width)
                .enumerate()
                .map(|(y, row)| {
                    let mut profile = Profile::default();
                    let mut done = 0;
                    for (x, pixel) in row.iter_mut().enumerate() {
                        if cancel.load(Ordering::Relaxed) {
                            break;
                        }
                        let accumulator = self.render_pixel(
                            world,
                            camera,
                            tracer,
                            (x, y),
                            (width, height),
                            &mut profile,
                        );
                        *pixel = converter.to_pixel(tonemapper.as_ref(), accumulator.mean());
                        done += 1;
                    }
                    (profile, done)
                })
                .reduce(
                    || (Profile::default(), 0),
                    |a, b| (a.0.combine(b.0), a.1 + b.1),
                )
        });
        let elapsed = now.elapsed();

        let cancelled = pixels_done < width * height;
        if cancelled {
            warn!(
                "render cancelled after {} of {} pixels",
                pixels_done,
                width * height
            );
        }
        info!("took {}s", elapsed.as_secs_f32());
        profile.pretty_print(elapsed.as_secs_f32(), self.threads);
        Ok(RenderReport {
            profile,
            pixels_done,
            cancelled,
            elapsed,
        })
    }
}
