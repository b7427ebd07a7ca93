pub mod utils;

use utils::*;

use crate::integrator::utils::*;
use crate::integrator::{MisHeuristic, PathTracer};
use crate::math::*;
use crate::profile::Profile;
use crate::world::World;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConnectionStrategy {
    /// camera plus first hit joined to every light vertex, one strategy per path length.
    LightTracing,
    /// every `(s, t >= 2)` pair, weighted against the others that build the same path.
    Mis(MisHeuristic),
}

#[derive(Debug, Clone)]
pub struct BDPTIntegrator {
    /// vertex cap of a full path, camera and light vertex included.
    pub max_pathlen: usize,
    pub russian_roulette: Option<RussianRoulette>,
    pub strategy: ConnectionStrategy,
}

impl PathTracer for BDPTIntegrator {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        let eye_vertices = match self.strategy {
            ConnectionStrategy::LightTracing => self.max_pathlen.min(2),
            ConnectionStrategy::Mis(_) => self.max_pathlen,
        };
        let eye_settings = WalkSettings {
            max_vertices: eye_vertices,
            roulette: self.russian_roulette,
        };
        // at least two vertices of every path come from the camera side
        let light_settings = WalkSettings {
            max_vertices: self.max_pathlen.saturating_sub(2),
            roulette: self.russian_roulette,
        };

        let eye_path = trace_eye_path(world, camera_ray, &eye_settings, sampler, profile);
        let light_path = if light_settings.max_vertices > 0 {
            trace_light_path(world, &light_settings, sampler, profile)
        } else {
            Path::default()
        };

        let mut sum = RGBColor::ZERO;
        for t in 2..=eye_path.len() {
            for s in 0..=light_path.len() {
                if s + t > self.max_pathlen {
                    break;
                }
                let contribution = eval_unweighted_contribution(
                    world,
                    light_path.vertices(),
                    s,
                    eye_path.vertices(),
                    t,
                    profile,
                );
                if contribution.is_zero() {
                    continue;
                }
                let weight = match self.strategy {
                    ConnectionStrategy::LightTracing => 1.0,
                    ConnectionStrategy::Mis(heuristic) => eval_mis(
                        world,
                        light_path.vertices(),
                        s,
                        eye_path.vertices(),
                        t,
                        heuristic,
                    ),
                };
                debug_assert!(weight.is_finite(), "{} {} {}", s, t, weight);
                sum += contribution * weight;
            }
        }
        sum.sanitized()
    }
}
