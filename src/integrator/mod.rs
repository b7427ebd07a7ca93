mod bdpt;
mod debug;
mod pt;
pub mod utils;

pub use bdpt::{BDPTIntegrator, ConnectionStrategy};
pub use debug::{NormalIntegrator, PositionIntegrator};
pub use pt::PathTracingIntegrator;
pub use utils::{Continuation, RussianRoulette};

use crate::error::TransportError;
use crate::math::*;
use crate::profile::Profile;
use crate::world::World;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// config names go through `FromStr`, so the short aliases are accepted there too.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PathTracerKind {
    Normal,
    Position,
    Direct,
    Unidirectional,
    BidirectionalLightTracing,
    BidirectionalMis,
}

impl PathTracerKind {
    pub fn is_bidirectional(&self) -> bool {
        matches!(
            self,
            PathTracerKind::BidirectionalLightTracing | PathTracerKind::BidirectionalMis
        )
    }
}

impl FromStr for PathTracerKind {
    type Err = TransportError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(PathTracerKind::Normal),
            "position" => Ok(PathTracerKind::Position),
            "direct" => Ok(PathTracerKind::Direct),
            "unidirectional" | "unidirect" | "pt" => Ok(PathTracerKind::Unidirectional),
            "bidirectional_light_tracing" | "bidirect_lt2" | "lt2" => {
                Ok(PathTracerKind::BidirectionalLightTracing)
            }
            "bidirectional_mis" | "bidirect_mis" | "bdpt" => Ok(PathTracerKind::BidirectionalMis),
            _ => Err(TransportError::UnknownStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for PathTracerKind {
    type Error = TransportError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// how competing strategies for the same path are weighted.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum MisHeuristic {
    Balance,
    Power(f32),
}

impl Default for MisHeuristic {
    fn default() -> Self {
        MisHeuristic::Power(2.0)
    }
}

impl MisHeuristic {
    pub fn apply(&self, ratio: f32) -> f32 {
        match *self {
            MisHeuristic::Balance => ratio,
            MisHeuristic::Power(beta) if beta == 2.0 => ratio * ratio,
            MisHeuristic::Power(beta) => ratio.powf(beta),
        }
    }

    /// weight of the strategy with density `a` against one with density `b`.
    pub fn weight(&self, a: f32, b: f32) -> f32 {
        match *self {
            MisHeuristic::Balance => balance_heuristic(a, b),
            MisHeuristic::Power(beta) if beta == 2.0 => power_heuristic(a, b),
            MisHeuristic::Power(_) => {
                let (a, b) = (self.apply(a), self.apply(b));
                if a + b > 0.0 {
                    a / (a + b)
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathTracerOptions {
    /// maximum vertices in a full path, camera and light vertex included.
    pub max_pathlen: i32,
    pub russian_roulette: Option<RussianRoulette>,
    pub light_samples: u16,
    pub mis: MisHeuristic,
}

impl Default for PathTracerOptions {
    fn default() -> Self {
        PathTracerOptions {
            max_pathlen: 8,
            russian_roulette: Some(RussianRoulette::default()),
            light_samples: 1,
            mis: MisHeuristic::default(),
        }
    }
}

/// estimates the radiance arriving at the camera along one primary ray.
pub trait PathTracer: Send + Sync {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor;
}

#[derive(Debug, Clone)]
pub enum PathTracerEnum {
    Normal(NormalIntegrator),
    Position(PositionIntegrator),
    PathTracing(PathTracingIntegrator),
    BDPT(BDPTIntegrator),
}

impl PathTracer for PathTracerEnum {
    fn estimate(
        &self,
        world: &World,
        camera_ray: Ray,
        sampler: &mut dyn Sampler,
        profile: &mut Profile,
    ) -> RGBColor {
        match self {
            PathTracerEnum::Normal(inner) => inner.estimate(world, camera_ray, sampler, profile),
            PathTracerEnum::Position(inner) => inner.estimate(world, camera_ray, sampler, profile),
            PathTracerEnum::PathTracing(inner) => {
                inner.estimate(world, camera_ray, sampler, profile)
            }
            PathTracerEnum::BDPT(inner) => inner.estimate(world, camera_ray, sampler, profile),
        }
    }
}

/// validated strategy selection. building one checks the options once, `create` cannot fail.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathTracerFactory {
    kind: PathTracerKind,
    options: PathTracerOptions,
    max_pathlen: usize,
}

impl PathTracerFactory {
    pub fn new(kind: PathTracerKind, options: PathTracerOptions) -> Result<Self, TransportError> {
        if options.max_pathlen <= 0 {
            return Err(TransportError::Configuration(format!(
                "max_pathlen must be positive, got {}",
                options.max_pathlen
            )));
        }
        if kind.is_bidirectional() && options.max_pathlen < 2 {
            return Err(TransportError::Configuration(format!(
                "{:?} needs max_pathlen of at least 2, got {}",
                kind, options.max_pathlen
            )));
        }
        if let Some(RussianRoulette {
            continuation: Continuation::Fixed(p),
            ..
        }) = options.russian_roulette
        {
            if !(0.0..=1.0).contains(&p) {
                return Err(TransportError::Configuration(format!(
                    "roulette continuation probability {} is outside [0, 1]",
                    p
                )));
            }
        }
        if let MisHeuristic::Power(beta) = options.mis {
            if !(beta > 0.0 && beta.is_finite()) {
                return Err(TransportError::Configuration(format!(
                    "mis exponent must be positive, got {}",
                    beta
                )));
            }
        }
        info!(
            "configured {:?} with max_pathlen {}",
            kind, options.max_pathlen
        );
        Ok(PathTracerFactory {
            kind,
            options,
            max_pathlen: options.max_pathlen as usize,
        })
    }

    pub fn kind(&self) -> PathTracerKind {
        self.kind
    }

    pub fn options(&self) -> &PathTracerOptions {
        &self.options
    }

    pub fn create(&self) -> PathTracerEnum {
        let options = &self.options;
        match self.kind {
            PathTracerKind::Normal => PathTracerEnum::Normal(NormalIntegrator),
            PathTracerKind::Position => PathTracerEnum::Position(PositionIntegrator),
            PathTracerKind::Direct => PathTracerEnum::PathTracing(PathTracingIntegrator {
                // emitter seen directly, or one bounce away
                max_pathlen: self.max_pathlen.min(3),
                russian_roulette: None,
                light_samples: options.light_samples,
                mis: options.mis,
            }),
            PathTracerKind::Unidirectional => PathTracerEnum::PathTracing(PathTracingIntegrator {
                max_pathlen: self.max_pathlen,
                russian_roulette: options.russian_roulette,
                light_samples: options.light_samples,
                mis: options.mis,
            }),
            PathTracerKind::BidirectionalLightTracing => PathTracerEnum::BDPT(BDPTIntegrator {
                max_pathlen: self.max_pathlen,
                russian_roulette: options.russian_roulette,
                strategy: ConnectionStrategy::LightTracing,
            }),
            PathTracerKind::BidirectionalMis => PathTracerEnum::BDPT(BDPTIntegrator {
                max_pathlen: self.max_pathlen,
                russian_roulette: options.russian_roulette,
                strategy: ConnectionStrategy::Mis(options.mis),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::world::test::corner_scene;

    fn camera_ray() -> Ray {
        Ray::new(
            Point3::new(0.0, -2.5, 0.8),
            (Point3::new(0.1, 1.0, 0.5) - Point3::new(0.0, -2.5, 0.8)).normalized(),
        )
    }

    /// mean and standard error of the luminance estimate along one ray.
    fn estimate(kind: PathTracerKind, samples: usize, seed: u64) -> (f32, f32) {
        estimate_along(&corner_scene(), camera_ray(), kind, samples, seed)
    }

    fn estimate_along(
        world: &World,
        ray: Ray,
        kind: PathTracerKind,
        samples: usize,
        seed: u64,
    ) -> (f32, f32) {
        let factory = PathTracerFactory::new(
            kind,
            PathTracerOptions {
                max_pathlen: 5,
                ..Default::default()
            },
        )
        .unwrap();
        let tracer = factory.create();
        let mut sampler = RandomSampler::new(seed);
        let mut profile = Profile::default();
        let (mut sum, mut sum_squared) = (0.0f64, 0.0f64);
        for _ in 0..samples {
            let l = tracer
                .estimate(world, ray, &mut sampler, &mut profile)
                .luminance() as f64;
            sum += l;
            sum_squared += l * l;
        }
        let n = samples as f64;
        let mean = sum / n;
        let variance = (sum_squared / n - mean * mean).max(0.0);
        (mean as f32, (variance / n).sqrt() as f32)
    }

    fn assert_agree(a: (f32, f32), b: (f32, f32)) {
        let tolerance = 4.0 * (a.1 * a.1 + b.1 * b.1).sqrt() + 1e-3 * a.0.abs().max(b.0.abs());
        assert!(
            (a.0 - b.0).abs() <= tolerance,
            "{:?} vs {:?}, tolerance {}",
            a,
            b,
            tolerance
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "bidirect_mis".parse::<PathTracerKind>(),
            Ok(PathTracerKind::BidirectionalMis)
        );
        assert_eq!("Direct".parse::<PathTracerKind>(), Ok(PathTracerKind::Direct));
        assert_eq!(
            "lt2".parse::<PathTracerKind>(),
            Ok(PathTracerKind::BidirectionalLightTracing)
        );
        assert_eq!(
            "sppm".parse::<PathTracerKind>(),
            Err(TransportError::UnknownStrategy("sppm".to_string()))
        );
    }

    #[test]
    fn test_factory_rejects_bad_options() {
        for max_pathlen in [0, -3] {
            let result = PathTracerFactory::new(
                PathTracerKind::Unidirectional,
                PathTracerOptions {
                    max_pathlen,
                    ..Default::default()
                },
            );
            assert!(matches!(result, Err(TransportError::Configuration(_))));
        }
        let result = PathTracerFactory::new(
            PathTracerKind::BidirectionalMis,
            PathTracerOptions {
                max_pathlen: 1,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(TransportError::Configuration(_))));
        let result = PathTracerFactory::new(
            PathTracerKind::Direct,
            PathTracerOptions {
                russian_roulette: Some(RussianRoulette {
                    min_length: 2,
                    continuation: Continuation::Fixed(1.5),
                }),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        let result = PathTracerFactory::new(
            PathTracerKind::Direct,
            PathTracerOptions {
                mis: MisHeuristic::Power(0.0),
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_factory_creates_each_kind() {
        for kind in [
            PathTracerKind::Normal,
            PathTracerKind::Position,
            PathTracerKind::Direct,
            PathTracerKind::Unidirectional,
            PathTracerKind::BidirectionalLightTracing,
            PathTracerKind::BidirectionalMis,
        ] {
            let factory = PathTracerFactory::new(kind, PathTracerOptions::default()).unwrap();
            assert_eq!(factory.kind(), kind);
            let tracer = factory.create();
            let matches_kind = match kind {
                PathTracerKind::Normal => matches!(tracer, PathTracerEnum::Normal(_)),
                PathTracerKind::Position => matches!(tracer, PathTracerEnum::Position(_)),
                PathTracerKind::Direct => {
                    matches!(tracer, PathTracerEnum::PathTracing(ref pt) if pt.max_pathlen == 3)
                }
                PathTracerKind::Unidirectional => {
                    matches!(tracer, PathTracerEnum::PathTracing(ref pt) if pt.max_pathlen == 8)
                }
                PathTracerKind::BidirectionalLightTracing => matches!(
                    tracer,
                    PathTracerEnum::BDPT(BDPTIntegrator {
                        strategy: ConnectionStrategy::LightTracing,
                        ..
                    })
                ),
                PathTracerKind::BidirectionalMis => matches!(
                    tracer,
                    PathTracerEnum::BDPT(BDPTIntegrator {
                        strategy: ConnectionStrategy::Mis(_),
                        ..
                    })
                ),
            };
            assert!(matches_kind, "{:?}", kind);
        }
    }

    #[test]
    fn test_mis_heuristics() {
        let power = MisHeuristic::default();
        assert!((power.weight(1.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((power.weight(3.0, 1.0) - 0.9).abs() < 1e-6);
        assert!((MisHeuristic::Balance.weight(3.0, 1.0) - 0.75).abs() < 1e-6);
        let cubic = MisHeuristic::Power(3.0);
        assert!((cubic.weight(2.0, 1.0) - 8.0 / 9.0).abs() < 1e-6);
        assert_eq!(power.weight(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_direct_sees_light() {
        let world = corner_scene();
        let tracer = PathTracerFactory::new(PathTracerKind::Direct, PathTracerOptions::default())
            .unwrap()
            .create();
        let mut sampler = RandomSampler::new(1);
        let mut profile = Profile::default();
        let up = Ray::new(Point3::new(0.0, 0.0, 1.0), Vec3::Z);
        let color = tracer.estimate(&world, up, &mut sampler, &mut profile);
        assert_eq!(color, RGBColor::from(4.0));
    }

    #[test]
    fn test_strategies_agree() {
        let unidirectional = estimate(PathTracerKind::Unidirectional, 20000, 21);
        let bidirectional = estimate(PathTracerKind::BidirectionalMis, 20000, 22);
        let light_tracing = estimate(PathTracerKind::BidirectionalLightTracing, 20000, 23);
        assert!(unidirectional.0 > 0.0);
        assert_agree(unidirectional, bidirectional);
        assert_agree(unidirectional, light_tracing);
    }

    #[test]
    fn test_strategies_agree_on_glossy_sphere() {
        // the metal sphere of the cornell box, its pdf depends on the outgoing direction
        let world = crate::world::cornell_box().unwrap();
        let origin = Point3::new(0.0, -3.8, 1.0);
        let rays = [
            Point3::new(-0.4, 0.3, 0.4),
            Point3::new(-0.25, 0.05, 0.55),
        ]
        .map(|target| Ray::new(origin, (target - origin).normalized()));
        for (i, ray) in rays.into_iter().enumerate() {
            let seed = 40 + 3 * i as u64;
            let unidirectional =
                estimate_along(&world, ray, PathTracerKind::Unidirectional, 12000, seed);
            let bidirectional =
                estimate_along(&world, ray, PathTracerKind::BidirectionalMis, 12000, seed + 1);
            let light_tracing = estimate_along(
                &world,
                ray,
                PathTracerKind::BidirectionalLightTracing,
                12000,
                seed + 2,
            );
            assert!(unidirectional.0 > 0.0, "{:?}", unidirectional);
            assert_agree(unidirectional, bidirectional);
            assert_agree(unidirectional, light_tracing);
        }
    }

    #[test]
    fn test_heuristic_does_not_bias() {
        let world = corner_scene();
        let mut means = vec![];
        for mis in [MisHeuristic::Balance, MisHeuristic::Power(2.0)] {
            let tracer = PathTracerFactory::new(
                PathTracerKind::BidirectionalMis,
                PathTracerOptions {
                    max_pathlen: 4,
                    mis,
                    ..Default::default()
                },
            )
            .unwrap()
            .create();
            let mut sampler = RandomSampler::new(31);
            let mut profile = Profile::default();
            let (mut sum, mut sum_squared) = (0.0f64, 0.0f64);
            let n = 20000;
            for _ in 0..n {
                let l = tracer
                    .estimate(&world, camera_ray(), &mut sampler, &mut profile)
                    .luminance() as f64;
                sum += l;
                sum_squared += l * l;
            }
            let mean = sum / n as f64;
            let error = ((sum_squared / n as f64 - mean * mean).max(0.0) / n as f64).sqrt();
            means.push((mean as f32, error as f32));
        }
        assert_agree(means[0], means[1]);
    }
}
