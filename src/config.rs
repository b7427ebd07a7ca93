use crate::camera::{Camera, ProjectiveCamera};
use crate::integrator::{
    Continuation, MisHeuristic, PathTracerKind, PathTracerOptions, RussianRoulette,
};
use crate::math::{Point3, Vec3};
use crate::tonemap::TonemapSettings;

use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CameraSettings {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub v_up: Option<[f32; 3]>,
    pub vfov: f32,
}

impl CameraSettings {
    pub fn build(&self, resolution: Resolution) -> Camera {
        let aspect_ratio = resolution.width as f32 / resolution.height as f32;
        ProjectiveCamera::new(
            Point3::from(self.look_from),
            Point3::from(self.look_at),
            Vec3::from(self.v_up.unwrap_or([0.0, 0.0, 1.0])),
            self.vfov,
        )
        .with_aspect_ratio(aspect_ratio)
        .into()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct RenderSettings {
    pub filename: Option<String>,
    pub resolution: Resolution,
    pub integrator: PathTracerKind,
    pub max_pathlen: Option<i32>,
    /// paths shorter than this never face roulette.
    pub min_bounces: Option<usize>,
    pub russian_roulette: Option<bool>,
    pub light_samples: Option<u16>,
    pub mis: Option<MisHeuristic>,
    pub threads: Option<u16>,
    pub min_samples: u16,
    pub seed: Option<u64>,
    #[serde(default)]
    pub tonemap_settings: TonemapSettings,
}

impl RenderSettings {
    pub fn path_tracer_options(&self) -> PathTracerOptions {
        let defaults = PathTracerOptions::default();
        let russian_roulette = if self.russian_roulette.unwrap_or(true) {
            Some(RussianRoulette {
                min_length: self
                    .min_bounces
                    .unwrap_or(RussianRoulette::default().min_length),
                continuation: Continuation::Throughput,
            })
        } else {
            None
        };
        PathTracerOptions {
            max_pathlen: self.max_pathlen.unwrap_or(defaults.max_pathlen),
            russian_roulette,
            light_samples: self.light_samples.unwrap_or(defaults.light_samples),
            mis: self.mis.unwrap_or(defaults.mis),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// name of a built in scene.
    pub scene: String,
    pub camera: CameraSettings,
    pub render_settings: Vec<RenderSettings>,
}

pub fn parse_config(input: &str) -> anyhow::Result<Config> {
    let mut config: Config = toml::from_str(input).context("failed to parse config")?;
    let num_cpus = num_cpus::get();
    for render_settings in config.render_settings.iter_mut() {
        if render_settings.resolution.width == 0 || render_settings.resolution.height == 0 {
            bail!(
                "resolution {}x{} has no pixels",
                render_settings.resolution.width,
                render_settings.resolution.height
            );
        }
        render_settings.threads = match render_settings.threads {
            Some(expr) => Some(expr),
            None => Some(num_cpus as u16),
        };
    }
    Ok(config)
}

pub fn get_settings(filepath: impl AsRef<Path>) -> anyhow::Result<Config> {
    let filepath = filepath.as_ref();
    let input = std::fs::read_to_string(filepath)
        .with_context(|| format!("failed to read {}", filepath.display()))?;
    let config = parse_config(&input)?;
    info!(
        "parsed {} render settings from {}",
        config.render_settings.len(),
        filepath.display()
    );
    Ok(config)
}
