extern crate light_transport as root;

use root::config::{get_settings, Config, RenderSettings};
use root::integrator::PathTracerFactory;
use root::renderer::{Frame, Renderer};
use root::world::{build_scene, World};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use structopt::StructOpt;
use tracing::{error, info, Level};

#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Opt {
    #[structopt(long, default_value = "data/config.toml")]
    pub config_file: String,
    /// overrides the scene named in the config.
    #[structopt(long)]
    pub scene: Option<String>,
    #[structopt(long, default_value = "output")]
    pub output_dir: PathBuf,
    #[structopt(short = "n", long)]
    pub dry_run: bool,
    #[structopt(long, default_value = "info")]
    pub log_level: String,
}

fn parse_log_level(level: &str, default: Level) -> Level {
    match level.to_lowercase().as_str() {
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "trace" => Level::TRACE,
        "error" => Level::ERROR,
        "debug" => Level::DEBUG,
        _ => default,
    }
}

fn render_one(
    world: &World,
    config: &Config,
    settings: &RenderSettings,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let (width, height) = (settings.resolution.width, settings.resolution.height);
    let camera = config.camera.build(settings.resolution);
    let factory = PathTracerFactory::new(settings.integrator, settings.path_tracer_options())?;
    let tracer = factory.create();
    let renderer = Renderer::from_settings(settings)?;

    let frame = Frame::new(width, height);
    let cancel = AtomicBool::new(false);
    let report = renderer.render(world, &camera, &tracer, &frame, &cancel)?;
    info!(
        "rendered {} pixels in {}s",
        report.pixels_done,
        report.elapsed.as_secs_f32()
    );
    frame.commit();

    let filename = settings
        .filename
        .clone()
        .unwrap_or_else(|| String::from("beauty"));
    let png_filename = output_dir.join(format!("{}.png", filename));
    let front = frame.front();
    let bytes: Vec<u8> = front.buffer.iter().flatten().copied().collect();
    image::save_buffer(
        &png_filename,
        &bytes,
        width as u32,
        height as u32,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to write {}", png_filename.display()))?;
    info!("saved {}", png_filename.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opt::from_args();
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&opts.log_level, Level::INFO))
        .init();

    let mut config = match get_settings(&opts.config_file) {
        Ok(expr) => expr,
        Err(e) => {
            error!("couldn't read {}, {:?}", opts.config_file, e);
            return Err(e);
        }
    };
    if let Some(scene) = opts.scene {
        config.scene = scene;
    }
    let world = build_scene(&config.scene)?;
    if opts.dry_run {
        info!("dry run, not rendering");
        return Ok(());
    }

    fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("failed to create {}", opts.output_dir.display()))?;
    for settings in config.render_settings.iter() {
        render_one(&world, &config, settings, &opts.output_dir)?;
    }
    Ok(())
}
