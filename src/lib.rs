pub mod aabb;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hittable;
pub mod integrator;
pub mod materials;
pub mod math;
pub mod profile;
pub mod renderer;
pub mod tonemap;
pub mod vec2d;
pub mod world;

pub use error::TransportError;

/// distance a spawned ray is pushed off its surface along the normal.
pub const NORMAL_OFFSET: f32 = 0.0001;
/// smallest ray parameter that counts as a hit.
pub const INTERSECTION_TIME_OFFSET: f32 = 0.0001;
