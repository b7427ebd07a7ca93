mod color;
mod misc;
mod point;
mod sample;
mod tangent_frame;
mod transform;
mod vec;

pub use color::RGBColor;
pub use misc::*;
pub use point::Point3;
pub use sample::{RandomSampler, Sample1D, Sample2D, Sampler};
pub use tangent_frame::TangentFrame;
pub use transform::Transform3;
pub use vec::Vec3;

pub use std::f32::consts::PI;
pub use std::f32::INFINITY;

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x(), p.y(), p.z())
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Point3 {
        Point3::new(v.x(), v.y(), v.z())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    pub tmax: f32,
}

impl Ray {
    pub const fn new(origin: Point3, direction: Vec3) -> Self {
        Ray {
            origin,
            direction,
            tmax: INFINITY,
        }
    }
}
