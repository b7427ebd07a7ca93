mod projective_camera;

pub use projective_camera::ProjectiveCamera;

use crate::math::*;

#[derive(Debug, Clone)]
pub enum Camera {
    ProjectiveCamera(ProjectiveCamera),
}

impl Camera {
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        match self {
            Camera::ProjectiveCamera(inner) => inner.get_ray(s, t),
        }
    }
    pub fn with_aspect_ratio(&self, aspect_ratio: f32) -> Self {
        match self {
            Camera::ProjectiveCamera(inner) => {
                Camera::ProjectiveCamera(inner.clone().with_aspect_ratio(aspect_ratio))
            }
        }
    }
}

impl From<ProjectiveCamera> for Camera {
    fn from(value: ProjectiveCamera) -> Self {
        Camera::ProjectiveCamera(value)
    }
}
