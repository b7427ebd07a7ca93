use crate::math::*;

/// pinhole camera. `u, v` in `[0, 1]` span the image plane from the lower left corner.
#[derive(Debug, Clone)]
pub struct ProjectiveCamera {
    pub origin: Point3,
    pub direction: Vec3,
    lower_left_corner: Point3,
    vfov: f32,
    pub horizontal: Vec3,
    pub vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl ProjectiveCamera {
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        v_up: Vec3,
        vertical_fov: f32, // in degrees
    ) -> ProjectiveCamera {
        let direction = (look_at - look_from).normalized();
        let w = -direction;
        let u = v_up.cross(w).normalized();
        let v = w.cross(u).normalized();

        let mut camera = ProjectiveCamera {
            origin: look_from,
            direction,
            lower_left_corner: look_from,
            vfov: vertical_fov,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u,
            v,
            w,
        };
        camera.set_aspect_ratio(1.0);
        camera
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let half_width = aspect_ratio * half_height;
        self.lower_left_corner = self.origin - self.u * half_width - self.v * half_height - self.w;
        self.horizontal = self.u * 2.0 * half_width;
        self.vertical = self.v * 2.0 * half_height;
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.set_aspect_ratio(aspect_ratio);
        self
    }

    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        let point_on_plane = self.lower_left_corner + self.horizontal * u + self.vertical * v;
        let direction = (point_on_plane - self.origin).normalized();
        debug_assert!(direction.is_finite());
        Ray::new(self.origin, direction)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_center_ray() {
        let camera = ProjectiveCamera::new(
            Point3::new(0.0, -5.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
            Vec3::Z,
            45.0,
        )
        .with_aspect_ratio(16.0 / 9.0);
        let ray = camera.get_ray(0.5, 0.5);
        assert!((ray.direction - Vec3::Y).norm() < 1e-5, "{:?}", ray);
        assert_eq!(ray.origin, Point3::new(0.0, -5.0, 1.0));
    }

    #[test]
    fn test_corners() {
        let camera = ProjectiveCamera::new(
            Point3::ORIGIN,
            Point3::new(0.0, 1.0, 0.0),
            Vec3::Z,
            90.0,
        );
        // 90 degree fov at aspect 1 puts the top edge at 45 degrees
        let top = camera.get_ray(0.5, 1.0);
        assert!((top.direction.z() - top.direction.y()).abs() < 1e-5);
        assert!(top.direction.z() > 0.0);
        // u grows to the right when looking down +y with z up
        let right = camera.get_ray(1.0, 0.5);
        assert!(right.direction.x() > 0.0, "{:?}", right);
    }
}
