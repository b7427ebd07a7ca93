use crate::geometry::Geometry;
use crate::hittable::Hittable;
use crate::materials::{Material, MaterialId};
use crate::math::*;
use crate::profile::Profile;
use crate::vec2d::UV;
use crate::world::World;
use crate::{INTERSECTION_TIME_OFFSET, NORMAL_OFFSET};

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VertexType {
    /// a point sampled on an emitter, starting a light path.
    LightSource,
    /// a scattering vertex on a light path.
    Light,
    /// a scattering vertex on a camera path.
    Eye,
    Camera,
}

/// one vertex of a path.
///
/// `normal` faces the side the path arrived from, `backface` records whether that meant
/// flipping the geometric normal. `wi` points back toward the previous vertex.
/// `pdf_forward` is the solid angle density with which the previous vertex sampled the
/// direction to this one, except on a light source vertex where it is the area density of
/// choosing that light and point.
#[derive(Debug, Copy, Clone)]
pub struct Vertex {
    pub vertex_type: VertexType,
    pub point: Point3,
    pub normal: Vec3,
    pub backface: bool,
    pub wi: Vec3,
    pub uv: UV,
    pub material_id: Option<MaterialId>,
    pub geometry_id: Option<usize>,
    pub throughput: RGBColor,
    pub pdf_forward: f32,
    pub prev: Option<usize>,
}

impl Vertex {
    pub fn camera(origin: Point3, direction: Vec3) -> Self {
        Vertex {
            vertex_type: VertexType::Camera,
            point: origin,
            normal: direction,
            backface: false,
            wi: Vec3::ZERO,
            uv: UV::default(),
            material_id: None,
            geometry_id: None,
            throughput: RGBColor::ONE,
            pdf_forward: 1.0,
            prev: None,
        }
    }

    pub fn light_source(
        point: Point3,
        normal: Vec3,
        geometry_id: usize,
        material_id: Option<MaterialId>,
        throughput: RGBColor,
        area_pdf: f32,
    ) -> Self {
        Vertex {
            vertex_type: VertexType::LightSource,
            point,
            normal,
            backface: false,
            wi: Vec3::ZERO,
            uv: UV::default(),
            material_id,
            geometry_id: Some(geometry_id),
            throughput,
            pdf_forward: area_pdf,
            prev: None,
        }
    }

    pub fn is_surface(&self) -> bool {
        matches!(self.vertex_type, VertexType::Eye | VertexType::Light)
    }

    /// a point nudged off the surface toward `direction`, for spawning rays.
    pub fn spawn_point(&self, direction: Vec3) -> Point3 {
        if self.vertex_type == VertexType::Camera {
            return self.point;
        }
        let side = if self.normal * direction >= 0.0 {
            1.0
        } else {
            -1.0
        };
        self.point + self.normal * (NORMAL_OFFSET * side)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
    Roulette,
    MaxLength,
    Escaped,
    /// the last vertex had no material, or its material produced no usable direction.
    Absorbed,
}

/// append only vertex arena. vertices link back to their predecessor by index.
#[derive(Debug, Clone, Default)]
pub struct Path {
    vertices: Vec<Vertex>,
    termination: Option<Termination>,
}

impl Path {
    pub fn with_capacity(capacity: usize) -> Self {
        Path {
            vertices: Vec::with_capacity(capacity),
            termination: None,
        }
    }

    /// appends `vertex`, linking it to the current last vertex. a terminated path is final.
    pub fn push(&mut self, mut vertex: Vertex) -> usize {
        debug_assert!(self.termination.is_none());
        vertex.prev = self.vertices.len().checked_sub(1);
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn terminate(&mut self, reason: Termination) {
        if self.termination.is_none() {
            self.termination = Some(reason);
        }
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Vertex;
    fn index(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Continuation {
    /// survive with the largest throughput channel, clamped to 1.
    Throughput,
    Fixed(f32),
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RussianRoulette {
    /// roulette only runs on paths holding more than this many vertices.
    pub min_length: usize,
    pub continuation: Continuation,
}

impl RussianRoulette {
    pub fn survival_probability(&self, throughput: RGBColor) -> f32 {
        match self.continuation {
            Continuation::Throughput => throughput.max_channel().clamp(0.0, 1.0),
            Continuation::Fixed(p) => p.clamp(0.0, 1.0),
        }
    }
}

impl Default for RussianRoulette {
    fn default() -> Self {
        RussianRoulette {
            min_length: 3,
            continuation: Continuation::Throughput,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WalkSettings {
    /// hard cap on the vertex count, including the seed vertex.
    pub max_vertices: usize,
    pub roulette: Option<RussianRoulette>,
}

/// extends `path` from its last vertex along `ray` until it terminates.
///
/// `beta` is the throughput the next vertex will carry and `pdf_dir` the solid angle density
/// of `ray.direction`. every appended vertex gets `vertex_type`.
pub fn random_walk(
    world: &World,
    mut ray: Ray,
    mut beta: RGBColor,
    mut pdf_dir: f32,
    vertex_type: VertexType,
    settings: &WalkSettings,
    sampler: &mut dyn Sampler,
    path: &mut Path,
    profile: &mut Profile,
) {
    debug_assert!(!path.is_empty());
    if path.len() >= settings.max_vertices {
        path.terminate(Termination::MaxLength);
        return;
    }
    loop {
        profile.bounce_rays += 1;
        let Some(hit) = world.hit(ray, INTERSECTION_TIME_OFFSET, ray.tmax) else {
            profile.escaped += 1;
            path.terminate(Termination::Escaped);
            return;
        };

        let wi = -ray.direction.normalized();
        let backface = hit.normal * wi < 0.0;
        let normal = if backface { -hit.normal } else { hit.normal };
        path.push(Vertex {
            vertex_type,
            point: hit.point,
            normal,
            backface,
            wi,
            uv: hit.uv,
            material_id: hit.material,
            geometry_id: Some(hit.geometry_id),
            throughput: beta,
            pdf_forward: pdf_dir,
            prev: None,
        });

        if path.len() >= settings.max_vertices {
            path.terminate(Termination::MaxLength);
            return;
        }

        let Some(material_id) = hit.material else {
            path.terminate(Termination::Absorbed);
            return;
        };

        if let Some(roulette) = settings.roulette {
            if path.len() > roulette.min_length {
                let survival = roulette.survival_probability(beta);
                if sampler.draw_1d().x >= survival {
                    path.terminate(Termination::Roulette);
                    return;
                }
                beta /= survival;
            }
        }

        let material = world.get_material(material_id);
        let Some(sample) = material.sample(sampler, hit.uv, normal, wi) else {
            path.terminate(Termination::Absorbed);
            return;
        };
        let f = material.eval(hit.uv, normal, wi, sample.direction);
        let cos = (sample.direction * normal).abs();
        beta = (beta * f * (cos / sample.pdf)).sanitized();
        if beta.is_zero() {
            path.terminate(Termination::Absorbed);
            return;
        }
        pdf_dir = sample.pdf;
        ray = Ray::new(hit.point + normal * NORMAL_OFFSET, sample.direction);
    }
}

/// starts a camera path at `camera_ray.origin`.
pub fn trace_eye_path(
    world: &World,
    camera_ray: Ray,
    settings: &WalkSettings,
    sampler: &mut dyn Sampler,
    profile: &mut Profile,
) -> Path {
    let mut path = Path::with_capacity(settings.max_vertices);
    path.push(Vertex::camera(camera_ray.origin, camera_ray.direction));
    profile.camera_rays += 1;
    random_walk(
        world,
        camera_ray,
        RGBColor::ONE,
        1.0,
        VertexType::Eye,
        settings,
        sampler,
        &mut path,
        profile,
    );
    path
}

/// starts a light path at a point drawn uniformly over a uniformly picked light, leaving
/// along a cosine distributed direction. empty when the scene has no usable light.
pub fn trace_light_path(
    world: &World,
    settings: &WalkSettings,
    sampler: &mut dyn Sampler,
    profile: &mut Profile,
) -> Path {
    let mut path = Path::with_capacity(settings.max_vertices);
    if settings.max_vertices == 0 {
        return path;
    }
    let Some((light, pick_pdf)) = world.pick_random_light(sampler.draw_1d()) else {
        return path;
    };
    let geometry = world.get_geometry(light.geometry_id);
    let Ok(surface) = geometry.sample(sampler) else {
        return path;
    };
    let area_pdf = pick_pdf * surface.area_pdf;
    let source = Vertex::light_source(
        surface.point,
        surface.normal,
        light.geometry_id,
        geometry.material_id(),
        light.emission / area_pdf,
        area_pdf,
    );
    path.push(source);

    let frame = TangentFrame::from_normal(surface.normal);
    let local = random_cosine_direction(sampler.draw_2d());
    let pdf_dir = local.z() / PI;
    if !(pdf_dir > 0.0) {
        path.terminate(Termination::Absorbed);
        return path;
    }
    let direction = frame.to_world(&local).normalized();
    profile.light_rays += 1;
    // cos / pdf of the cosine distributed direction
    let beta = source.throughput * PI;
    random_walk(
        world,
        Ray::new(source.spawn_point(direction), direction),
        beta,
        pdf_dir,
        VertexType::Light,
        settings,
        sampler,
        &mut path,
        profile,
    );
    path
}

pub fn veach_g(point0: Point3, cos_i: f32, point1: Point3, cos_o: f32) -> f32 {
    (cos_i * cos_o).abs() / (point1 - point0).norm_squared()
}

/// whether two vertices see each other, each side nudged off its surface.
pub fn veach_v(world: &World, a: &Vertex, b: &Vertex, profile: &mut Profile) -> bool {
    profile.shadow_rays += 1;
    let d = b.point - a.point;
    world.visible(a.spawn_point(d), b.spawn_point(-d))
}

/// converts a solid angle density at `from` into an area density at `to`.
pub fn solid_angle_to_area(pdf: f32, from: &Vertex, to: &Vertex) -> f32 {
    let d = from.point - to.point;
    let dist_squared = d.norm_squared();
    if !(dist_squared > 0.0) {
        return 0.0;
    }
    let cos = (to.normal * d).abs() / dist_squared.sqrt();
    pdf * cos / dist_squared
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::world::test::corner_scene;

    fn settings(max_vertices: usize, roulette: Option<RussianRoulette>) -> WalkSettings {
        WalkSettings {
            max_vertices,
            roulette,
        }
    }

    fn looking_at_wall() -> Ray {
        Ray::new(
            Point3::new(0.0, -2.5, 0.8),
            (Point3::new(0.1, 1.0, 0.5) - Point3::new(0.0, -2.5, 0.8)).normalized(),
        )
    }

    #[test]
    fn test_path_length_bounded() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(3);
        let mut profile = Profile::default();
        for max_vertices in 1..6 {
            let settings = settings(max_vertices, Some(RussianRoulette::default()));
            for _ in 0..200 {
                let path = trace_eye_path(
                    &world,
                    looking_at_wall(),
                    &settings,
                    &mut sampler,
                    &mut profile,
                );
                assert!(path.len() <= max_vertices);
                assert!(path.termination().is_some());
                for (i, vertex) in path.vertices().iter().enumerate() {
                    assert_eq!(vertex.prev, i.checked_sub(1));
                    assert!(vertex.throughput.is_finite());
                }
                let light = trace_light_path(&world, &settings, &mut sampler, &mut profile);
                assert!(light.len() <= max_vertices);
            }
        }
        assert!(profile.bounce_rays > 0);
    }

    #[test]
    fn test_max_length_termination() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(4);
        let mut profile = Profile::default();
        let path = trace_eye_path(
            &world,
            looking_at_wall(),
            &settings(2, None),
            &mut sampler,
            &mut profile,
        );
        assert_eq!(path.len(), 2);
        assert_eq!(path.termination(), Some(Termination::MaxLength));
        assert_eq!(path[1].vertex_type, VertexType::Eye);
        assert_eq!(path[1].geometry_id, Some(1));
        assert!(!path[1].backface);
    }

    #[test]
    fn test_zero_continuation() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(5);
        let mut profile = Profile::default();
        let roulette = RussianRoulette {
            min_length: 1,
            continuation: Continuation::Fixed(0.0),
        };
        for _ in 0..100 {
            let path = trace_eye_path(
                &world,
                looking_at_wall(),
                &settings(10, Some(roulette)),
                &mut sampler,
                &mut profile,
            );
            // the seed vertex plus exactly one hit
            assert_eq!(path.len(), 2);
            assert_eq!(path.termination(), Some(Termination::Roulette));
        }
    }

    #[test]
    fn test_escaped_and_absorbed() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(6);
        let mut profile = Profile::default();
        let away = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vec3::Y);
        let path = trace_eye_path(&world, away, &settings(5, None), &mut sampler, &mut profile);
        assert_eq!(path.len(), 1);
        assert_eq!(path.termination(), Some(Termination::Escaped));
        assert_eq!(profile.escaped, 1);

        // the lamp has no material
        let up = Ray::new(Point3::new(0.0, 0.0, 1.0), Vec3::Z);
        let path = trace_eye_path(&world, up, &settings(5, None), &mut sampler, &mut profile);
        assert_eq!(path.len(), 2);
        assert_eq!(path.termination(), Some(Termination::Absorbed));
        assert!(!path[1].backface);
    }

    #[test]
    fn test_backface_flip() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(7);
        let mut profile = Profile::default();
        // hits the lamp from above, against its normal
        let down = Ray::new(Point3::new(0.0, 0.0, 1.8), -Vec3::Z);
        let path = trace_eye_path(&world, down, &settings(2, None), &mut sampler, &mut profile);
        assert!(path[1].backface);
        assert!((path[1].normal - Vec3::Z).norm() < 1e-5);
    }

    #[test]
    fn test_light_path_start() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(8);
        let mut profile = Profile::default();
        let path = trace_light_path(&world, &settings(4, None), &mut sampler, &mut profile);
        let source = path[0];
        assert_eq!(source.vertex_type, VertexType::LightSource);
        assert!((source.point.z() - 1.5).abs() < 1e-5);
        // picked with probability 1 over an area of 0.25
        assert!((source.pdf_forward - 4.0).abs() < 1e-4);
        assert!((source.throughput.r - 1.0).abs() < 1e-4);
        if path.len() > 1 {
            assert_eq!(path[1].vertex_type, VertexType::Light);
            assert!(path[1].point.z() < 1.5);
        }
    }

    #[test]
    fn test_solid_angle_to_area() {
        let a = Vertex::camera(Point3::ORIGIN, Vec3::Z);
        let mut b = Vertex::camera(Point3::new(0.0, 0.0, 2.0), Vec3::Z);
        b.normal = -Vec3::Z;
        assert!((solid_angle_to_area(1.0, &a, &b) - 0.25).abs() < 1e-6);
        assert!((veach_g(a.point, 1.0, b.point, 1.0) - 0.25).abs() < 1e-6);
    }
}
