use std::ops::Index;

use crate::integrator::utils::*;
use crate::integrator::MisHeuristic;
use crate::materials::Material;
use crate::math::*;
use crate::profile::Profile;
use crate::world::World;

/// the full path made by joining the first `s` light vertices to the first `t` eye vertices.
///
/// indices run from the light end: `path[0]` is on the light, `path[s + t - 1]` is the camera.
pub struct CombinedPath<'a> {
    pub light_path: &'a [Vertex],
    pub eye_path: &'a [Vertex],
    pub connection_index: usize,
    pub path_length: usize,
}

fn emits(world: &World, vertex: &Vertex) -> bool {
    match vertex.vertex_type {
        VertexType::LightSource => true,
        _ => {
            !vertex.backface
                && vertex
                    .geometry_id
                    .is_some_and(|id| world.light_for_geometry(id).is_some())
        }
    }
}

impl<'a> CombinedPath<'a> {
    pub fn new(light_path: &'a [Vertex], s: usize, eye_path: &'a [Vertex], t: usize) -> Self {
        debug_assert!(s <= light_path.len() && t <= eye_path.len());
        CombinedPath {
            light_path,
            eye_path,
            connection_index: s,
            path_length: s + t,
        }
    }

    fn direction(&self, from: usize, to: usize) -> Vec3 {
        (self[to].point - self[from].point).normalized()
    }

    // solid angle density of scattering at `at` toward `incoming_from`, leaving toward `outgoing_to`
    fn scatter_pdf(&self, world: &World, at: usize, outgoing_to: usize, incoming_from: usize) -> f32 {
        let vertex = &self[at];
        match vertex.material_id {
            Some(id) => world.get_material(id).pdf(
                vertex.uv,
                vertex.normal,
                self.direction(at, outgoing_to),
                self.direction(at, incoming_from),
            ),
            None => 0.0,
        }
    }

    /// area density of producing vertex `i` by sampling from the light end.
    pub fn pdf_light(&self, world: &World, i: usize) -> f32 {
        if i < self.connection_index {
            let vertex = &self[i];
            return if i == 0 {
                vertex.pdf_forward
            } else {
                solid_angle_to_area(vertex.pdf_forward, &self[i - 1], vertex)
            };
        }
        match i {
            0 => {
                let vertex = &self[0];
                match vertex.geometry_id {
                    Some(id) if !vertex.backface => world.light_area_pdf(id),
                    _ => 0.0,
                }
            }
            1 => {
                let source = &self[0];
                if !emits(world, source) {
                    return 0.0;
                }
                let cos = source.normal * self.direction(0, 1);
                if cos <= 0.0 {
                    return 0.0;
                }
                solid_angle_to_area(cos / PI, source, &self[1])
            }
            _ => solid_angle_to_area(
                self.scatter_pdf(world, i - 1, i - 2, i),
                &self[i - 1],
                &self[i],
            ),
        }
    }

    /// area density of producing vertex `i` by sampling from the camera end.
    pub fn pdf_eye(&self, world: &World, i: usize) -> f32 {
        if i + 1 >= self.path_length {
            return 1.0;
        }
        if i >= self.connection_index {
            let vertex = &self[i];
            return solid_angle_to_area(vertex.pdf_forward, &self[i + 1], vertex);
        }
        solid_angle_to_area(
            self.scatter_pdf(world, i + 1, i + 2, i),
            &self[i + 1],
            &self[i],
        )
    }
}

impl<'a> Index<usize> for CombinedPath<'a> {
    type Output = Vertex;
    fn index(&self, index: usize) -> &Self::Output {
        if index < self.connection_index {
            &self.light_path[index]
        } else {
            &self.eye_path[self.path_length - index - 1]
        }
    }
}

/// contribution of the path made by connecting `light_path[s - 1]` to `eye_path[t - 1]`,
/// before any strategy weighting. `s == 0` means the eye path found the light by itself.
pub fn eval_unweighted_contribution(
    world: &World,
    light_path: &[Vertex],
    s: usize,
    eye_path: &[Vertex],
    t: usize,
    profile: &mut Profile,
) -> RGBColor {
    debug_assert!(t >= 1);
    let eye_vertex = &eye_path[t - 1];
    if s == 0 {
        return match eye_vertex.geometry_id {
            Some(id) if !eye_vertex.backface => {
                eye_vertex.throughput * world.emission(id, eye_vertex.normal, eye_vertex.wi)
            }
            _ => RGBColor::ZERO,
        };
    }
    if !eye_vertex.is_surface() {
        // the pinhole cannot be connected to
        return RGBColor::ZERO;
    }

    let light_vertex = &light_path[s - 1];
    let d = eye_vertex.point - light_vertex.point;
    let distance = d.norm();
    if !(distance > 0.0) {
        return RGBColor::ZERO;
    }
    let direction = d / distance;

    let light_side = if s == 1 {
        // lambertian emitter, its cosine lives in the geometry term
        if light_vertex.normal * direction > 0.0 {
            RGBColor::ONE
        } else {
            RGBColor::ZERO
        }
    } else {
        match light_vertex.material_id {
            Some(id) => world.get_material(id).eval(
                light_vertex.uv,
                light_vertex.normal,
                light_vertex.wi,
                direction,
            ),
            None => RGBColor::ZERO,
        }
    };
    if light_side.is_zero() {
        return RGBColor::ZERO;
    }

    let eye_side = match eye_vertex.material_id {
        Some(id) => world.get_material(id).eval(
            eye_vertex.uv,
            eye_vertex.normal,
            eye_vertex.wi,
            -direction,
        ),
        None => RGBColor::ZERO,
    };
    if eye_side.is_zero() {
        return RGBColor::ZERO;
    }

    let g = veach_g(
        light_vertex.point,
        light_vertex.normal * direction,
        eye_vertex.point,
        eye_vertex.normal * direction,
    );
    if !(g > 0.0) || !g.is_finite() {
        return RGBColor::ZERO;
    }
    if !veach_v(world, light_vertex, eye_vertex, profile) {
        return RGBColor::ZERO;
    }
    light_vertex.throughput * light_side * eye_side * eye_vertex.throughput * g
}

/// weight of strategy `(s, t)` among every strategy that could build the same vertex sequence.
///
/// strategies with fewer than two eye vertices are impossible with a pinhole camera. the
/// densities of the others are chained relative to this one, see veach (1997) eq. 10.9.
pub fn eval_mis(
    world: &World,
    light_path: &[Vertex],
    s: usize,
    eye_path: &[Vertex],
    t: usize,
    heuristic: MisHeuristic,
) -> f32 {
    if t < 2 {
        return 0.0;
    }
    let path = CombinedPath::new(light_path, s, eye_path, t);
    let n = path.path_length;
    let mut sum = 1.0;

    // strategies with more light vertices, up to two eye vertices
    let mut ratio = 1.0;
    for i in s..n - 2 {
        let denominator = path.pdf_eye(world, i);
        ratio = if denominator > 0.0 {
            ratio * path.pdf_light(world, i) / denominator
        } else {
            0.0
        };
        sum += heuristic.apply(ratio);
    }

    // strategies with fewer light vertices
    let mut ratio = 1.0;
    for i in (0..s).rev() {
        let denominator = path.pdf_light(world, i);
        ratio = if denominator > 0.0 {
            ratio * path.pdf_eye(world, i) / denominator
        } else {
            0.0
        };
        sum += heuristic.apply(ratio);
    }

    if sum.is_finite() {
        1.0 / sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::world::test::corner_scene;

    fn walk(max_vertices: usize) -> WalkSettings {
        WalkSettings {
            max_vertices,
            roulette: None,
        }
    }

    fn camera_ray() -> Ray {
        Ray::new(
            Point3::new(0.0, -2.5, 0.8),
            (Point3::new(0.1, 1.0, 0.5) - Point3::new(0.0, -2.5, 0.8)).normalized(),
        )
    }

    #[test]
    fn test_combined_path_indexing() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(11);
        let mut profile = Profile::default();
        let eye = trace_eye_path(&world, camera_ray(), &walk(3), &mut sampler, &mut profile);
        let light = trace_light_path(&world, &walk(3), &mut sampler, &mut profile);
        let (s, t) = (light.len().min(2), eye.len());
        let path = CombinedPath::new(light.vertices(), s, eye.vertices(), t);
        assert_eq!(path[0].vertex_type, VertexType::LightSource);
        assert_eq!(path[s + t - 1].vertex_type, VertexType::Camera);
        if t > 1 {
            assert_eq!(path[s].point, eye[t - 1].point);
        }
    }

    /// `vertex` as if the camera path had reached it from `previous`.
    fn as_eye_vertex(world: &World, vertex: &Vertex, previous: &Vertex) -> Vertex {
        let mut out = *vertex;
        let geometric = if vertex.backface {
            -vertex.normal
        } else {
            vertex.normal
        };
        out.vertex_type = VertexType::Eye;
        out.wi = (previous.point - vertex.point).normalized();
        out.backface = geometric * out.wi < 0.0;
        out.normal = if out.backface { -geometric } else { geometric };
        let material = world.get_material(previous.material_id.unwrap());
        out.pdf_forward = material.pdf(previous.uv, previous.normal, previous.wi, -out.wi);
        out
    }

    #[test]
    fn test_weights_sum_to_one() {
        // lamp, floor, wall, camera: built as (2, 2), (1, 3) and (0, 4)
        let world = corner_scene();
        let mut sampler = RandomSampler::new(12);
        let mut profile = Profile::default();
        let heuristic = MisHeuristic::default();
        let mut checked = 0;
        for _ in 0..400 {
            let eye = trace_eye_path(&world, camera_ray(), &walk(2), &mut sampler, &mut profile);
            let light = trace_light_path(&world, &walk(2), &mut sampler, &mut profile);
            if eye.len() < 2 || light.len() < 2 || light[1].geometry_id != Some(0) {
                continue;
            }
            let floor = as_eye_vertex(&world, &light[1], &eye[1]);
            let lamp = as_eye_vertex(&world, &light[0], &floor);
            assert!(!floor.backface && !lamp.backface);

            let w2 = eval_mis(&world, light.vertices(), 2, &[eye[0], eye[1]], 2, heuristic);
            let w1 = eval_mis(
                &world,
                light.vertices(),
                1,
                &[eye[0], eye[1], floor],
                3,
                heuristic,
            );
            let w0 = eval_mis(
                &world,
                light.vertices(),
                0,
                &[eye[0], eye[1], floor, lamp],
                4,
                heuristic,
            );
            assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0, "{} {} {}", w0, w1, w2);
            approx::assert_relative_eq!(w0 + w1 + w2, 1.0, max_relative = 1e-3);
            checked += 1;
        }
        assert!(checked > 10, "{}", checked);
    }

    #[test]
    fn test_no_weight_without_two_eye_vertices() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(13);
        let mut profile = Profile::default();
        let eye = trace_eye_path(&world, camera_ray(), &walk(3), &mut sampler, &mut profile);
        let light = trace_light_path(&world, &walk(3), &mut sampler, &mut profile);
        assert_eq!(
            eval_mis(&world, light.vertices(), 1, eye.vertices(), 1, MisHeuristic::default()),
            0.0
        );
    }

    #[test]
    fn test_direct_hit_on_lamp() {
        let world = corner_scene();
        let mut sampler = RandomSampler::new(14);
        let mut profile = Profile::default();
        let up = Ray::new(Point3::new(0.0, 0.0, 1.0), Vec3::Z);
        let eye = trace_eye_path(&world, up, &walk(3), &mut sampler, &mut profile);
        let c = eval_unweighted_contribution(&world, &[], 0, eye.vertices(), 2, &mut profile);
        assert_eq!(c, RGBColor::from(4.0));
        // a two vertex path has exactly one strategy
        assert_eq!(
            eval_mis(&world, &[], 0, eye.vertices(), 2, MisHeuristic::default()),
            1.0
        );
    }
}
