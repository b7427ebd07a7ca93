use super::{Geometry, SurfaceSample};
use crate::aabb::AABB;
use crate::error::TransportError;
use crate::hittable::{HasBoundingBox, HitRecord, Hittable};
use crate::materials::MaterialId;
use crate::math::*;
use crate::vec2d::UV;

/// three indices into the vertex arrays of the owning mesh.
pub type Triangle = [u32; 3];

/// triangulated surface with cached bounds and a per-face cumulative area table.
///
/// setters never touch the cached state. call [`TriangleMesh::update`] after mutating
/// vertices or triangles, before sampling or intersecting.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    name: String,
    vertices: Vec<Point3>,
    normals: Vec<Vec3>,
    texcoords: Vec<UV>,
    triangles: Vec<Triangle>,
    material: Option<MaterialId>,
    bounding_box: AABB,
    cum_area: Vec<f32>,
    area: f32,
}

impl TriangleMesh {
    pub fn new(name: impl Into<String>) -> Self {
        TriangleMesh {
            name: name.into(),
            vertices: Vec::new(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            triangles: Vec::new(),
            material: None,
            bounding_box: AABB::empty(),
            cum_area: Vec::new(),
            area: 0.0,
        }
    }

    /// builds and updates a mesh in one go.
    pub fn from_parts(
        name: impl Into<String>,
        vertices: Vec<Point3>,
        normals: Vec<Vec3>,
        texcoords: Vec<UV>,
        triangles: Vec<Triangle>,
    ) -> Result<Self, TransportError> {
        let mut mesh = TriangleMesh::new(name);
        mesh.set_vertices(vertices);
        mesh.set_normals(normals);
        mesh.set_texcoords(texcoords);
        mesh.set_triangles(triangles);
        mesh.update()?;
        Ok(mesh)
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }
    pub fn texcoords(&self) -> &[UV] {
        &self.texcoords
    }
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn set_vertices(&mut self, vertices: Vec<Point3>) {
        self.vertices = vertices;
    }
    pub fn set_normals(&mut self, normals: Vec<Vec3>) {
        self.normals = normals;
    }
    pub fn set_texcoords(&mut self, texcoords: Vec<UV>) {
        self.texcoords = texcoords;
    }
    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) {
        self.triangles = triangles;
    }

    /// cumulative area table, one entry per triangle. the last entry equals the total area.
    pub fn cumulative_areas(&self) -> &[f32] {
        &self.cum_area
    }

    /// validates the arrays and recomputes the bounding box and the cumulative area table.
    /// on error the previously cached state is left untouched.
    pub fn update(&mut self) -> Result<(), TransportError> {
        let vertex_count = self.vertices.len();
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(TransportError::InvalidMesh(format!(
                "{}: {} normals for {} vertices",
                self.name,
                self.normals.len(),
                vertex_count
            )));
        }
        if !self.texcoords.is_empty() && self.texcoords.len() != vertex_count {
            return Err(TransportError::InvalidMesh(format!(
                "{}: {} texcoords for {} vertices",
                self.name,
                self.texcoords.len(),
                vertex_count
            )));
        }

        let mut bounding_box = AABB::empty();
        for point in self.vertices.iter() {
            bounding_box.grow_mut(point);
        }

        let mut cum_area = Vec::with_capacity(self.triangles.len());
        let mut area = 0.0f32;
        for (face, tri) in self.triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(TransportError::InvalidMesh(format!(
                    "{}: triangle {} references vertex {} but only {} exist",
                    self.name, face, bad, vertex_count
                )));
            }
            let [p0, p1, p2] = tri.map(|i| self.vertices[i as usize]);
            let (e0, e1, e2) = (p1 - p0, p2 - p1, p0 - p2);
            if e0.norm_squared() == 0.0 || e1.norm_squared() == 0.0 || e2.norm_squared() == 0.0 {
                return Err(TransportError::DegenerateGeometry(format!(
                    "{}: triangle {} has a zero length edge",
                    self.name, face
                )));
            }
            area += 0.5 * e0.cross(p2 - p0).norm();
            cum_area.push(area);
        }

        self.bounding_box = bounding_box;
        self.cum_area = cum_area;
        self.area = area;
        Ok(())
    }

    /// returns a new, updated mesh with positions and normals mapped through `transform`.
    /// the attached material carries over.
    pub fn transformed(&self, transform: &Transform3) -> Result<TriangleMesh, TransportError> {
        let mut mesh = self.clone();
        mesh.vertices = self
            .vertices
            .iter()
            .map(|p| transform.to_world_point(*p))
            .collect();
        mesh.normals = self
            .normals
            .iter()
            .map(|n| transform.to_world_normal(*n))
            .collect();
        mesh.update()?;
        Ok(mesh)
    }

    fn triangle_points(&self, face: usize) -> [Point3; 3] {
        self.triangles[face].map(|i| self.vertices[i as usize])
    }

    pub fn face_normal(&self, face: usize) -> Vec3 {
        let [p0, p1, p2] = self.triangle_points(face);
        (p1 - p0).cross(p2 - p0).normalized()
    }

    fn shading_normal(&self, face: usize, b0: f32, b1: f32, b2: f32) -> Vec3 {
        if self.normals.is_empty() {
            return self.face_normal(face);
        }
        let [n0, n1, n2] = self.triangles[face].map(|i| self.normals[i as usize]);
        (n0 * b0 + n1 * b1 + n2 * b2).normalized()
    }

    fn interpolated_uv(&self, face: usize, b0: f32, b1: f32, b2: f32) -> UV {
        if self.texcoords.is_empty() {
            return UV(b1, b2);
        }
        let [t0, t1, t2] = self.triangles[face].map(|i| self.texcoords[i as usize]);
        UV(
            t0.0 * b0 + t1.0 * b1 + t2.0 * b2,
            t0.1 * b0 + t1.1 * b1 + t2.1 * b2,
        )
    }

    fn interpolated_point(&self, face: usize, b0: f32, b1: f32, b2: f32) -> Point3 {
        let [p0, p1, p2] = self.triangle_points(face);
        Point3::from(Vec3::from(p0) * b0 + Vec3::from(p1) * b1 + Vec3::from(p2) * b2)
    }

    // Möller-Trumbore. returns (t, b1, b2).
    fn hit_triangle(&self, face: usize, r: &Ray, t0: f32, t1: f32) -> Option<(f32, f32, f32)> {
        let [p0, p1, p2] = self.triangle_points(face);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let pvec = r.direction.cross(e2);
        let det = e1 * pvec;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = r.origin - p0;
        let u = (tvec * pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(e1);
        let v = (r.direction * qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = (e2 * qvec) * inv_det;
        if t <= t0 || t >= t1 {
            return None;
        }
        Some((t, u, v))
    }
}

impl HasBoundingBox for TriangleMesh {
    fn aabb(&self) -> AABB {
        self.bounding_box
    }
}

impl Geometry for TriangleMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn material_id(&self) -> Option<MaterialId> {
        self.material
    }

    fn attach_material(&mut self, id: MaterialId) {
        self.material = Some(id);
    }

    fn sample(&self, sampler: &mut dyn Sampler) -> Result<SurfaceSample, TransportError> {
        if !(self.area > 0.0) || self.cum_area.len() != self.triangles.len() {
            return Err(TransportError::DegenerateGeometry(format!(
                "{}: cannot sample a mesh with total area {}",
                self.name, self.area
            )));
        }
        let draw = sampler.draw_1d().x * self.area;
        // first triangle whose cumulative area strictly exceeds the draw
        let face = self
            .cum_area
            .partition_point(|&c| c <= draw)
            .min(self.triangles.len() - 1);

        let (b0, b1, b2) = uniform_barycentric(sampler.draw_2d());
        Ok(SurfaceSample {
            point: self.interpolated_point(face, b0, b1, b2),
            normal: self.shading_normal(face, b0, b1, b2),
            area_pdf: 1.0 / self.area,
        })
    }

    fn surface_area(&self) -> f32 {
        self.area
    }
}

impl Hittable for TriangleMesh {
    fn hit(&self, r: Ray, t0: f32, t1: f32) -> Option<HitRecord> {
        let (_, box_t1) = self.bounding_box.hit(&r, t0, t1)?;
        // the slab interval is only a bound, keep its far end slightly open for rounding
        let mut closest = (box_t1 * (1.0 + 1e-5) + 1e-5).min(t1);
        let mut found: Option<(usize, f32, f32)> = None;
        for face in 0..self.triangles.len() {
            if let Some((t, u, v)) = self.hit_triangle(face, &r, t0, closest) {
                closest = t;
                found = Some((face, u, v));
            }
        }
        let (face, b1, b2) = found?;
        let b0 = 1.0 - b1 - b2;
        Some(HitRecord::new(
            closest,
            self.interpolated_point(face, b0, b1, b2),
            self.interpolated_uv(face, b0, b1, b2),
            self.shading_normal(face, b0, b1, b2),
            self.material,
            0,
        ))
    }
}
