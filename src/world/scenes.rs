use super::{quad, uv_sphere, Geometry, Light, World};
use crate::error::TransportError;
use crate::materials::{CookTorrance, Lambertian, MaterialId, OrenNayar};
use crate::math::*;

use tracing::info;

/// closed box with red and green side walls, a ceiling lamp and two spheres.
/// spans [-1, 1] in x and y and [0, 2] in z, open toward -y.
pub fn cornell_box() -> Result<World, TransportError> {
    let white = MaterialId(0);
    let red = MaterialId(1);
    let green = MaterialId(2);
    let metal = MaterialId(3);
    let rough = MaterialId(4);

    let walls = [
        ("floor", Point3::new(-1.0, -1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), white),
        ("ceiling", Point3::new(-1.0, -1.0, 2.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(2.0, 0.0, 0.0), white),
        ("back", Point3::new(-1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), white),
        ("left", Point3::new(-1.0, -1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0), red),
        ("right", Point3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 2.0, 0.0), green),
    ];
    let mut geometries = Vec::new();
    for (name, corner, edge_u, edge_v, material) in walls {
        let mut wall = quad(name, corner, edge_u, edge_v)?;
        wall.attach_material(material);
        geometries.push(wall);
    }

    let mut metal_sphere = uv_sphere("metal sphere", Point3::new(-0.4, 0.3, 0.4), 0.4, 24, false)?;
    metal_sphere.attach_material(metal);
    geometries.push(metal_sphere);
    let mut rough_sphere = uv_sphere("rough sphere", Point3::new(0.45, -0.2, 0.35), 0.35, 24, false)?;
    rough_sphere.attach_material(rough);
    geometries.push(rough_sphere);

    let lamp = quad(
        "lamp",
        Point3::new(-0.3, -0.3, 1.98),
        Vec3::new(0.0, 0.6, 0.0),
        Vec3::new(0.6, 0.0, 0.0),
    )?;
    geometries.push(lamp);
    let lamp_id = geometries.len() - 1;

    World::new(
        geometries,
        vec![
            Lambertian::new("white", RGBColor::from(0.73)).into(),
            Lambertian::new("red", RGBColor::new(0.65, 0.05, 0.05)).into(),
            Lambertian::new("green", RGBColor::new(0.12, 0.45, 0.15)).into(),
            CookTorrance::new("metal", RGBColor::new(0.9, 0.8, 0.6), 0.2, 1.5).into(),
            OrenNayar::new("rough", RGBColor::new(0.3, 0.4, 0.8), 0.5).into(),
        ],
        vec![Light::new(lamp_id, RGBColor::from(12.0))],
    )
}

/// looks up a built in scene by name.
pub fn build_scene(name: &str) -> Result<World, TransportError> {
    info!("building scene {:?}", name);
    match name {
        "cornell" | "cornell_box" => cornell_box(),
        _ => Err(TransportError::Configuration(format!(
            "no built in scene named {:?}",
            name
        ))),
    }
}
