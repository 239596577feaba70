//! The shop room: floor, walls, shelves, plants, labels, lights and camera

use std::f32::consts::FRAC_PI_2;

use cgmath::{Deg, Vector3, Zero};
use rand::Rng;

use crate::gfx::{
    camera::OrbitCamera,
    geometry::{generate_box, generate_plane},
    resources::material::Material,
    scene::{AmbientLight, Lights, Object, PointLight, Scene},
    text::{generate_text, Font, TextOptions},
};

use super::placer::{add_plant, PlacementSpec, PlantMeshes};

pub const BACKGROUND: u32 = 0xf0f0f0;

/// A titled shelf on the back wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shelf {
    pub title: &'static str,
    pub position: [f32; 3],
    pub label_position: [f32; 3],
}

pub const SHELVES: [Shelf; 3] = [
    Shelf {
        title: "Computer Science",
        position: [-6.0, 3.0, -8.0],
        label_position: [-7.0, 4.0, -9.0],
    },
    Shelf {
        title: "Engineering",
        position: [0.0, 3.0, -8.0],
        label_position: [-1.0, 4.0, -9.0],
    },
    Shelf {
        title: "Tech Enthusiast",
        position: [6.0, 3.0, -8.0],
        label_position: [5.0, 4.0, -9.0],
    },
];

/// Floor-standing plants in addition to one per shelf
pub const FLOOR_PLANTS: [[f32; 3]; 4] = [
    [-4.0, 0.0, -5.0],
    [4.0, 0.0, -5.0],
    [-2.0, 0.0, 2.0],
    [2.0, 0.0, 2.0],
];

pub const LABEL_ROTATION_Y: f32 = 0.2;
pub const LABEL_OPTIONS: TextOptions = TextOptions {
    size: 0.5,
    depth: 0.1,
};

/// Every plant anchor: shelves first, then the floor
pub fn plant_anchors() -> impl Iterator<Item = [f32; 3]> {
    SHELVES
        .iter()
        .map(|shelf| shelf.position)
        .chain(FLOOR_PLANTS)
}

pub fn shop_lights() -> Lights {
    Lights {
        ambient: AmbientLight::from_hex(0xffffff, 0.6),
        point: PointLight::from_hex(0xffd700, 1.0, 50.0)
            .with_position(0.0, 10.0, 0.0)
            .with_shadow(true),
    }
}

/// The starting view: 75 degree perspective from (0, 5, 10) at the origin
pub fn shop_camera(aspect: f32) -> OrbitCamera {
    OrbitCamera::from_eye(Vector3::new(0.0, 5.0, 10.0), Vector3::zero(), aspect)
        .with_fovy(Deg(75.0_f32))
        .with_clip(0.1, 1000.0)
}

/// Floor and three walls, all receiving shadows
pub fn build_room(scene: &mut Scene) {
    scene.add_material(Material::from_hex("floor", 0x8b4513));
    scene.add_material(Material::from_hex("wall", 0xffdab9));

    scene.add_object(
        Object::from_geometry("floor", &generate_plane(20.0, 20.0, 1, 1))
            .with_rotation(-FRAC_PI_2, 0.0, 0.0)
            .with_material("floor")
            .with_shadows(false, true),
    );

    let wall = generate_plane(20.0, 10.0, 1, 1);
    let walls = [
        ("back wall", [0.0, 5.0, -10.0], 0.0),
        ("left wall", [-10.0, 5.0, 0.0], FRAC_PI_2),
        ("right wall", [10.0, 5.0, 0.0], -FRAC_PI_2),
    ];
    for (name, [x, y, z], yaw) in walls {
        scene.add_object(
            Object::from_geometry(name, &wall)
                .with_position(x, y, z)
                .with_rotation(0.0, yaw, 0.0)
                .with_material("wall")
                .with_shadows(false, true),
        );
    }
}

pub fn build_shelves(scene: &mut Scene) {
    scene.add_material(Material::from_hex("shelf", 0x654321));

    let board = generate_box(4.0, 0.2, 2.0);
    for shelf in &SHELVES {
        let [x, y, z] = shelf.position;
        scene.add_object(
            Object::from_geometry(format!("{} shelf", shelf.title), &board)
                .with_position(x, y, z)
                .with_material("shelf")
                .with_shadows(true, true),
        );
    }
}

pub fn build_plants<R: Rng + ?Sized>(scene: &mut Scene, rng: &mut R) {
    let meshes = PlantMeshes::default();
    for [x, y, z] in plant_anchors() {
        add_plant(scene, &meshes, &PlacementSpec::at(x, y, z), rng);
    }
}

/// Builds everything that does not depend on the font
pub fn build_shop<R: Rng + ?Sized>(scene: &mut Scene, rng: &mut R) {
    scene.set_background_hex(BACKGROUND);
    scene.set_lights(shop_lights());
    build_room(scene);
    build_shelves(scene);
    build_plants(scene, rng);
    log::debug!("Shop built with {} objects", scene.get_object_count());
}

/// Adds one extruded title per shelf and returns how many were added
pub fn add_shelf_labels(scene: &mut Scene, font: &Font) -> usize {
    scene.add_material(Material::from_hex("label", 0x333333));

    let mut added = 0;
    for shelf in &SHELVES {
        let geometry = generate_text(font, shelf.title, &LABEL_OPTIONS);
        if geometry.triangle_count() == 0 {
            log::warn!("Label {:?} produced no geometry", shelf.title);
            continue;
        }
        let [x, y, z] = shelf.label_position;
        scene.add_object(
            Object::from_geometry(format!("{} label", shelf.title), &geometry)
                .with_position(x, y, z)
                .with_rotation(0.0, LABEL_ROTATION_Y, 0.0)
                .with_material("label")
                .with_shadows(false, false),
        );
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::camera_utils::Camera;
    use cgmath::InnerSpace;
    use rand::{rngs::StdRng, SeedableRng};

    fn shop() -> Scene {
        let mut scene = Scene::new();
        build_shop(&mut scene, &mut StdRng::seed_from_u64(3));
        scene
    }

    #[test]
    fn test_shop_object_count() {
        let scene = shop();
        // floor + 3 walls + 3 shelves + 7 plants * 5 parts
        assert_eq!(scene.get_object_count(), 42);
        assert_eq!(plant_anchors().count(), 7);
    }

    #[test]
    fn test_room_receives_shadows() {
        let scene = shop();
        for name in ["floor", "back wall", "left wall", "right wall"] {
            let object = scene.find_object(name).unwrap();
            assert!(object.receive_shadow);
            assert!(!object.cast_shadow);
        }
        let shelf = scene.find_object("Engineering shelf").unwrap();
        assert!(shelf.cast_shadow && shelf.receive_shadow);
    }

    #[test]
    fn test_lights() {
        let lights = shop_lights();
        assert_eq!(lights.ambient.intensity, 0.6);
        assert_eq!(lights.point.position, [0.0, 10.0, 0.0]);
        assert_eq!(lights.point.range, 50.0);
        assert!(lights.point.cast_shadow);
    }

    #[test]
    fn test_camera_start() {
        let camera = shop_camera(1.5);
        assert!((camera.eye - Vector3::new(0.0, 5.0, 10.0)).magnitude2() < 1e-8);
        assert!((camera.fovy.0 - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.zfar, 1000.0);
        // Target projects to the centre of the screen
        let clip = camera.build_view_projection_matrix() * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5 && (clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn test_labels_added_after_font_load() {
        let font = Font::from_json(
            r#"{
                "resolution": 1000,
                "boundingBox": { "yMin": -200, "yMax": 800 },
                "glyphs": { "?": { "ha": 600, "o": "m 0 0 l 500 0 l 500 700 l 0 700" } }
            }"#,
        )
        .unwrap();

        let mut scene = shop();
        let revision = scene.revision();
        assert_eq!(add_shelf_labels(&mut scene, &font), 3);
        assert_eq!(scene.get_object_count(), 45);
        assert!(scene.revision() > revision);

        let label = scene.find_object("Engineering label").unwrap();
        assert_eq!(label.position(), Vector3::new(-1.0, 4.0, -9.0));
        assert_eq!(label.transform.rotation.y, LABEL_ROTATION_Y);
    }

    #[test]
    fn test_empty_font_adds_no_labels() {
        let font = Font::from_json(r#"{ "glyphs": {} }"#).unwrap();
        let mut scene = shop();
        assert_eq!(add_shelf_labels(&mut scene, &font), 0);
        assert_eq!(scene.get_object_count(), 42);
    }
}
