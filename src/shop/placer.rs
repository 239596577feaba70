//! Decorative plant placement
//!
//! A plant is a pot, a stem and a column of jittered leaves stacked on an
//! anchor point. [`place`] computes the positions; [`add_plant`] turns them
//! into scene objects.

use cgmath::Vector3;
use rand::Rng;

use crate::gfx::{
    geometry::{generate_cylinder, generate_sphere, GeometryData},
    resources::material::Material,
    scene::{Object, Scene},
};

/// Leaves per plant in the shop
pub const DEFAULT_LEAF_COUNT: usize = 3;
/// Maximum horizontal leaf offset on each axis
pub const LEAF_JITTER: f32 = 0.25;
/// Vertical gap between consecutive leaves
pub const LEAF_SPACING: f32 = 0.5;

pub const POT_HEIGHT: f32 = 1.0;
pub const STEM_HEIGHT: f32 = 2.0;

const POT_MATERIAL: &str = "terracotta";
const STEM_MATERIAL: &str = "stem";
const LEAF_MATERIAL: &str = "leaf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantPart {
    Pot,
    Stem,
    Leaf(usize),
}

/// Where one part of a plant goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPart {
    pub kind: PlantPart,
    pub position: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSpec {
    /// Point the pot stands on
    pub anchor: Vector3<f32>,
    pub leaf_count: usize,
}

impl PlacementSpec {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            anchor: Vector3::new(x, y, z),
            leaf_count: DEFAULT_LEAF_COUNT,
        }
    }

    pub fn with_leaf_count(mut self, leaf_count: usize) -> Self {
        self.leaf_count = leaf_count;
        self
    }
}

/// Computes part positions for one plant: pot, stem, then leaves by index
///
/// The pot centre sits `POT_HEIGHT / 2` above the anchor and the stem centre
/// `STEM_HEIGHT` above it. Leaf `i` is at height `STEM_HEIGHT + i *
/// LEAF_SPACING`, offset on X and Z by independent draws from
/// `[-LEAF_JITTER, LEAF_JITTER)`.
pub fn place<R: Rng + ?Sized>(spec: &PlacementSpec, rng: &mut R) -> Vec<PlacedPart> {
    let anchor = spec.anchor;
    let mut parts = Vec::with_capacity(2 + spec.leaf_count);

    parts.push(PlacedPart {
        kind: PlantPart::Pot,
        position: anchor + Vector3::new(0.0, POT_HEIGHT * 0.5, 0.0),
    });
    parts.push(PlacedPart {
        kind: PlantPart::Stem,
        position: anchor + Vector3::new(0.0, STEM_HEIGHT, 0.0),
    });

    for i in 0..spec.leaf_count {
        let dx = rng.random_range(-LEAF_JITTER..LEAF_JITTER);
        let dz = rng.random_range(-LEAF_JITTER..LEAF_JITTER);
        parts.push(PlacedPart {
            kind: PlantPart::Leaf(i),
            position: Vector3::new(
                anchor.x + dx,
                anchor.y + STEM_HEIGHT + i as f32 * LEAF_SPACING,
                anchor.z + dz,
            ),
        });
    }

    parts
}

/// Meshes shared by every plant
pub struct PlantMeshes {
    pot: GeometryData,
    stem: GeometryData,
    leaf: GeometryData,
}

impl Default for PlantMeshes {
    fn default() -> Self {
        Self {
            pot: generate_cylinder(0.5, 0.5, POT_HEIGHT, 32),
            stem: generate_cylinder(0.1, 0.1, STEM_HEIGHT, 32),
            leaf: generate_sphere(0.4, 32, 32),
        }
    }
}

impl PlantMeshes {
    fn part(&self, kind: PlantPart) -> (&GeometryData, &'static str, &'static str) {
        match kind {
            PlantPart::Pot => (&self.pot, "pot", POT_MATERIAL),
            PlantPart::Stem => (&self.stem, "stem", STEM_MATERIAL),
            PlantPart::Leaf(_) => (&self.leaf, "leaf", LEAF_MATERIAL),
        }
    }
}

/// Places a plant and adds its parts to `scene`, returning object indices
///
/// Every part casts shadows. Only `scene` is modified and nothing added is
/// ever removed.
pub fn add_plant<R: Rng + ?Sized>(
    scene: &mut Scene,
    meshes: &PlantMeshes,
    spec: &PlacementSpec,
    rng: &mut R,
) -> Vec<usize> {
    scene.add_material(Material::from_hex(POT_MATERIAL, 0x8b4513));
    scene.add_material(Material::from_hex(STEM_MATERIAL, 0x228b22));
    scene.add_material(Material::from_hex(LEAF_MATERIAL, 0x32cd32));

    place(spec, rng)
        .into_iter()
        .map(|part| {
            let (geometry, name, material) = meshes.part(part.kind);
            let p = part.position;
            let object = Object::from_geometry(name, geometry)
                .with_position(p.x, p.y, p.z)
                .with_material(material)
                .with_shadows(true, false);
            scene.add_object(object)
        })
        .collect()
}
