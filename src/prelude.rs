//! # Plant Shop Prelude
//!
//! Commonly used types for building and viewing a shop scene.
//!
//! ```
//! use plantshop::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut scene = Scene::new();
//! let mut rng = StdRng::seed_from_u64(7);
//! let spec = PlacementSpec::at(0.0, 0.0, 0.0);
//! add_plant(&mut scene, &PlantMeshes::default(), &spec, &mut rng);
//! assert_eq!(scene.get_object_count(), 5);
//! ```

pub use crate::app::{run, AppEvent, PlantShopApp};
pub use crate::config::ShopConfig;
pub use crate::gfx::{
    camera::{CameraController, CameraManager, OrbitCamera},
    geometry::{generate_box, generate_cylinder, generate_plane, generate_sphere, GeometryData},
    rendering::{RenderEngine, RenderOptions},
    resources::Material,
    scene::{Lights, Object, PointLight, Scene},
    text::{generate_text, Font, TextOptions},
};
pub use crate::shop::{
    add_plant, build_shop, place, PlacedPart, PlacementSpec, PlantMeshes, PlantPart,
};

pub use cgmath::{Deg, Rad, Vector3};
