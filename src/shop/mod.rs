//! The plant shop scene content

pub mod layout;
pub mod placer;

pub use layout::{add_shelf_labels, build_shop, shop_camera, shop_lights};
pub use placer::{add_plant, place, PlacedPart, PlacementSpec, PlantMeshes, PlantPart};
