//! # Scene Management Module
//!
//! The retained scene graph: objects with meshes and transforms, the
//! material library and the lights.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container. Explicitly owned and passed by reference
//! - [`Object`] - Individual 3D objects with meshes, materials, and transforms
//! - [`Lights`] - Ambient plus point light
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```
//! use plantshop::gfx::geometry::generate_box;
//! use plantshop::gfx::scene::{Object, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add_object(
//!     Object::from_geometry("shelf", &generate_box(4.0, 0.2, 2.0))
//!         .with_position(0.0, 3.0, -8.0)
//!         .with_shadows(true, true),
//! );
//! assert_eq!(scene.get_object_count(), 1);
//! ```

pub mod lights;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use lights::{AmbientLight, Lights, PointLight};
pub use object::{DrawObject, Mesh, Object, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
