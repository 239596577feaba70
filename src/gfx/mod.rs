//! # Graphics Module
//!
//! Everything needed to turn a [`Scene`] into pixels.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera with damped mouse controls
//! - **Geometry** ([`geometry`]) - Procedural planes, boxes, cylinders and spheres
//! - **Text** ([`text`]) - Extruded labels from typeface JSON fonts
//! - **Scene Management** ([`scene`]) - Objects, lights and the scene container
//! - **Resource Management** ([`resources`]) - Materials, depth targets and bind groups
//! - **Rendering Pipeline** ([`rendering`]) - Shadow pass plus lit forward pass
//!
//! ## Usage
//!
//! ```no_run
//! use plantshop::gfx::{geometry::generate_box, scene::{Object, Scene}};
//!
//! let mut scene = Scene::new();
//! scene.add_object(Object::from_geometry("shelf", &generate_box(4.0, 0.2, 2.0)));
//! // The render engine is created by the app once a window exists:
//! // let engine = RenderEngine::new(window, width, height, options).await?;
//! ```
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod color;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod text;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
