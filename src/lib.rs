// src/lib.rs
//! Plant Shop
//!
//! A decorative 3D plant shop scene rendered with wgpu and winit. Shelves,
//! potted plants and extruded shelf labels are built once at startup and
//! viewed through an orbit camera.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod shop;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::{run, PlantShopApp};
pub use config::ShopConfig;
pub use error::RenderError;
