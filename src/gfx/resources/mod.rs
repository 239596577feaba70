//! GPU resource management
//!
//! Handles depth targets, materials, and the global bind groups.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, ShadowBindings};
pub use material::{Material, MaterialManager};
pub use texture_resource::TextureResource;
