// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, shadow caching, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod shadow_cache;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, RenderOptions};
pub use shadow_cache::ShadowCache;
