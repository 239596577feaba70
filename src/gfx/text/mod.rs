//! # Text Geometry
//!
//! Turns strings into extruded meshes using typeface JSON fonts: outlines
//! are flattened, split into solids and holes, triangulated and extruded.
//!
//! ```no_run
//! use plantshop::gfx::text::{generate_text, Font, TextOptions};
//!
//! let font = Font::load("./fonts/helvetiker_regular.typeface.json")?;
//! let label = generate_text(&font, "Engineering", &TextOptions { size: 0.5, depth: 0.1 });
//! assert!(label.triangle_count() > 0);
//! # Ok::<(), plantshop::gfx::text::FontError>(())
//! ```

pub mod font;
pub mod shape;
pub mod text_geometry;
pub mod triangulate;

pub use font::{Font, FontError, Glyph};
pub use text_geometry::{generate_text, TextOptions};
