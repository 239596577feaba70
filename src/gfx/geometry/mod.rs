//! # Procedural Geometry Generation
//!
//! Functions that generate the primitive shapes the scene is built from, so no
//! external model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Plane**: flat rectangle in the XY plane facing +Z
//! - **Box**: axis-aligned box with per-face normals
//! - **Cylinder**: Y-aligned cylinder or cone frustum with caps
//! - **Sphere**: UV sphere
//!
//! All generators use a Y-up coordinate system and counter-clockwise front faces.
//!
//! ## Usage
//!
//! ```rust
//! use plantshop::gfx::geometry::{generate_box, generate_cylinder, generate_sphere};
//!
//! let shelf = generate_box(4.0, 0.2, 2.0);
//! let pot = generate_cylinder(0.5, 0.5, 1.0, 32);
//! let leaf = generate_sphere(0.4, 32, 32);
//! assert_eq!(shelf.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }

    /// Converts into the interleaved vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}
