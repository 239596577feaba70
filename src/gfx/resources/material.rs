//! Material system for standard (metallic/roughness) shading
//!
//! Provides material definitions and centralized management with GPU resource handling.
//! Materials are stored in MaterialManager and objects reference them by ID.

use std::collections::HashMap;
use wgpu::Device;

use crate::{
    gfx::color::hex_to_linear,
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials. MUST match `MaterialUniform` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding0: [f32; 2],
    pub emissive: [f32; 3],
    _padding1: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

struct MaterialGpuResources {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Material definition with standard PBR properties
///
/// Colours are stored in linear space. Materials are shared between
/// objects, so one GPU uniform serves every object that uses it.
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    gpu: Option<MaterialGpuResources>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            emissive: [0.0, 0.0, 0.0],
            gpu: None,
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - Linear RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Fully rough dielectric from an sRGB hex colour
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [r, g, b] = hex_to_linear(hex);
        Self::new(name, [r, g, b, 1.0], 0.0, 1.0)
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            _padding0: [0.0; 2],
            emissive: self.emissive,
            _padding1: 0.0,
        }
    }

    /// Creates the uniform on first use and syncs current values
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.uniform();
        match self.gpu.as_mut() {
            Some(gpu) => gpu.ubo.update_content(queue, uniform),
            None => {
                let ubo = MaterialUBO::new_with_data(device, &uniform);
                let bind_group = BindGroupBuilder::new(layout)
                    .resource(ubo.binding_resource())
                    .create(device, &format!("Material Bind Group: {}", self.name));
                self.gpu = Some(MaterialGpuResources { ubo, bind_group });
            }
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials in the scene
///
/// Objects reference materials by ID rather than storing material data
/// directly, so GPU resources are shared between objects.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();

        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            default_material_id,
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> &Material {
        // The default entry is inserted in `new` and never removed
        &self.materials[&self.default_material_id]
    }

    /// Gets material for an object with fallback to default
    ///
    /// Unassigned or unknown material IDs resolve to the default material.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_always_present() {
        let manager = MaterialManager::new();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get_default_material().name, "default");
    }

    #[test]
    fn test_lookup_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::from_hex("leaf", 0x32cd32));

        let leaf = "leaf".to_string();
        let missing = "missing".to_string();
        assert_eq!(manager.get_material_for_object(Some(&leaf)).name, "leaf");
        assert_eq!(manager.get_material_for_object(Some(&missing)).name, "default");
        assert_eq!(manager.get_material_for_object(None).name, "default");
    }

    #[test]
    fn test_from_hex_is_linear_and_rough() {
        let wall = Material::from_hex("wall", 0xffffff);
        assert_eq!(wall.base_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(wall.metallic, 0.0);
        assert_eq!(wall.roughness, 1.0);
    }

    #[test]
    fn test_factors_are_clamped() {
        let m = Material::new("m", [1.0; 4], 2.0, -1.0);
        assert_eq!(m.metallic, 1.0);
        assert_eq!(m.roughness, 0.0);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }
}
