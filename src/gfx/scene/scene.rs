use wgpu::Device;

use crate::{
    gfx::{
        color::hex_to_linear,
        resources::material::{Material, MaterialManager},
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

use super::{lights::Lights, object::Object};

/// Main scene containing objects, materials and lights
///
/// The scene is owned by the application and passed by reference to
/// whatever populates it. Every structural change bumps `revision`, which
/// the renderer uses to decide when the shadow map is stale.
pub struct Scene {
    /// Linear RGB clear colour
    pub background: [f32; 3],
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager, // Centralized material storage
    pub lights: Lights,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            lights: Lights::default(),
            revision: 0,
        }
    }

    pub fn set_background_hex(&mut self, hex: u32) {
        self.background = hex_to_linear(hex);
    }

    /// Adds an object and returns its index
    ///
    /// Names are made unique by appending a counter.
    pub fn add_object(&mut self, mut object: Object) -> usize {
        let unique = self.ensure_unique_name(&object.name);
        object.set_name(unique);
        self.objects.push(object);
        self.revision += 1;
        self.objects.len() - 1
    }

    /// Adds a material unless one with the same name already exists
    pub fn add_material(&mut self, material: Material) {
        if !self.material_manager.contains(&material.name) {
            self.material_manager.add_material(material);
        }
    }

    pub fn set_lights(&mut self, lights: Lights) {
        self.lights = lights;
        self.revision += 1;
    }

    /// Monotonic counter of structural changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Initializes GPU resources for objects and materials that lack them
    ///
    /// Must be called after the GPU context is available and again after
    /// objects are added, before the next frame is rendered.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        object_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, object_layout);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    /// Syncs every object transform to its GPU uniform
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.update_transform(queue);
        }
    }

    /// Returns the material assigned to the object, or the default material
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.len(),
            total_triangles: self.objects.iter().map(Object::triangle_count).sum(),
            total_vertices: self
                .objects
                .iter()
                .map(|obj| obj.meshes.iter().map(|m| m.vertex_count).sum::<u32>())
                .sum(),
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    fn cube(name: &str) -> Object {
        Object::from_geometry(name, &generate_box(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_add_object_bumps_revision() {
        let mut scene = Scene::new();
        assert_eq!(scene.revision(), 0);
        let index = scene.add_object(cube("shelf"));
        assert_eq!(index, 0);
        assert_eq!(scene.revision(), 1);
        assert_eq!(scene.get_object_count(), 1);
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let mut scene = Scene::new();
        scene.add_object(cube("leaf"));
        scene.add_object(cube("leaf"));
        scene.add_object(cube("leaf"));
        assert_eq!(scene.get_object_names(), vec!["leaf", "leaf (1)", "leaf (2)"]);
        assert!(scene.find_object("leaf (2)").is_some());
    }

    #[test]
    fn test_add_material_keeps_first_definition() {
        let mut scene = Scene::new();
        scene.add_material(Material::from_hex("wood", 0x654321));
        scene.add_material(Material::from_hex("wood", 0xffffff));
        let wood = scene.material_manager.get_material("wood").unwrap();
        assert_ne!(wood.base_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(scene.get_statistics().material_count, 2);
    }

    #[test]
    fn test_statistics_sum_meshes() {
        let mut scene = Scene::new();
        scene.add_object(cube("a"));
        scene.add_object(cube("b"));
        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.total_triangles, 24);
        assert_eq!(stats.total_vertices, 48);
    }
}
