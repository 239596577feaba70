//! Scene objects: meshes, transforms and their GPU resources

use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    gfx::geometry::GeometryData,
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

use super::vertex::Vertex3D;

/// Triangle mesh with lazily uploaded vertex and index buffers
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            index_count: indices.len() as u32,
            vertex_count: vertices.len() as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        Self::new(geometry.to_vertices(), geometry.indices.clone())
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    fn upload(&mut self, device: &wgpu::Device) {
        if self.is_uploaded() || self.indices.is_empty() {
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Per-object uniform data. MUST match `ObjectUniform` in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// x: receives shadows (0 or 1)
    pub flags: [f32; 4],
}

type ObjectUBO = UniformBuffer<ObjectUniform>;

pub struct ObjectGpuResources {
    uniform: ObjectUBO,
    pub bind_group: wgpu::BindGroup,
}

/// Position, Euler rotation in radians (XYZ order) and uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builds `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_scale(self.scale)
    }
}

/// A renderable object in the scene
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub transform: Transform,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    material_id: Option<String>,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new object with identity transform and no shadow flags
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            transform: Transform::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            material_id: None,
            gpu_resources: None,
        }
    }

    /// Single-mesh object built from generated geometry
    pub fn from_geometry(name: impl Into<String>, geometry: &GeometryData) -> Self {
        Self::new(name, vec![Mesh::from_geometry(geometry)])
    }

    /// Builder pattern: set the world position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: set the Euler rotation in radians
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn get_material_id(&self) -> Option<&String> {
        self.material_id.as_ref()
    }

    pub fn position(&self) -> Vector3<f32> {
        self.transform.position
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: self.transform.matrix().into(),
            flags: [self.receive_shadow as u32 as f32, 0.0, 0.0, 0.0],
        }
    }

    /// Uploads mesh buffers and creates the per-object uniform
    ///
    /// Calling it again only uploads meshes added since the last call.
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, layout: &BindGroupLayoutWithDesc) {
        for mesh in self.meshes.iter_mut() {
            mesh.upload(device);
        }

        if self.gpu_resources.is_some() {
            return;
        }

        let uniform = ObjectUBO::new_with_data(device, &self.uniform());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("Object Bind Group: {}", self.name));

        self.gpu_resources = Some(ObjectGpuResources {
            uniform,
            bind_group,
        });
    }

    /// Syncs the transform and shadow flags to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let content = self.uniform();
        if let Some(gpu_resources) = self.gpu_resources.as_mut() {
            gpu_resources.uniform.update_content(queue, content);
        }
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }

    pub fn triangle_count(&self) -> u32 {
        self.meshes.iter().map(|m| m.index_count / 3).sum()
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    /// Binds the object's uniform at group 1 and draws every mesh
    fn draw_object(&mut self, object: &'b Object) {
        let Some(bind_group) = object.get_bind_group() else {
            return;
        };
        self.set_bind_group(1, bind_group, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn test_transform_translation() {
        let transform = Transform::at(Vector3::new(-6.0, 3.0, -8.0));
        let p = transform.matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vector4::new(-6.0, 3.0, -8.0, 1.0));
    }

    #[test]
    fn test_floor_rotation_faces_up() {
        // A plane's +Z normal rotated -90 degrees about X points along +Y
        let floor = Object::from_geometry("floor", &generate_box(1.0, 1.0, 1.0))
            .with_rotation(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let n = floor.transform.matrix() * Vector4::new(0.0, 0.0, 1.0, 0.0);
        let n = n.truncate().normalize();
        assert!((n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_builder_flags_and_uniform() {
        let shelf = Object::from_geometry("shelf", &generate_box(4.0, 0.2, 2.0))
            .with_position(0.0, 3.0, -8.0)
            .with_material("shelf")
            .with_shadows(true, true);

        assert_eq!(shelf.get_material_id().map(String::as_str), Some("shelf"));
        assert!(shelf.cast_shadow && shelf.receive_shadow);
        assert_eq!(shelf.triangle_count(), 12);

        let uniform = shelf.uniform();
        assert_eq!(uniform.flags[0], 1.0);
        assert_eq!(uniform.model[3], [0.0, 3.0, -8.0, 1.0]);
    }

    #[test]
    fn test_mesh_not_uploaded_without_device() {
        let mesh = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.vertex_count, 24);
        assert_eq!(mesh.index_count, 36);
    }
}
