//! Global uniform bindings for camera and scene data
//!
//! Manages GPU uniform buffers and bind groups for global rendering state
//! that is shared across all objects in a scene: camera matrices, the
//! ambient term, the point light and the shadow map sampled by the lit pass.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::Lights},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// Depth offset applied when comparing against the shadow map
pub const SHADOW_BIAS: f32 = 0.0015;

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly. Every field is
/// vec4 or mat4 sized so the layout has no implicit padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    /// rgb = colour, w = intensity
    ambient: [f32; 4],
    /// xyz = position, w = range
    light_position: [f32; 4],
    /// rgb = colour, w = intensity
    light_color: [f32; 4],
    /// x = decay, y = shadows enabled, z = 1 / shadow map size, w = bias
    light_params: [f32; 4],
    light_view_proj: [[f32; 4]; 4],
}
// Total: 16 + 64 + 4 * 16 + 64 = 208 bytes

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: &Lights, shadow_map_size: u32) -> Self {
        let ambient = lights.ambient;
        let point = lights.point;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [
                ambient.color[0],
                ambient.color[1],
                ambient.color[2],
                ambient.intensity,
            ],
            light_position: [
                point.position[0],
                point.position[1],
                point.position[2],
                point.range,
            ],
            light_color: [point.color[0], point.color[1], point.color[2], point.intensity],
            light_params: [
                point.decay,
                if point.cast_shadow { 1.0 } else { 0.0 },
                1.0 / shadow_map_size.max(1) as f32,
                SHADOW_BIAS,
            ],
            light_view_proj: point.shadow_view_proj().into(),
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called each frame; unchanged content is not re-uploaded.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &Lights,
    shadow_map_size: u32,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights, shadow_map_size));
}

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in both the shadow and the lit pipeline.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // Global uniforms (camera + lights)
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Shadow map texture and comparison sampler, bound to slot 3 of the lit pass
pub struct ShadowBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl ShadowBindings {
    pub fn new(device: &wgpu::Device, shadow_map: &TextureResource) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Comparison,
            ))
            .create(device, "Shadow Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(device, "Shadow Bind Group");

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{AmbientLight, PointLight};

    #[test]
    fn test_content_size_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 208);
    }

    #[test]
    fn test_content_packs_lights() {
        let lights = Lights {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.6,
            },
            point: PointLight::default()
                .with_position(0.0, 10.0, 0.0)
                .with_shadow(true),
        };
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights, 2048);

        assert_eq!(content.ambient, [1.0, 1.0, 1.0, 0.6]);
        assert_eq!(content.light_position, [0.0, 10.0, 0.0, 50.0]);
        assert_eq!(content.light_params[0], 1.0);
        assert_eq!(content.light_params[1], 1.0);
        assert_eq!(content.light_params[2], 1.0 / 2048.0);
    }

    #[test]
    fn test_shadows_disabled_flag() {
        let lights = Lights::default();
        let content = GlobalUBOContent::new(CameraUniform::default(), &lights, 1024);
        assert_eq!(content.light_params[1], 0.0);
    }
}
