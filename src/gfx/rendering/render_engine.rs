//! WGPU-based rendering engine for the plant shop
//!
//! Owns the surface, device and shared bind group layouts, and renders a
//! [`Scene`] in two passes: a cached depth-only shadow pass from the point
//! light, then the lit forward pass into the swapchain.

use std::sync::Arc;

use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, ShadowBindings},
            texture_resource::TextureResource,
        },
        scene::{object::DrawObject, Lights, Scene},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shadow_cache::ShadowCache;

const SHADOW_PIPELINE: &str = "Shadow";
const LIT_PIPELINE: &str = "Lit";

/// Startup options for the render engine
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub shadow_map_size: u32,
    pub vsync: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            shadow_map_size: 2048,
            vsync: true,
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    // Shared layouts handed to scene objects and materials
    object_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,

    // Shadow mapping resources
    shadow_map: TextureResource,
    shadow_bindings: ShadowBindings,
    shadow_map_size: u32,
    shadow_cache: ShadowCache,
    lights: Lights,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Prefers an sRGB surface format so shaders can write linear colour.
    /// The shadow map size is clamped to the device's texture limit.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        options: RenderOptions,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        let adapter_name = format!("{} ({:?})", info.name, info.backend);
        log::info!("Using adapter: {}", adapter_name);

        let required_limits = wgpu::Limits {
            max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d.min(4096),
            ..wgpu::Limits::downlevel_defaults()
        };
        let max_texture_size = required_limits.max_texture_dimension_2d;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        if !format.is_srgb() {
            log::warn!("No sRGB surface format available, using {:?}", format);
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: choose_present_mode(&surface_capabilities.present_modes, options.vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_map_size = options.shadow_map_size.clamp(1, max_texture_size);
        if shadow_map_size != options.shadow_map_size {
            log::warn!(
                "Shadow map size {} exceeds device limit, using {}",
                options.shadow_map_size,
                shadow_map_size
            );
        }
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_map_size);
        let shadow_bindings = ShadowBindings::new(&device, &shadow_map);

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Object Bind Group Layout");
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("lit", include_str!("lit.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow_pass.wgsl"));

        // No culling in the shadow pass: planes and caps must occlude from both sides
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                ])
                .with_vertex_only(),
        );

        pipeline_manager.register_pipeline(
            LIT_PIPELINE,
            PipelineConfig::default()
                .with_label("LIT")
                .with_shader("lit")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                    material_layout.layout.clone(),
                    shadow_bindings.bind_group_layout().clone(),
                ]),
        );

        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            material_layout,
            shadow_map,
            shadow_bindings,
            shadow_map_size,
            shadow_cache: ShadowCache::new(),
            lights: Lights::default(),
        })
    }

    /// Creates GPU resources for anything new in the scene and syncs transforms
    pub fn prepare_scene(&mut self, scene: &mut Scene) {
        scene.init_gpu_resources(
            &self.device,
            &self.queue,
            &self.object_layout,
            &self.material_layout,
        );
        scene.update_all_transforms(&self.queue);
    }

    /// Updates camera and light uniform buffers
    pub fn update(&mut self, camera_uniform: CameraUniform, lights: &Lights) {
        self.lights = *lights;
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            lights,
            self.shadow_map_size,
        );
    }

    /// Renders one frame
    ///
    /// The shadow pass runs only when the scene revision or the light
    /// changed since the shadow map was last drawn.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: Shadow depth from the point light
        let revision = scene.revision();
        if self.shadow_cache.needs_update(revision, &self.lights.point) {
            if self.lights.point.cast_shadow {
                log::debug!("Rebuilding shadow map (scene revision {})", revision);
                self.render_shadow_pass(&mut encoder, scene);
            }
            self.shadow_cache.mark_valid(revision, &self.lights.point);
        }

        // PASS 2: Main rendering with shadows
        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(LIT_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                render_pass.set_bind_group(3, self.shadow_bindings.bind_group(), &[]);

                for object in scene.objects.iter().filter(|o| o.visible) {
                    let material = scene.get_material_for_object(object);
                    match material.get_bind_group() {
                        Some(material_bind_group) => {
                            render_pass.set_bind_group(2, material_bind_group, &[]);
                            render_pass.draw_object(object);
                        }
                        None => log::trace!(
                            "Skipping '{}': material '{}' has no GPU resources",
                            object.name,
                            material.name
                        ),
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn render_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, scene: &Scene) {
        let Some(shadow_pipeline) = self.pipeline_manager.get_pipeline(SHADOW_PIPELINE) else {
            return;
        };

        let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Depth Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_map.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        shadow_pass.set_pipeline(shadow_pipeline);
        shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

        for object in scene
            .objects
            .iter()
            .filter(|o| o.visible && o.cast_shadow)
        {
            shadow_pass.draw_object(object);
        }
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized surfaces (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface after it was lost or became outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

fn choose_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|mode| available.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
