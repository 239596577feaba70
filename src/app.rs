use std::sync::Arc;

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ShopConfig,
    gfx::{
        camera::{CameraController, CameraManager},
        rendering::{RenderEngine, RenderOptions},
        scene::Scene,
        text::{Font, FontError},
    },
    shop::{add_shelf_labels, build_shop, shop_camera},
};

/// Events delivered to the main thread from worker threads
#[derive(Debug)]
pub enum AppEvent {
    FontLoaded(Result<Font, FontError>),
}

pub struct PlantShopApp {
    event_loop: EventLoop<AppEvent>,
    app_state: AppState,
}

struct AppState {
    config: ShopConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera_manager: CameraManager,
    scene: Scene,
    init_error: Option<anyhow::Error>,
}

impl PlantShopApp {
    /// Builds the shop scene and starts loading the label font
    pub fn new(config: ShopConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::<AppEvent>::with_user_event()
            .build()
            .context("failed to create event loop")?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut scene = Scene::new();
        build_shop(&mut scene, &mut rng);
        scene.set_background_hex(config.background_hex());

        let aspect = config.width as f32 / config.height.max(1) as f32;
        let mut controller = CameraController::new(config.rotate_speed, config.zoom_speed);
        if let Some(factor) = config.damping() {
            controller = controller.with_damping(factor);
        }
        let camera_manager = CameraManager::new(shop_camera(aspect), controller);

        spawn_font_loader(&config, event_loop.create_proxy());

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                camera_manager,
                scene,
                init_error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// GPU initialisation failures end the loop and are returned here.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.init_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Reads the typeface on a worker thread and posts the result back
fn spawn_font_loader(config: &ShopConfig, proxy: EventLoopProxy<AppEvent>) {
    let path = config.font_path.clone();
    std::thread::spawn(move || {
        let result = Font::load(&path);
        if proxy.send_event(AppEvent::FontLoaded(result)).is_err() {
            log::debug!("Event loop closed before font {:?} finished loading", path);
        }
    });
}

impl AppState {
    fn init_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );
        let (width, height) = window.inner_size().into();

        let options = RenderOptions {
            shadow_map_size: self.config.shadow_map_size,
            vsync: self.config.vsync,
        };
        let mut renderer =
            pollster::block_on(RenderEngine::new(window.clone(), width, height, options))?;

        self.camera_manager.resize(width, height);
        renderer.prepare_scene(&mut self.scene);

        self.window = Some(window);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        self.camera_manager.update();
        render_engine.update(self.camera_manager.camera.uniform, &self.scene.lights);
        render_engine.prepare_scene(&mut self.scene);

        match render_engine.render_frame(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(err) => {
                log::warn!("Frame dropped: {}", err);
            }
        }
    }

}

/// Escape quits on press; its release and every other key are ignored
fn is_exit_key(key: PhysicalKey, state: ElementState) -> bool {
    key == PhysicalKey::Code(KeyCode::Escape) && state == ElementState::Pressed
}

impl ApplicationHandler<AppEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!(
            "Starting '{}' at {}x{} (vsync: {}, shadow map: {})",
            self.config.title,
            self.config.width,
            self.config.height,
            self.config.vsync,
            self.config.shadow_map_size
        );

        if let Err(err) = self.init_renderer(event_loop) {
            log::error!("GPU initialisation failed: {:#}", err);
            self.init_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }

        self.camera_manager.process_window_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key,
                    state,
                    ..
                },
                ..
            } => {
                if is_exit_key(physical_key, state) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                self.camera_manager.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.camera_manager.process_device_event(&event);
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::FontLoaded(Ok(font)) => {
                let added = add_shelf_labels(&mut self.scene, &font);
                log::info!(
                    "Font '{}' loaded ({} glyphs), added {} labels",
                    font.family_name,
                    font.glyph_count(),
                    added
                );
            }
            AppEvent::FontLoaded(Err(err)) => {
                log::warn!("Shelf labels disabled: {}", err);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Loads the config from the environment and runs the shop until it closes
pub fn run() -> anyhow::Result<()> {
    let config = ShopConfig::from_env()?;
    PlantShopApp::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_exits_on_press_only() {
        let escape = PhysicalKey::Code(KeyCode::Escape);
        assert!(is_exit_key(escape, ElementState::Pressed));
        assert!(!is_exit_key(escape, ElementState::Released));
        assert!(!is_exit_key(PhysicalKey::Code(KeyCode::KeyQ), ElementState::Pressed));
    }
}
