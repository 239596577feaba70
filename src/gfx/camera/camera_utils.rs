use cgmath::{Matrix4, SquareMatrix};
use winit::event::{DeviceEvent, WindowEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// Pairs the camera with the controls that drive it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.controller.process_window_event(event);
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_device_event(event);
    }

    /// Per-frame step: apply damped controls, then refresh the uniform
    pub fn update(&mut self) {
        self.controller.update(&mut self.camera);
        self.camera.update_view_proj();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }

    /// Get the view projection matrix from the camera
    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
