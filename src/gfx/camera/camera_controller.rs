use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::orbit_camera::OrbitCamera;

/// Pixels of trackpad scroll treated as one wheel notch
const PIXELS_PER_LINE: f32 = 50.0;

/// Residual deltas below this are dropped so damping settles
const SETTLE_EPSILON: f32 = 1e-6;

/// Pointer-driven orbit controls with optional damping
///
/// Input only accumulates pending motion. [`CameraController::update`],
/// called once per frame, moves the camera. With damping enabled each update
/// applies `factor` of the pending motion and keeps the rest for later frames.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    damping_factor: Option<f32>,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
    pending_zoom: f32,
    is_shift_held: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping_factor: None,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,
            is_shift_held: false,
            is_left_pressed: false,
            is_right_pressed: false,
        }
    }

    /// Builder pattern: enable damping; `factor` is clamped to `(0, 1]`
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_factor = Some(factor.clamp(f32::EPSILON, 1.0));
        self
    }

    pub fn damping_factor(&self) -> Option<f32> {
        self.damping_factor
    }

    /// Tracks button and modifier state and wheel zoom
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.is_left_pressed = pressed,
                    MouseButton::Right => self.is_right_pressed = pressed,
                    _ => (),
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_shift_held = modifiers.state().shift_key();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        *y as f32 / PIXELS_PER_LINE
                    }
                };
                self.queue_zoom(lines);
            }
            WindowEvent::Focused(false) => {
                self.is_left_pressed = false;
                self.is_right_pressed = false;
            }
            _ => (),
        }
    }

    /// Turns raw mouse motion into rotation or pan
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            let (dx, dy) = (delta.0 as f32, delta.1 as f32);
            if self.is_panning() {
                self.queue_pan(dx, dy);
            } else if self.is_rotating() {
                self.queue_rotation(dx, dy);
            }
        }
    }

    /// Queues a drag of `(dx, dy)` pixels as orbit rotation
    pub fn queue_rotation(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.rotate_speed;
        self.pending_pitch += dy * self.rotate_speed;
    }

    /// Queues a drag of `(dx, dy)` pixels as a pan
    pub fn queue_pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan.0 -= dx * self.pan_speed;
        self.pending_pan.1 += dy * self.pan_speed;
    }

    /// Queues wheel notches; positive values zoom in
    pub fn queue_zoom(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_right_pressed || (self.is_left_pressed && self.is_shift_held)
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_left_pressed && !self.is_shift_held
    }

    /// Whether any motion is still waiting to be applied
    pub fn is_settled(&self) -> bool {
        self.pending_yaw == 0.0
            && self.pending_pitch == 0.0
            && self.pending_pan == (0.0, 0.0)
            && self.pending_zoom == 0.0
    }

    /// Applies pending motion to the camera; call once per frame
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.pending_zoom != 0.0 {
            // Zoom is not damped
            let factor = (1.0 - self.zoom_speed).max(f32::EPSILON).powf(self.pending_zoom);
            camera.scale_distance(factor);
            self.pending_zoom = 0.0;
        }

        let step = self.damping_factor.unwrap_or(1.0);

        let yaw = take_step(&mut self.pending_yaw, step);
        let pitch = take_step(&mut self.pending_pitch, step);
        let pan = (
            take_step(&mut self.pending_pan.0, step),
            take_step(&mut self.pending_pan.1, step),
        );

        if yaw != 0.0 {
            camera.add_yaw(yaw);
        }
        if pitch != 0.0 {
            camera.add_pitch(pitch);
        }
        if pan != (0.0, 0.0) {
            camera.pan(pan);
        }
    }
}

/// Removes and returns `step` of `pending`
fn take_step(pending: &mut f32, step: f32) -> f32 {
    let applied = *pending * step;
    *pending -= applied;
    if pending.abs() < SETTLE_EPSILON {
        // Hand over the remainder so nothing is lost when settling
        let rest = *pending;
        *pending = 0.0;
        return applied + rest;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::from_eye(Vector3::new(0.0, 5.0, 10.0), Vector3::zero(), 1.5)
    }

    #[test]
    fn test_undamped_applies_everything_at_once() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        let yaw_before = camera.yaw;

        controller.queue_rotation(-50.0, 0.0);
        controller.update(&mut camera);

        assert!((camera.yaw - (yaw_before + 0.5)).abs() < 1e-6);
        assert!(controller.is_settled());
    }

    #[test]
    fn test_damping_applies_fraction_per_frame() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.25);
        let yaw_before = camera.yaw;

        controller.queue_rotation(-100.0, 0.0); // one radian of yaw
        controller.update(&mut camera);
        assert!((camera.yaw - yaw_before - 0.25).abs() < 1e-6);

        controller.update(&mut camera);
        assert!((camera.yaw - yaw_before - 0.4375).abs() < 1e-6);
        assert!(!controller.is_settled());
    }

    #[test]
    fn test_damping_converges_to_full_delta() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.25);
        let yaw_before = camera.yaw;

        controller.queue_rotation(-100.0, 0.0);
        for _ in 0..200 {
            controller.update(&mut camera);
        }

        assert!(controller.is_settled());
        assert!((camera.yaw - yaw_before - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_in_reduces_distance() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        let before = camera.distance;

        controller.queue_zoom(1.0);
        controller.update(&mut camera);
        assert!((camera.distance - before * 0.9).abs() < 1e-4);

        controller.queue_zoom(-1.0);
        controller.update(&mut camera);
        assert!((camera.distance - before).abs() < 1e-4);
    }

    #[test]
    fn test_pan_keeps_view_direction() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        let direction = (camera.target - camera.eye).normalize();

        controller.queue_pan(-20.0, 0.0);
        controller.update(&mut camera);

        assert!(camera.target.x > 0.0);
        let after = (camera.target - camera.eye).normalize();
        assert!((after - direction).magnitude() < 1e-5);
    }

    #[test]
    fn test_drag_mode_selection() {
        let controller = CameraController::new(0.01, 0.1);
        assert!(!controller.is_rotating());
        assert!(!controller.is_panning());
        assert!(controller.damping_factor().is_none());
    }
}
