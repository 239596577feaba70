use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective camera orbiting a target point, Y up
///
/// `pitch` is the elevation above the target's horizontal plane and `yaw`
/// the angle around the Y axis measured from +Z.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Calculated in `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::FRAC_PI_4),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Creates a camera looking from `eye` at `target`
    pub fn from_eye(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    /// Builder pattern: set the vertical field of view
    pub fn with_fovy(mut self, fovy: impl Into<Rad<f32>>) -> Self {
        self.fovy = fovy.into();
        self
    }

    /// Builder pattern: set the near and far clip planes
    pub fn with_clip(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    /// Builder pattern: set distance and pitch limits
    pub fn with_bounds(mut self, bounds: OrbitCameraBounds) -> Self {
        self.bounds = bounds;
        self.set_distance(self.distance);
        self.set_pitch(self.pitch);
        self
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Scales the distance; factors below 1 move closer
    pub fn scale_distance(&mut self, factor: f32) {
        self.set_distance(self.distance * factor);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    /// Yaw is unbounded; the camera can circle the target freely
    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.update();
    }

    /// Pans the target relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        self.target += (right * delta.0 + up * delta.1) * pan_scale;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// Recomputes the aspect ratio; zero-sized surfaces are ignored
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.001,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.001,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_from_eye_round_trips() {
        let camera = OrbitCamera::from_eye(Vector3::new(0.0, 5.0, 10.0), Vector3::zero(), 1.5);
        assert_close(camera.eye, Vector3::new(0.0, 5.0, 10.0));
        assert!((camera.distance - 125f32.sqrt()).abs() < 1e-5);
        assert!(camera.yaw.abs() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0).with_bounds(
            OrbitCameraBounds {
                min_distance: Some(1.0),
                max_distance: Some(40.0),
                ..Default::default()
            },
        );
        camera.scale_distance(100.0);
        assert_eq!(camera.distance, 40.0);
        camera.scale_distance(0.0001);
        assert_eq!(camera.distance, 1.0);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(0.0, 5.0, 10.0), Vector3::zero(), 1.0);
        let offset_before = camera.eye - camera.target;
        camera.pan((1.0, 0.0));
        assert!(camera.target.x > 0.0);
        assert_close(camera.eye - camera.target, offset_before);
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut camera = OrbitCamera::new(10.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.resize_projection(1200, 800);
        assert_eq!(camera.aspect, 1.5);
        camera.resize_projection(0, 800);
        assert_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(0.0, 5.0, 10.0), Vector3::zero(), 1.5);
        camera.update_view_proj();
        let m = camera.build_view_projection_matrix();
        let clip = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }
}
