//! First-person fly camera.
//!
//! [`Camera`] is the pose (position, facing, field of view). The
//! [`CameraController`] owns everything input-related: the last pointer
//! position, the scroll-adjusted movement speed and the projection mode. Both
//! are owned by the application and handed to the input callbacks, there is no
//! global camera.
//!
//! All matrices follow the OpenGL clip-space convention (depth in [-1, 1]).
//! Multiply by [`OPENGL_TO_WGPU_MATRIX`] before handing a projection to wgpu.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3};
use instant::Duration;
use winit::keyboard::KeyCode;

use crate::{
    input::KeyboardState,
    pipelines::light::push_lighting,
    shader::{PROJECTION, ShaderUniforms, VIEW, VIEW_POSITION},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub const MOUSE_SENSITIVITY: f32 = 0.1;
pub const PITCH_LIMIT: f32 = 89.0;
pub const SCROLL_SPEED_STEP: f32 = 0.01;
pub const MIN_MOVEMENT_SPEED: f32 = 0.01;
pub const MAX_MOVEMENT_SPEED: f32 = 1.0;
/// Distance travelled per frame at the reference frame rate.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 0.05;
/// Keyboard movement is tuned per frame at this rate and scaled by elapsed time.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Half extent of the orthographic view volume.
pub const ORTHO_HALF_EXTENT: f32 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Always unit length.
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
    /// Vertical field of view.
    pub zoom: Deg<f32>,
}

impl Default for Camera {
    /// Above and to the left of the display, looking down into it.
    fn default() -> Self {
        Self::looking_along(
            (-4.0, 3.0, 6.0),
            Vector3::new(2.5, -1.0, -5.0),
            Deg(60.0),
        )
    }
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, yaw: Deg<f32>, pitch: Deg<f32>, zoom: Deg<f32>) -> Self {
        let mut camera = Self {
            position: position.into(),
            front: Vector3::unit_z(),
            up: Vector3::unit_y(),
            yaw,
            pitch,
            zoom,
        };
        camera.update_front();
        camera
    }

    /// Build a camera facing `direction`, deriving yaw and pitch from it so
    /// later pointer motion continues smoothly from this orientation.
    pub fn looking_along<P: Into<Point3<f32>>>(position: P, direction: Vector3<f32>, zoom: Deg<f32>) -> Self {
        let dir = direction.normalize();
        let yaw = Deg(dir.z.atan2(dir.x).to_degrees());
        let pitch = Deg(dir.y.asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT));
        Self::new(position, yaw, pitch, zoom)
    }

    /// Recompute `front` from yaw and pitch.
    pub fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.0.to_radians(), self.pitch.0.to_radians());
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vector3<f32> {
        self.front.cross(self.up).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, mode: ProjectionMode, aspect: f32) -> Matrix4<f32> {
        match mode {
            ProjectionMode::Perspective => cgmath::perspective(self.zoom, aspect, NEAR_PLANE, FAR_PLANE),
            ProjectionMode::Orthographic => cgmath::ortho(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                NEAR_PLANE,
                FAR_PLANE,
            ),
        }
    }

    pub fn compute_view_and_projection(
        &self,
        mode: ProjectionMode,
        aspect: f32,
    ) -> (Matrix4<f32>, Matrix4<f32>) {
        (self.view_matrix(), self.projection_matrix(mode, aspect))
    }
}

#[derive(Debug)]
pub struct CameraController {
    sensitivity: f32,
    movement_speed: f32,
    last_pointer: Option<(f32, f32)>,
    mode: ProjectionMode,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(MOUSE_SENSITIVITY, DEFAULT_MOVEMENT_SPEED)
    }
}

impl CameraController {
    pub fn new(sensitivity: f32, movement_speed: f32) -> Self {
        Self {
            sensitivity,
            movement_speed: movement_speed.clamp(MIN_MOVEMENT_SPEED, MAX_MOVEMENT_SPEED),
            last_pointer: None,
            mode: ProjectionMode::default(),
        }
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    /// Turn the camera by the pointer's motion since the previous call.
    ///
    /// The first call only records the position; there is no previous one to
    /// measure against.
    pub fn on_pointer_moved(&mut self, camera: &mut Camera, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return;
        };
        // screen y grows downwards, pitch grows upwards
        let dx = (x - last_x) * self.sensitivity;
        let dy = (last_y - y) * self.sensitivity;

        camera.yaw = Deg(camera.yaw.0 + dx);
        camera.pitch = Deg((camera.pitch.0 + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT));
        camera.update_front();
    }

    pub fn on_scroll(&mut self, delta_y: f32) {
        self.movement_speed = (self.movement_speed + delta_y * SCROLL_SPEED_STEP)
            .clamp(MIN_MOVEMENT_SPEED, MAX_MOVEMENT_SPEED);
        log::debug!("camera speed {:.2}", self.movement_speed);
    }

    /// Apply held movement keys and the projection toggle.
    pub fn process_input(&mut self, camera: &mut Camera, keys: &KeyboardState, dt: Duration) {
        let step = self.movement_speed * dt.as_secs_f32() * REFERENCE_FRAME_RATE;
        let right = camera.right();

        if keys.is_down(KeyCode::KeyW) {
            camera.position += camera.front * step;
        }
        if keys.is_down(KeyCode::KeyS) {
            camera.position -= camera.front * step;
        }
        if keys.is_down(KeyCode::KeyA) {
            camera.position -= right * step;
        }
        if keys.is_down(KeyCode::KeyD) {
            camera.position += right * step;
        }
        if keys.is_down(KeyCode::KeyQ) {
            camera.position.y += step;
        }
        if keys.is_down(KeyCode::KeyE) {
            camera.position.y -= step;
        }

        if keys.is_down(KeyCode::KeyP) {
            self.mode = ProjectionMode::Perspective;
        }
        if keys.is_down(KeyCode::KeyO) {
            self.mode = ProjectionMode::Orthographic;
        }
    }
}

/// Push view, projection, camera position and the scene lights.
pub fn prepare_scene_view(
    shader: &mut impl ShaderUniforms,
    camera: &Camera,
    mode: ProjectionMode,
    aspect: f32,
) {
    let (view, projection) = camera.compute_view_and_projection(mode, aspect);
    shader.set_mat4(VIEW, view);
    shader.set_mat4(PROJECTION, projection);
    shader.set_vec3(VIEW_POSITION, Vector3::new(camera.position.x, camera.position.y, camera.position.z));
    push_lighting(shader, camera);
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, Transform};

    use super::*;
    use crate::shader::UniformStore;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn close_vec(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        close(a.x, b.x) && close(a.y, b.y) && close(a.z, b.z)
    }

    #[test]
    fn default_camera_faces_its_initial_direction() {
        let camera = Camera::default();
        let expected = Vector3::new(2.5, -1.0, -5.0).normalize();
        assert!(close_vec(camera.front, expected));
        assert!(close(camera.front.magnitude(), 1.0));
        assert_eq!(camera.zoom, Deg(60.0));
    }

    #[test]
    fn first_pointer_event_does_not_turn() {
        let mut camera = Camera::default();
        let mut controller = CameraController::default();
        let before = camera.clone();

        controller.on_pointer_moved(&mut camera, 900.0, -350.0);

        assert_eq!(camera, before);
    }

    #[test]
    fn second_pointer_event_turns_by_scaled_delta() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0), Deg(45.0));
        let mut controller = CameraController::default();

        controller.on_pointer_moved(&mut camera, 100.0, 100.0);
        controller.on_pointer_moved(&mut camera, 130.0, 80.0);

        assert!(close(camera.yaw.0, -90.0 + 3.0));
        // moving the pointer up looks up
        assert!(close(camera.pitch.0, 2.0));
        assert!(close(camera.front.magnitude(), 1.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0), Deg(45.0));
        let mut controller = CameraController::default();
        controller.on_pointer_moved(&mut camera, 0.0, 0.0);

        let mut y = 0.0;
        for _ in 0..50 {
            y -= 400.0;
            controller.on_pointer_moved(&mut camera, 0.0, y);
            assert!(camera.pitch.0 <= PITCH_LIMIT);
        }
        assert_eq!(camera.pitch.0, PITCH_LIMIT);

        for _ in 0..100 {
            y += 400.0;
            controller.on_pointer_moved(&mut camera, 0.0, y);
            assert!(camera.pitch.0 >= -PITCH_LIMIT);
        }
        assert_eq!(camera.pitch.0, -PITCH_LIMIT);
    }

    #[test]
    fn scroll_speed_is_clamped() {
        let mut controller = CameraController::default();
        controller.on_scroll(2.0);
        assert!(close(controller.movement_speed(), 0.07));
        controller.on_scroll(1000.0);
        assert_eq!(controller.movement_speed(), MAX_MOVEMENT_SPEED);
        controller.on_scroll(-1000.0);
        assert_eq!(controller.movement_speed(), MIN_MOVEMENT_SPEED);
    }

    #[test]
    fn forward_moves_along_front_by_speed() {
        let mut camera = Camera::default();
        let mut controller = CameraController::default();
        let mut keys = KeyboardState::new();
        let start = camera.position;
        keys.press(KeyCode::KeyW);

        controller.process_input(&mut camera, &keys, FRAME);

        let moved = camera.position - start;
        assert!(close_vec(moved, camera.front * DEFAULT_MOVEMENT_SPEED));
    }

    #[test]
    fn scroll_speed_drives_movement() {
        let mut camera = Camera::default();
        let mut controller = CameraController::default();
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::KeyS);
        controller.on_scroll(5.0);
        let start = camera.position;

        controller.process_input(&mut camera, &keys, FRAME);

        let moved = camera.position - start;
        assert!(close_vec(moved, -camera.front * 0.1));
    }

    #[test]
    fn movement_scales_with_elapsed_time() {
        let mut camera = Camera::default();
        let mut controller = CameraController::default();
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::KeyQ);
        let start_y = camera.position.y;

        controller.process_input(&mut camera, &keys, Duration::from_millis(500));

        assert!(close(camera.position.y - start_y, DEFAULT_MOVEMENT_SPEED * 30.0));
    }

    #[test]
    fn strafe_and_vertical_keys() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0), Deg(45.0));
        let mut controller = CameraController::default();
        let mut keys = KeyboardState::new();

        keys.press(KeyCode::KeyD);
        controller.process_input(&mut camera, &keys, FRAME);
        // facing -Z, right is +X
        assert!(close_vec(camera.position.to_vec(), Vector3::new(0.05, 0.0, 0.0)));

        keys.release(KeyCode::KeyD);
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::KeyE);
        controller.process_input(&mut camera, &keys, FRAME);
        assert!(close_vec(camera.position.to_vec(), Vector3::new(0.0, -0.05, 0.0)));
    }

    #[test]
    fn projection_toggle() {
        let camera = Camera::default();
        let mut controller = CameraController::default();
        let mut keys = KeyboardState::new();
        assert_eq!(controller.projection_mode(), ProjectionMode::Perspective);

        keys.press(KeyCode::KeyO);
        controller.process_input(&mut camera.clone(), &keys, FRAME);
        assert_eq!(controller.projection_mode(), ProjectionMode::Orthographic);
        let (_, projection) =
            camera.compute_view_and_projection(controller.projection_mode(), 4.0 / 3.0);
        assert_eq!(projection, cgmath::ortho(-2.0, 2.0, -2.0, 2.0, 0.1, 100.0));

        keys.release(KeyCode::KeyO);
        keys.press(KeyCode::KeyP);
        controller.process_input(&mut camera.clone(), &keys, FRAME);
        assert_eq!(controller.projection_mode(), ProjectionMode::Perspective);
        let (_, projection) =
            camera.compute_view_and_projection(controller.projection_mode(), 4.0 / 3.0);
        assert_eq!(projection, cgmath::perspective(Deg(60.0), 4.0 / 3.0, 0.1, 100.0));
    }

    #[test]
    fn view_matrix_moves_the_eye_to_the_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix().transform_point(camera.position);
        assert!(close_vec(eye.to_vec(), Vector3::new(0.0, 0.0, 0.0)));
        let ahead = camera
            .view_matrix()
            .transform_point(camera.position + camera.front);
        assert!(close_vec(ahead.to_vec(), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn scene_view_pushes_camera_uniforms_and_lights() {
        let camera = Camera::default();
        let mut store = UniformStore::new();

        prepare_scene_view(&mut store, &camera, ProjectionMode::Perspective, 4.0 / 3.0);

        assert_eq!(store.mat4(VIEW), camera.view_matrix());
        assert_eq!(
            store.mat4(PROJECTION),
            camera.projection_matrix(ProjectionMode::Perspective, 4.0 / 3.0)
        );
        assert_eq!(store.vec3(VIEW_POSITION), Vector3::new(-4.0, 3.0, 6.0));
        assert!(store.contains(crate::shader::LIGHT_POSITION));
        assert!(store.contains(crate::shader::POINT_LIGHT_QUADRATIC));
    }
}
