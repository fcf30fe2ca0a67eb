use cgmath::{InnerSpace, Vector3};
use instant::Duration;
use reactor_viewer::{
    camera::{Camera, CameraController, PITCH_LIMIT, ProjectionMode, prepare_scene_view},
    input::KeyboardState,
    shader::{LIGHT_DIRECTION, LIGHT_POSITION, PROJECTION, UniformStore},
};
use winit::keyboard::KeyCode;

const FRAME: Duration = Duration::from_micros(16_667);

#[test]
fn one_second_of_forward_travels_sixty_steps() {
    let mut camera = Camera::default();
    let mut controller = CameraController::default();
    let mut keys = KeyboardState::new();
    let start = camera.position;
    keys.press(KeyCode::KeyW);

    for _ in 0..60 {
        controller.process_input(&mut camera, &keys, FRAME);
    }

    let travelled = (camera.position - start).magnitude();
    assert!((travelled - 3.0).abs() < 1e-2, "travelled {}", travelled);
}

#[test]
fn pointer_sweeps_keep_the_camera_well_formed() {
    let mut camera = Camera::default();
    let mut controller = CameraController::default();
    let path = [
        (500.0, 400.0),
        (520.0, 100.0),
        (900.0, -3000.0),
        (-200.0, 9000.0),
        (0.0, 0.0),
        (13.0, 7.5),
    ];

    for (x, y) in path {
        controller.on_pointer_moved(&mut camera, x, y);
        assert!(camera.pitch.0.abs() <= PITCH_LIMIT);
        assert!((camera.front.magnitude() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn the_spotlight_tracks_the_moving_camera() {
    let mut camera = Camera::default();
    let mut controller = CameraController::default();
    let mut keys = KeyboardState::new();
    let mut store = UniformStore::new();
    keys.press(KeyCode::KeyQ);

    controller.process_input(&mut camera, &keys, FRAME);
    controller.on_pointer_moved(&mut camera, 0.0, 0.0);
    controller.on_pointer_moved(&mut camera, 50.0, 0.0);
    prepare_scene_view(&mut store, &camera, controller.projection_mode(), 4.0 / 3.0);

    assert_eq!(
        store.vec3(LIGHT_POSITION),
        Vector3::new(camera.position.x, camera.position.y, camera.position.z)
    );
    assert_eq!(store.vec3(LIGHT_DIRECTION), camera.front);
    assert!((camera.position.y - 3.05).abs() < 1e-4);
}

#[test]
fn projection_keys_switch_modes_between_frames() {
    let mut camera = Camera::default();
    let mut controller = CameraController::default();
    let mut keys = KeyboardState::new();
    let mut store = UniformStore::new();

    keys.press(KeyCode::KeyO);
    controller.process_input(&mut camera, &keys, FRAME);
    keys.release(KeyCode::KeyO);
    // the mode sticks after the key is released
    controller.process_input(&mut camera, &keys, FRAME);
    assert_eq!(controller.projection_mode(), ProjectionMode::Orthographic);
    prepare_scene_view(&mut store, &camera, controller.projection_mode(), 4.0 / 3.0);
    assert_eq!(
        store.mat4(PROJECTION),
        cgmath::ortho(-2.0, 2.0, -2.0, 2.0, 0.1, 100.0)
    );

    keys.press(KeyCode::KeyP);
    controller.process_input(&mut camera, &keys, FRAME);
    prepare_scene_view(&mut store, &camera, controller.projection_mode(), 4.0 / 3.0);
    assert_eq!(
        store.mat4(PROJECTION),
        cgmath::perspective(camera.zoom, 4.0 / 3.0, 0.1, 100.0)
    );
}
