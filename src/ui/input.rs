//! Input handling systems

use bevy::prelude::*;

use super::components::{CameraSettings, MainCamera};

/// Handle basic keyboard input
pub fn handle_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

/// Pan and zoom the camera with the keyboard
pub fn handle_camera_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<CameraSettings>,
    time: Res<Time>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let mut pan = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        pan.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        pan.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        pan.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        pan.x += 1.0;
    }

    let mut zoom = 0.0;
    if keyboard.pressed(KeyCode::KeyZ) {
        zoom -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyX) {
        zoom += 1.0;
    }

    if pan != Vec3::ZERO {
        let delta = pan.normalize() * settings.movement_speed * time.delta_secs();
        transform.translation += delta;
    }

    if zoom != 0.0 {
        let forward = transform.forward();
        transform.translation += forward * -zoom * settings.zoom_speed * time.delta_secs();
    }
}
