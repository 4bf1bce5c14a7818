//! Camera and lighting setup
//!
//! Static scene geometry (ground, roads, signal heads) lives in `spawner`;
//! this only places the camera and the light rig.

use bevy::prelude::*;

use super::components::MainCamera;

/// System to set up the camera and lights
pub fn setup_world(mut commands: Commands) {
    // Elevated camera looking down the north-south axis
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 120.0, 80.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Soft fill light so unlit faces stay readable
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 9000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}
