//! Systems for spawning the static intersection visuals
//!
//! Roads, stop lines, and the four signal heads are fixed geometry; only
//! vehicles and bulb colors change at runtime (see `sync`).

use bevy::prelude::*;

use super::components::{Ground, HudText, SignalBulb, SignalLink};
use crate::simulation::{Approach, LightState, APPROACH_LENGTH, INTERSECTION_ZONE, STOP_LINE};

/// Width of each road band (covers both travel directions)
const ROAD_WIDTH: f32 = 40.0;

/// Height offset keeping road geometry above the ground plane
const ROAD_HEIGHT: f32 = 0.05;

/// System to create the static scene from the intersection geometry
pub fn spawn_static_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let road_length = 2.0 * APPROACH_LENGTH + 100.0;
    let road_color = Color::srgb(0.2, 0.2, 0.2);

    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(500.0, 500.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.1, 0.28, 0.16))),
    ));

    // North-south road band
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(ROAD_WIDTH, ROAD_HEIGHT, road_length))),
        MeshMaterial3d(materials.add(road_color)),
        Transform::from_xyz(0.0, ROAD_HEIGHT / 2.0, 0.0),
    ));

    // East-west road band
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(road_length, ROAD_HEIGHT, ROAD_WIDTH))),
        MeshMaterial3d(materials.add(road_color)),
        Transform::from_xyz(0.0, ROAD_HEIGHT / 2.0, 0.0),
    ));

    spawn_stop_lines(&mut commands, &mut meshes, &mut materials);

    for approach in Approach::ALL {
        spawn_signal_head(&mut commands, &mut meshes, &mut materials, approach);
    }
}

/// One white stop-line strip per approach, just before the intersection box
fn spawn_stop_lines(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let line_color = Color::srgb(0.9, 0.9, 0.9);
    let lane_span = 2.0 * INTERSECTION_ZONE;
    // (translation, size) per approach; lines sit across the incoming lanes.
    let lines = [
        (Vec3::new(-INTERSECTION_ZONE, ROAD_HEIGHT, STOP_LINE), Vec3::new(lane_span, 0.02, 1.0)), // north
        (Vec3::new(INTERSECTION_ZONE, ROAD_HEIGHT, -STOP_LINE), Vec3::new(lane_span, 0.02, 1.0)), // south
        (Vec3::new(-STOP_LINE, ROAD_HEIGHT, INTERSECTION_ZONE), Vec3::new(1.0, 0.02, lane_span)), // east
        (Vec3::new(STOP_LINE, ROAD_HEIGHT, -INTERSECTION_ZONE), Vec3::new(1.0, 0.02, lane_span)), // west
    ];

    for (translation, size) in lines {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(materials.add(line_color)),
            Transform::from_translation(translation),
        ));
    }
}

/// Spawn one signal head: a pole with red/yellow/green bulbs as children
fn spawn_signal_head(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    approach: Approach,
) {
    let corner = ROAD_WIDTH / 2.0;
    let position = match approach {
        Approach::North => Vec3::new(-corner, 0.0, corner),
        Approach::South => Vec3::new(corner, 0.0, -corner),
        Approach::East => Vec3::new(corner, 0.0, corner),
        Approach::West => Vec3::new(-corner, 0.0, -corner),
    };

    let pole = commands
        .spawn((
            SignalLink(approach),
            Mesh3d(meshes.add(Cylinder::new(0.4, 8.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.25, 0.25, 0.25))),
            Transform::from_translation(position + Vec3::Y * 4.0),
        ))
        .id();

    // Bulbs top to bottom: red, yellow, green.
    let bulbs = [
        (LightState::Red, 3.5),
        (LightState::Yellow, 2.3),
        (LightState::Green, 1.1),
    ];

    for (state, y) in bulbs {
        let bulb = commands
            .spawn((
                SignalLink(approach),
                SignalBulb(state),
                Mesh3d(meshes.add(Sphere::new(0.5))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.15, 0.15, 0.15),
                    ..default()
                })),
                Transform::from_xyz(0.0, y, 0.0),
            ))
            .id();
        commands.entity(pole).add_child(bulb);
    }
}

/// System to build the HUD: per-pair stats, controller phase, queue history
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Auto,
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(5.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Phase: -"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 0.5)),
                HudText::PhaseStatus,
            ));

            parent.spawn((
                Text::new("NS queue: 0"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.39, 0.52)),
                HudText::NsQueue,
            ));

            parent.spawn((
                Text::new("NS avg speed: 0.0"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.39, 0.52)),
                HudText::NsSpeed,
            ));

            parent.spawn((
                Text::new("EW queue: 0"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.21, 0.64, 0.92)),
                HudText::EwQueue,
            ));

            parent.spawn((
                Text::new("EW avg speed: 0.0"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.21, 0.64, 0.92)),
                HudText::EwSpeed,
            ));

            parent.spawn((
                Text::new("Queue history: -"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                HudText::QueueHistory,
            ));
        });
}
