//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;

use super::components::{
    EntityMappings, HudText, SignalBulb, SignalLink, SimResource, SimSynced, VehicleLink,
};
use crate::simulation::{LightState, VehicleId};

/// System to run the simulation tick and the signal controller
pub fn tick_simulation(time: Res<Time>, mut sim: ResMut<SimResource>) {
    let delta = time.delta_secs();
    let SimResource { world, controller } = &mut *sim;
    world.tick(delta);
    controller.update(delta, world);
}

/// System to sync vehicle visuals from simulation state
pub fn sync_vehicles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: Res<SimResource>,
    mut mappings: ResMut<EntityMappings>,
    mut vehicle_query: Query<(Entity, &VehicleLink, &mut Transform)>,
) {
    let world = &sim.world;
    const VEHICLE_SIZE: Vec3 = Vec3::new(3.0, 2.0, 6.0);
    const VEHICLE_Y: f32 = 1.0;

    // Update existing vehicles and track which ones still exist
    let mut existing_ids: std::collections::HashSet<VehicleId> = std::collections::HashSet::new();

    for (entity, link, mut transform) in vehicle_query.iter_mut() {
        if let Some(vehicle) = world.vehicles.get(&link.0) {
            existing_ids.insert(link.0);
            transform.translation =
                Vec3::new(vehicle.position.x, VEHICLE_Y, vehicle.position.z);
            transform.rotation = Quat::from_rotation_y(vehicle.approach.heading());
        } else {
            // Vehicle no longer exists in simulation, despawn
            commands.entity(entity).despawn();
            mappings.vehicles.remove(&link.0);
        }
    }

    // Spawn new vehicles
    for (id, vehicle) in &world.vehicles {
        if !existing_ids.contains(id) {
            let entity = commands
                .spawn((
                    SimSynced,
                    VehicleLink(*id),
                    Mesh3d(meshes.add(Cuboid::new(
                        VEHICLE_SIZE.x,
                        VEHICLE_SIZE.y,
                        VEHICLE_SIZE.z,
                    ))),
                    MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
                    Transform::from_translation(Vec3::new(
                        vehicle.position.x,
                        VEHICLE_Y,
                        vehicle.position.z,
                    ))
                    .with_rotation(Quat::from_rotation_y(vehicle.approach.heading())),
                ))
                .id();
            mappings.vehicles.insert(*id, entity);
        }
    }
}

/// System to light the active bulb on each signal head
pub fn update_signal_bulbs(
    sim: Res<SimResource>,
    bulb_query: Query<(&SignalLink, &SignalBulb, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (link, bulb, material_handle) in bulb_query.iter() {
        let pair_state = sim.world.light_for(link.0.pair());
        let active = pair_state == bulb.0;

        if let Some(material) = materials.get_mut(&material_handle.0) {
            let lit = match bulb.0 {
                LightState::Red => Color::srgb(1.0, 0.1, 0.1),
                LightState::Yellow => Color::srgb(1.0, 0.85, 0.1),
                LightState::Green => Color::srgb(0.1, 1.0, 0.2),
            };
            if active {
                material.base_color = lit;
                material.emissive = lit.to_linear() * 2.0;
            } else {
                material.base_color = Color::srgb(0.15, 0.15, 0.15);
                material.emissive = LinearRgba::BLACK;
            }
        }
    }
}

/// System to update the HUD text from the latest snapshot
pub fn update_hud_text(sim: Res<SimResource>, mut text_query: Query<(&HudText, &mut Text)>) {
    let data = sim.world.traffic_snapshot();

    for (hud, mut text) in text_query.iter_mut() {
        match hud {
            HudText::NsQueue => {
                **text = format!("NS queue: {}", data.ns.waiting);
            }
            HudText::EwQueue => {
                **text = format!("EW queue: {}", data.ew.waiting);
            }
            HudText::NsSpeed => {
                **text = format!("NS avg speed: {:.1}", data.ns.avg_speed);
            }
            HudText::EwSpeed => {
                **text = format!("EW avg speed: {:.1}", data.ew.avg_speed);
            }
            HudText::PhaseStatus => {
                **text = match sim.controller.phase() {
                    Some(phase) => format!(
                        "Phase: {:?} ({:.0}s left)",
                        phase,
                        sim.controller.time_remaining()
                    ),
                    None => "Phase: halted".to_string(),
                };
            }
            HudText::QueueHistory => {
                if sim.world.history.is_empty() {
                    **text = "Queue history: -".to_string();
                } else {
                    let samples: Vec<String> = sim
                        .world
                        .history
                        .samples()
                        .map(|s| format!("{}/{}", s.ns_waiting, s.ew_waiting))
                        .collect();
                    **text = format!("Queue history (ns/ew): {}", samples.join(" "));
                }
            }
        }
    }
}
