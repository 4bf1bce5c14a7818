//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation and control
//! logic is in the `simulation` module. The UI reads state from
//! `SimResource` and renders it using Bevy's 3D graphics.

mod components;
mod input;
mod spawner;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimResource};

use input::{handle_camera_movement, handle_input};
use spawner::{setup_hud, spawn_static_visuals};
use sync::{sync_vehicles, tick_simulation, update_hud_text, update_signal_bulbs};
use world::setup_world;

/// Plugin to register all UI systems
pub struct IntersectionSimUIPlugin;

impl Plugin for IntersectionSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimResource>()
            .init_resource::<EntityMappings>()
            .init_resource::<components::CameraSettings>()
            .add_systems(Startup, (setup_world, spawn_static_visuals, setup_hud))
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    sync_vehicles,
                    update_signal_bulbs,
                    update_hud_text,
                    handle_input,
                    handle_camera_movement,
                ),
            );
    }
}
