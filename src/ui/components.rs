//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{
    Approach, ControllerConfig, LightState, SignalController, SimWorld, VehicleId,
};

/// Resource wrapper holding the simulation world and its signal controller
#[derive(Resource)]
pub struct SimResource {
    pub world: SimWorld,
    pub controller: SignalController,
}

impl Default for SimResource {
    fn default() -> Self {
        Self {
            world: SimWorld::new(),
            controller: SignalController::new(ControllerConfig::default()),
        }
    }
}

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Resource to control camera movement settings
#[derive(Resource)]
pub struct CameraSettings {
    pub movement_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            movement_speed: 50.0,
            zoom_speed: 30.0,
        }
    }
}

/// Marker for entities synced from simulation
#[derive(Component)]
pub struct SimSynced;

/// Links a Bevy entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// Marks a signal head serving one approach
#[derive(Component)]
pub struct SignalLink(pub Approach);

/// Marks one bulb of a signal head and the state it displays
#[derive(Component)]
pub struct SignalBulb(pub LightState);

/// Resource to track Bevy entities mapped to simulation vehicles
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub vehicles: HashMap<VehicleId, Entity>,
}

/// Marker for HUD text elements
#[derive(Component)]
pub enum HudText {
    /// Waiting vehicles on the north-south pair
    NsQueue,
    /// Waiting vehicles on the east-west pair
    EwQueue,
    /// Average speed on the north-south pair
    NsSpeed,
    /// Average speed on the east-west pair
    EwSpeed,
    /// Current controller phase and time remaining
    PhaseStatus,
    /// Rolling queue-length history
    QueueHistory,
}
