//! Standalone intersection simulation module
//!
//! This module contains all the core simulation and control logic that can
//! run independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full UI.

mod controller;
mod history;
mod metrics;
mod spawner;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use controller::{
    green_times, ControllerConfig, LightSink, Phase, SignalController,
};
#[allow(unused_imports)]
pub use history::{QueueHistory, QueueSample, HISTORY_CAPACITY};
#[allow(unused_imports)]
pub use metrics::{TrafficData, TrafficSnapshot, TrafficSource};
#[allow(unused_imports)]
pub use spawner::{VehicleSpawner, SPAWN_INTERVAL};
#[allow(unused_imports)]
pub use types::{
    Approach, ApproachPair, LightState, Position, SimId, VehicleId, APPROACH_LENGTH,
    DESPAWN_BOUND, INTERSECTION_ZONE, LANE_COUNT, SAFE_FOLLOWING_DISTANCE, SPAWN_CLEARANCE,
    STOP_LINE,
};
#[allow(unused_imports)]
pub use vehicle::{SimVehicle, VehicleUpdateResult};
pub use world::SimWorld;
