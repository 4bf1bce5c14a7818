//! Vehicle motion logic for the intersection simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use super::types::{
    Approach, LightState, Position, VehicleId, DESPAWN_BOUND, SAFE_FOLLOWING_DISTANCE, STOP_LINE,
};

/// Distance band within which a vehicle counts as standing at the line
const STOP_LINE_TOLERANCE: f32 = 0.01;

/// Result of a vehicle update indicating what action should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Vehicle continues moving
    Continue,
    /// Vehicle left the visible bounds and should be removed
    Despawn,
}

/// A vehicle crossing the intersection
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub approach: Approach,
    /// Lane index within the approach (0 = inner, 1 = outer)
    pub lane: u8,
    pub position: Position,
    /// Configured cruising speed in units per second
    pub max_speed: f32,
    /// Speed actually travelled during the last tick
    pub current_speed: f32,
    /// True while blocked before the stop line with a non-green light
    pub waiting: bool,
}

impl SimVehicle {
    pub fn new(id: VehicleId, approach: Approach, lane: u8, max_speed: f32) -> Self {
        Self {
            id,
            approach,
            lane,
            position: approach.spawn_position(lane),
            max_speed,
            current_speed: 0.0,
            waiting: false,
        }
    }

    /// Signed progress along the direction of travel
    ///
    /// Spawn is at `-APPROACH_LENGTH`, the stop line at `-STOP_LINE`, the
    /// intersection center at 0.
    pub fn along(&self) -> f32 {
        self.position.dot(&self.approach.direction())
    }

    /// Whether the vehicle has moved past its stop line
    ///
    /// A vehicle clamped exactly onto the line is still before it, so a
    /// standing vehicle re-checks the light every tick instead of
    /// committing into the intersection.
    pub fn crossed_stop_line(&self) -> bool {
        self.along() > -STOP_LINE + STOP_LINE_TOLERANCE
    }

    /// Advance the vehicle by one tick
    ///
    /// `light` is the current state for this vehicle's pair; `gap_ahead` is
    /// the distance to the next vehicle ahead in the same approach and lane,
    /// if any. Vehicles past the stop line always proceed at full speed so
    /// the intersection clears even through yellow and red.
    pub fn update(
        &mut self,
        delta_secs: f32,
        light: LightState,
        gap_ahead: Option<f32>,
    ) -> VehicleUpdateResult {
        let mut step = self.max_speed * delta_secs;
        let mut blocked = false;

        if !self.crossed_stop_line() {
            // Hold a safe gap behind the vehicle ahead.
            if let Some(gap) = gap_ahead {
                if gap <= step + SAFE_FOLLOWING_DISTANCE {
                    step = 0.0;
                    blocked = true;
                }
            }

            // Clamp at the stop line unless the light is green.
            let distance_to_stop = (-STOP_LINE - self.along()).max(0.0);
            if light != LightState::Green {
                step = step.min(distance_to_stop);
                let at_line = distance_to_stop - step <= STOP_LINE_TOLERANCE;
                self.waiting = at_line || blocked;
            } else {
                self.waiting = false;
            }
        } else {
            self.waiting = false;
        }

        self.position = self.position.advance(&self.approach.direction(), step);
        self.current_speed = if delta_secs > 0.0 {
            step / delta_secs
        } else {
            0.0
        };

        if self.position.x.abs() > DESPAWN_BOUND || self.position.z.abs() > DESPAWN_BOUND {
            VehicleUpdateResult::Despawn
        } else {
            VehicleUpdateResult::Continue
        }
    }
}
