//! Fixed-cadence vehicle generation timer

/// Seconds between spawn attempts
pub const SPAWN_INTERVAL: f32 = 2.0;

/// Accumulates simulated time and fires once per spawn interval
///
/// Approach and lane selection happens in the world so the spawner stays
/// independent of the RNG; it only owns the cadence.
#[derive(Debug, Clone)]
pub struct VehicleSpawner {
    interval: f32,
    elapsed: f32,
}

impl Default for VehicleSpawner {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL)
    }
}

impl VehicleSpawner {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance the timer and return how many spawns are due
    pub fn update(&mut self, delta_secs: f32) -> u32 {
        self.elapsed += delta_secs;
        let mut due = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due += 1;
        }
        due
    }
}
