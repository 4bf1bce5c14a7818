//! Traffic metrics consumed by the signal controller
//!
//! Snapshots are aggregates only; the controller never reaches into
//! individual vehicle state.

use anyhow::Result;

/// Point-in-time aggregate for one approach pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrafficSnapshot {
    /// Live vehicles whose approach belongs to this pair
    pub count: usize,
    /// Subset currently blocked before the stop line
    pub waiting: usize,
    /// Mean speed magnitude of the non-waiting vehicles, 0 if none
    pub avg_speed: f32,
}

/// Per-pair snapshots for both conflicting pairs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrafficData {
    pub ns: TrafficSnapshot,
    pub ew: TrafficSnapshot,
}

/// Source of traffic metrics, injected into the signal controller
///
/// Implementations must recompute the snapshot on every call; vehicle state
/// changes each simulation tick, so cached values would be stale.
pub trait TrafficSource {
    fn traffic_snapshot(&self) -> Result<TrafficData>;
}
