//! Main simulation world that ties everything together
//!
//! This is the entry point for running the intersection simulation without
//! any Bevy dependencies. The world owns the vehicles and the light state;
//! the light state is written only through the `LightSink` implementation,
//! which the signal controller drives.

use anyhow::{bail, Result};
use log::debug;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use super::controller::LightSink;
use super::history::QueueHistory;
use super::metrics::{TrafficData, TrafficSnapshot, TrafficSource};
use super::spawner::VehicleSpawner;
use super::types::{
    Approach, ApproachPair, LightState, SimId, VehicleId, LANE_COUNT, SPAWN_CLEARANCE,
};
use super::vehicle::{SimVehicle, VehicleUpdateResult};

/// Cruising speed range for spawned vehicles, units per second
const MIN_VEHICLE_SPEED: f32 = 8.0;
const MAX_VEHICLE_SPEED: f32 = 14.0;

/// Seconds between queue-history samples
const HISTORY_SAMPLE_INTERVAL: f32 = 1.0;

/// The main simulation world
pub struct SimWorld {
    /// All live vehicles
    pub vehicles: HashMap<VehicleId, SimVehicle>,

    /// Rolling queue-length window for display
    pub history: QueueHistory,

    /// Light state for the north-south pair
    ns_light: LightState,

    /// Light state for the east-west pair
    ew_light: LightState,

    /// Spawn cadence timer
    spawner: VehicleSpawner,

    /// Random spawning can be turned off for scripted scenarios
    spawning_enabled: bool,

    /// Snapshot published by the controller at the last cycle start
    last_cycle: Option<TrafficData>,

    /// Next ID to assign
    next_id: usize,

    /// Simulation time
    pub time: f32,

    /// Time since the last history sample
    sample_timer: f32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>) -> Self {
        Self {
            vehicles: HashMap::new(),
            history: QueueHistory::default(),
            ns_light: LightState::Red,
            ew_light: LightState::Red,
            spawner: VehicleSpawner::default(),
            spawning_enabled: true,
            last_cycle: None,
            next_id: 0,
            time: 0.0,
            sample_timer: 0.0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current light state for an approach pair
    pub fn light_for(&self, pair: ApproachPair) -> LightState {
        match pair {
            ApproachPair::NorthSouth => self.ns_light,
            ApproachPair::EastWest => self.ew_light,
        }
    }

    /// Current (ns, ew) light states
    pub fn lights(&self) -> (LightState, LightState) {
        (self.ns_light, self.ew_light)
    }

    /// Snapshot published at the last cycle start, if any cycle has run
    pub fn last_cycle(&self) -> Option<&TrafficData> {
        self.last_cycle.as_ref()
    }

    /// Enable or disable random spawning (on by default)
    ///
    /// Scripted scenarios and tests spawn their own vehicles.
    pub fn set_spawning(&mut self, enabled: bool) {
        self.spawning_enabled = enabled;
    }

    /// Spawn a vehicle on the given approach and lane
    ///
    /// Returns None when another vehicle occupies the spawn area; the
    /// clearance check keeps spawns from stacking onto a standing queue.
    pub fn spawn_vehicle(
        &mut self,
        approach: Approach,
        lane: u8,
        max_speed: f32,
    ) -> Option<VehicleId> {
        let id = VehicleId(self.next_sim_id());
        let vehicle = SimVehicle::new(id, approach, lane, max_speed);
        let spawn_along = vehicle.along();

        let too_close = self.vehicles.values().any(|other| {
            other.approach == approach
                && other.lane == lane
                && (other.along() - spawn_along).abs() < SPAWN_CLEARANCE
        });
        if too_close {
            return None;
        }

        debug!(
            "spawned vehicle {:?} on {:?} lane {} at {:.1} u/s",
            id, approach, lane, max_speed
        );
        self.vehicles.insert(id, vehicle);
        Some(id)
    }

    /// Spawn a vehicle with random approach, lane, and speed
    pub fn spawn_random_vehicle(&mut self) -> Option<VehicleId> {
        let approach = *self.choose_random(&Approach::ALL)?;
        let lane = self.random_range(0.0..LANE_COUNT as f32) as u8;
        let speed = self.random_range(MIN_VEHICLE_SPEED..MAX_VEHICLE_SPEED);
        self.spawn_vehicle(approach, lane, speed)
    }

    /// Distance to the nearest vehicle ahead in each vehicle's lane
    ///
    /// Lane ordering uses progress-keyed BTreeMaps so the lookup stays
    /// logarithmic as queues build up.
    fn gaps_ahead(&self) -> HashMap<VehicleId, f32> {
        let mut lanes: HashMap<(Approach, u8), BTreeMap<OrderedFloat<f32>, VehicleId>> =
            HashMap::new();
        for vehicle in self.vehicles.values() {
            lanes
                .entry((vehicle.approach, vehicle.lane))
                .or_default()
                .insert(OrderedFloat(vehicle.along()), vehicle.id);
        }

        let mut gaps = HashMap::new();
        for lane in lanes.values() {
            for (&along, &id) in lane {
                let ahead = lane
                    .range((Bound::Excluded(along), Bound::Unbounded))
                    .next();
                if let Some((&ahead_along, _)) = ahead {
                    gaps.insert(id, (ahead_along - along).into_inner());
                }
            }
        }
        gaps
    }

    /// Update all vehicles and remove the ones that left the bounds
    fn update_vehicles(&mut self, delta_secs: f32) {
        let gaps = self.gaps_ahead();

        // Sorted order keeps same-seed runs byte-for-byte identical.
        let mut vehicle_ids: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        vehicle_ids.sort_by_key(|id| id.0 .0);

        let mut despawned = Vec::new();
        for vehicle_id in vehicle_ids {
            let light = match self.vehicles.get(&vehicle_id) {
                Some(vehicle) => self.light_for(vehicle.approach.pair()),
                None => continue,
            };

            if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                let gap = gaps.get(&vehicle_id).copied();
                if vehicle.update(delta_secs, light, gap) == VehicleUpdateResult::Despawn {
                    despawned.push(vehicle_id);
                }
            }
        }

        for vehicle_id in despawned {
            self.vehicles.remove(&vehicle_id);
            debug!("vehicle {:?} left the bounds", vehicle_id);
        }
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32) {
        self.time += delta_secs;

        for _ in 0..self.spawner.update(delta_secs) {
            if self.spawning_enabled {
                self.spawn_random_vehicle();
            }
        }

        self.update_vehicles(delta_secs);

        self.sample_timer += delta_secs;
        if self.sample_timer >= HISTORY_SAMPLE_INTERVAL {
            self.sample_timer -= HISTORY_SAMPLE_INTERVAL;
            let data = self.traffic_snapshot();
            self.history.record(self.time, &data);
        }
    }

    /// Aggregate per-pair traffic metrics
    ///
    /// Recomputed on every call; vehicle state changes each tick, so the
    /// result is never cached.
    pub fn traffic_snapshot(&self) -> TrafficData {
        TrafficData {
            ns: self.pair_snapshot(ApproachPair::NorthSouth),
            ew: self.pair_snapshot(ApproachPair::EastWest),
        }
    }

    fn pair_snapshot(&self, pair: ApproachPair) -> TrafficSnapshot {
        let mut count = 0;
        let mut waiting = 0;
        let mut moving_speed_sum = 0.0;
        let mut moving = 0;

        for vehicle in self.vehicles.values() {
            if vehicle.approach.pair() != pair {
                continue;
            }
            count += 1;
            if vehicle.waiting {
                waiting += 1;
            } else {
                moving += 1;
                moving_speed_sum += vehicle.current_speed;
            }
        }

        let avg_speed = if moving > 0 {
            moving_speed_sum / moving as f32
        } else {
            0.0
        };

        TrafficSnapshot {
            count,
            waiting,
            avg_speed,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let data = self.traffic_snapshot();
        println!("=== Intersection Summary ===");
        println!("Time: {:.2}s", self.time);
        println!("Vehicles: {}", self.vehicles.len());
        println!(
            "Lights: NS={:?}, EW={:?}",
            self.ns_light, self.ew_light
        );
        println!(
            "NS: count={}, waiting={}, avg_speed={:.2}",
            data.ns.count, data.ns.waiting, data.ns.avg_speed
        );
        println!(
            "EW: count={}, waiting={}, avg_speed={:.2}",
            data.ew.count, data.ew.waiting, data.ew.avg_speed
        );

        if !self.history.is_empty() {
            let samples: Vec<String> = self
                .history
                .samples()
                .map(|s| format!("{}/{}", s.ns_waiting, s.ew_waiting))
                .collect();
            println!("Queue history (ns/ew): {}", samples.join(" "));
        }
    }

    /// Draw a visual map of the intersection in the terminal
    pub fn draw_map(&self) {
        const HALF_EXTENT: f32 = 60.0;
        const SCALE_X: f32 = 0.4;
        const SCALE_Z: f32 = 0.2;

        let width = (2.0 * HALF_EXTENT * SCALE_X) as usize;
        let height = (2.0 * HALF_EXTENT * SCALE_Z) as usize;
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |x: f32, z: f32| -> (usize, usize) {
            let col = ((HALF_EXTENT - x) * SCALE_X) as usize;
            let row = ((HALF_EXTENT - z) * SCALE_Z) as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        // Road surface: two crossing bands through the center.
        for (row, line) in grid.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let x = HALF_EXTENT - (col as f32 + 0.5) / SCALE_X;
                let z = HALF_EXTENT - (row as f32 + 0.5) / SCALE_Z;
                let on_ns_road = x.abs() <= 20.0;
                let on_ew_road = z.abs() <= 20.0;
                if on_ns_road && on_ew_road {
                    *cell = '+';
                } else if on_ns_road || on_ew_road {
                    *cell = '.';
                }
            }
        }

        // Vehicles, waiting ones drawn differently.
        for vehicle in self.vehicles.values() {
            if vehicle.position.x.abs() > HALF_EXTENT || vehicle.position.z.abs() > HALF_EXTENT {
                continue;
            }
            let (row, col) = to_grid(vehicle.position.x, vehicle.position.z);
            grid[row][col] = if vehicle.waiting { 'W' } else { 'V' };
        }

        println!("=== Intersection Map ===");
        println!("Legend: V=Vehicle, W=Waiting, .=Road, +=Intersection");
        println!("Lights: NS={:?}, EW={:?}", self.ns_light, self.ew_light);
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}

impl TrafficSource for SimWorld {
    fn traffic_snapshot(&self) -> Result<TrafficData> {
        Ok(SimWorld::traffic_snapshot(self))
    }
}

impl LightSink for SimWorld {
    /// Apply controller-commanded light states
    ///
    /// Rejects commands that would show green to both conflicting pairs;
    /// the controller never emits one, and the world refuses to display it.
    fn set_lights(&mut self, ns: LightState, ew: LightState) -> Result<()> {
        if ns == LightState::Green && ew == LightState::Green {
            bail!("conflicting command: both pairs green");
        }
        self.ns_light = ns;
        self.ew_light = ew;
        Ok(())
    }

    fn record_cycle(&mut self, data: &TrafficData) -> Result<()> {
        self.last_cycle = Some(*data);
        Ok(())
    }
}
