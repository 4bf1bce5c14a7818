//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on Bevy.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub SimId);

/// One of the four compass directions vehicles travel from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    /// All approaches, in spawn-selection order
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::South,
        Approach::East,
        Approach::West,
    ];

    /// The signal pair this approach belongs to
    pub fn pair(self) -> ApproachPair {
        match self {
            Approach::North | Approach::South => ApproachPair::NorthSouth,
            Approach::East | Approach::West => ApproachPair::EastWest,
        }
    }

    /// Unit direction of travel for this approach
    pub fn direction(self) -> Position {
        match self {
            Approach::North => Position::new(0.0, 0.0, -1.0),
            Approach::South => Position::new(0.0, 0.0, 1.0),
            Approach::East => Position::new(1.0, 0.0, 0.0),
            Approach::West => Position::new(-1.0, 0.0, 0.0),
        }
    }

    /// Spawn position at the edge of the visible area for the given lane
    pub fn spawn_position(self, lane: u8) -> Position {
        let lane_offset = 10.0 * lane as f32;
        match self {
            Approach::North => Position::new(-15.0 + lane_offset, 0.0, APPROACH_LENGTH),
            Approach::South => Position::new(15.0 - lane_offset, 0.0, -APPROACH_LENGTH),
            Approach::East => Position::new(-APPROACH_LENGTH, 0.0, -15.0 + lane_offset),
            Approach::West => Position::new(APPROACH_LENGTH, 0.0, 15.0 - lane_offset),
        }
    }

    /// Heading angle (Y-axis rotation) for rendering
    pub fn heading(self) -> f32 {
        match self {
            Approach::North => std::f32::consts::PI,
            Approach::South => 0.0,
            Approach::East => std::f32::consts::FRAC_PI_2,
            Approach::West => -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Two opposing, non-conflicting approaches sharing one light phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproachPair {
    NorthSouth,
    EastWest,
}

/// State of the signal head controlling one approach pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    #[default]
    Red,
    Yellow,
    Green,
}

/// A 3D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product against another position treated as a vector
    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Advance along a unit direction by the given distance
    pub fn advance(&self, direction: &Position, distance: f32) -> Position {
        Position {
            x: self.x + direction.x * distance,
            y: self.y + direction.y * distance,
            z: self.z + direction.z * distance,
        }
    }
}

/// Distance from the intersection center at which vehicles spawn
pub const APPROACH_LENGTH: f32 = 150.0;

/// Vehicles past this bound on either axis are removed
pub const DESPAWN_BOUND: f32 = 200.0;

/// Distance from the intersection center to the stop line
pub const STOP_LINE: f32 = 15.0;

/// Half-extent of the intersection box; vehicles inside never stop
pub const INTERSECTION_ZONE: f32 = 10.0;

/// Number of lanes per approach
pub const LANE_COUNT: u8 = 2;

/// Minimum gap kept behind the vehicle ahead in the same lane
pub const SAFE_FOLLOWING_DISTANCE: f32 = 12.0;

/// No spawn happens within this distance of a same-lane vehicle
pub const SPAWN_CLEARANCE: f32 = 30.0;
