#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values. Systems read
//! immutable views ([`FollowerView`], [`TowerView`]) plus the shared [`Path`]
//! and respond exclusively with new command batches.
//!
//! Time crosses every public boundary as [`Duration`]. Speeds are world units
//! per [`SPEED_TIME_BASE`]; use [`base_units`] and
//! [`duration_from_base_units`] to move between the two.

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

mod follower;
mod path;

pub use follower::{Follower, FollowerError};
pub use path::{Path, PathError};

/// Time span over which every speed in the engine is measured.
///
/// A follower with speed `30.0` covers thirty world units per
/// `SPEED_TIME_BASE`. This is the only place the time unit is chosen.
pub const SPEED_TIME_BASE: Duration = Duration::from_secs(1);

/// Expresses `duration` as a multiple of [`SPEED_TIME_BASE`].
#[must_use]
pub fn base_units(duration: Duration) -> f32 {
    duration.as_secs_f32() / SPEED_TIME_BASE.as_secs_f32()
}

/// Converts a multiple of [`SPEED_TIME_BASE`] back into a [`Duration`].
///
/// Returns `None` for negative, non-finite or unrepresentable values.
#[must_use]
pub fn duration_from_base_units(units: f32) -> Option<Duration> {
    if !units.is_finite() || units < 0.0 {
        return None;
    }

    if units == 0.0 {
        return Some(Duration::ZERO);
    }

    Duration::try_from_secs_f32(units * SPEED_TIME_BASE.as_secs_f32()).ok()
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new follower enter the path at its first waypoint.
    SpawnFollower {
        /// Travel speed in world units per [`SPEED_TIME_BASE`].
        speed: f32,
        /// Starting health of the follower.
        health: Health,
    },
    /// Requests placement of a tower on the provided cell.
    PlaceTower {
        /// Cell the tower occupies.
        cell: CellCoord,
        /// Firing characteristics supplied by the caller.
        profile: TowerProfile,
    },
    /// Requests that a tower launch a projectile toward an aim point.
    FireProjectile {
        /// Tower launching the projectile.
        tower: TowerId,
        /// Follower the projectile is meant to hit.
        follower: FollowerId,
        /// Muzzle position the projectile leaves from.
        origin: Vec3,
        /// Predicted interception point.
        aim: Vec3,
        /// Time the projectile needs to reach the aim point.
        flight_time: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a follower entered the path.
    FollowerSpawned {
        /// Identifier allocated to the follower.
        follower: FollowerId,
        /// World position of the first waypoint.
        position: Vec2,
    },
    /// Reports that a spawn request was rejected.
    FollowerSpawnRejected {
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a follower reached its next waypoint.
    FollowerAdvanced {
        /// Identifier of the follower that advanced.
        follower: FollowerId,
        /// Index of the waypoint that was reached.
        path_index: usize,
    },
    /// Announces that a follower reached the final waypoint and left play.
    FollowerEscaped {
        /// Identifier of the follower that escaped.
        follower: FollowerId,
    },
    /// Announces that a follower's health was depleted and it left play.
    FollowerKilled {
        /// Identifier of the follower that was eliminated.
        follower: FollowerId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a projectile left its tower.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Follower the projectile is meant to hit.
        follower: FollowerId,
        /// Predicted interception point.
        aim: Vec3,
        /// Time until the projectile arrives.
        flight_time: Duration,
    },
    /// Reports that a firing request was rejected.
    ProjectileFireRejected {
        /// Tower named in the request.
        tower: TowerId,
        /// Follower named in the request.
        follower: FollowerId,
        /// Specific reason the request failed.
        reason: FireError,
    },
    /// Reports that a projectile reached its aim point.
    ProjectileArrived {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Follower the projectile was meant to hit.
        follower: FollowerId,
        /// Whether the follower was still in play and took damage.
        hit: bool,
    },
}

/// Unique identifier assigned to a path follower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FollowerId(u32);

impl FollowerId {
    /// Creates a new follower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World position of the cell's origin corner. Waypoints resolve here.
    #[must_use]
    pub fn corner(self, cell_length: f32) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32) * cell_length
    }

    /// World position of the cell's centre. Towers stand here.
    #[must_use]
    pub fn center(self, cell_length: f32) -> Vec2 {
        self.corner(cell_length) + Vec2::splat(cell_length / 2.0)
    }
}

/// Remaining hit points of a follower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts `damage`, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Firing characteristics of a tower, supplied by the caller.
///
/// The engine treats every field as an opaque input; balancing lives
/// outside this workspace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerProfile {
    /// Minimum time between two shots.
    pub cooldown: Duration,
    /// Projectile speed in world units per [`SPEED_TIME_BASE`].
    pub projectile_speed: f32,
    /// Health removed from the target when a projectile arrives.
    pub damage: u32,
    /// Height of the muzzle above the ground plane.
    pub muzzle_height: f32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested cell is part of the follower path.
    OnPath,
    /// Another tower already stands on the requested cell.
    Occupied,
    /// The profile's projectile speed is zero, negative or not finite.
    InvalidProfile,
}

/// Reasons a firing request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// No follower with the provided identifier is in play.
    MissingFollower,
    /// The tower has not finished its cooldown.
    CoolingDown,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnError {
    /// The requested speed is zero, negative or not finite.
    InvalidSpeed,
    /// The requested health is zero.
    NoHealth,
}

/// Immutable representation of a single follower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowerSnapshot {
    /// Unique identifier assigned to the follower.
    pub id: FollowerId,
    /// Path position and speed.
    pub follower: Follower,
    /// Health that remains right now.
    pub health: Health,
    /// Health that will remain once every in-flight projectile lands.
    pub committed_health: Health,
}

impl FollowerSnapshot {
    /// Reports whether towers should still spend shots on the follower.
    #[must_use]
    pub const fn is_viable(&self) -> bool {
        !self.committed_health.is_depleted()
    }
}

/// Read-only snapshot describing all followers on the path.
#[derive(Clone, Debug, Default)]
pub struct FollowerView {
    snapshots: Vec<FollowerSnapshot>,
}

impl FollowerView {
    /// Creates a new follower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<FollowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured follower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &FollowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for `id`.
    #[must_use]
    pub fn get(&self, id: FollowerId) -> Option<&FollowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of followers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no followers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Firing characteristics of the tower.
    pub profile: TowerProfile,
    /// World position projectiles leave from.
    pub muzzle: Vec3,
    /// Time until the tower may fire again. Zero when ready.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for `id`.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Target assignment produced by the tower targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that should engage.
    pub tower: TowerId,
    /// Follower selected for the tower.
    pub follower: FollowerId,
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Follower the projectile is meant to hit.
    pub follower: FollowerId,
    /// Muzzle position the projectile left from.
    pub origin: Vec3,
    /// Predicted interception point.
    pub aim: Vec3,
    /// Total time of flight.
    pub flight_time: Duration,
    /// Time already spent in flight.
    pub elapsed: Duration,
}

impl ProjectileSnapshot {
    /// Current position along the straight line from origin to aim point.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        if self.flight_time.is_zero() {
            return self.aim;
        }

        let progress = (self.elapsed.as_secs_f32() / self.flight_time.as_secs_f32()).min(1.0);
        self.origin.lerp(self.aim, progress)
    }
}
