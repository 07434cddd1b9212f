#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The world owns every follower, tower and projectile. Adapters and systems
//! never mutate it directly; they submit [`Command`] values through [`apply`]
//! and observe the resulting [`Event`] stream together with the read-only
//! accessors in [`query`].

use std::time::Duration;

use glam::Vec3;
use path_defence_core::{
    CellCoord, Command, Event, FireError, Follower, FollowerId, Health, Path, PlacementError,
    ProjectileId, SpawnError, TowerId, TowerProfile,
};
use path_defence_system_motion::advance;
use thiserror::Error;

mod followers;
mod projectiles;
mod towers;

use followers::FollowerRegistry;
use projectiles::{Launch, ProjectileRegistry, ProjectileState};
use towers::TowerRegistry;

/// Reasons a world cannot be constructed from a configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The grid has no columns or no rows.
    #[error("grid of {columns}x{rows} cells has no area")]
    EmptyGrid {
        /// Configured number of columns.
        columns: u32,
        /// Configured number of rows.
        rows: u32,
    },
    /// A waypoint lies outside the grid.
    #[error("waypoint {index} at ({column}, {row}) lies outside the grid")]
    WaypointOutOfBounds {
        /// Position of the waypoint within the path.
        index: usize,
        /// Column of the offending waypoint.
        column: u32,
        /// Row of the offending waypoint.
        row: u32,
    },
}

/// Static layout used to build a [`World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Number of cell columns in the grid.
    pub columns: u32,
    /// Number of cell rows in the grid.
    pub rows: u32,
    /// Route every follower walks.
    pub path: Path,
}

/// Describes the discrete cell layout of the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl Grid {
    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    path: Path,
    followers: FollowerRegistry,
    towers: TowerRegistry,
    projectiles: ProjectileRegistry,
    elapsed: Duration,
    arrived: Vec<ProjectileState>,
    escaped: Vec<FollowerId>,
}

impl World {
    /// Creates an empty world after checking that the path fits the grid.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let WorldConfig {
            columns,
            rows,
            path,
        } = config;

        if columns == 0 || rows == 0 {
            return Err(WorldError::EmptyGrid { columns, rows });
        }

        let grid = Grid {
            columns,
            rows,
            cell_length: path.cell_length(),
        };

        if let Some((index, cell)) = path
            .waypoints()
            .iter()
            .enumerate()
            .find(|(_, cell)| !grid.contains(**cell))
        {
            return Err(WorldError::WaypointOutOfBounds {
                index,
                column: cell.column(),
                row: cell.row(),
            });
        }

        Ok(Self {
            grid,
            path,
            followers: FollowerRegistry::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            elapsed: Duration::ZERO,
            arrived: Vec::new(),
            escaped: Vec::new(),
        })
    }

    fn advance_followers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.escaped.clear();

        for state in self.followers.iter_mut() {
            let first_reached = state.follower.path_index + 1;
            let outcome = advance(&mut state.follower, &self.path, dt);

            for path_index in first_reached..first_reached + outcome.arrivals {
                out_events.push(Event::FollowerAdvanced {
                    follower: state.id,
                    path_index,
                });
            }

            if outcome.finished {
                self.escaped.push(state.id);
            }
        }

        for follower in self.escaped.drain(..) {
            if self.followers.remove(follower).is_some() {
                log::info!("follower {} escaped", follower.get());
                out_events.push(Event::FollowerEscaped { follower });
            }
        }
    }

    fn land_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.arrived.clear();
        self.projectiles.advance(dt, &mut self.arrived);

        for projectile in self.arrived.drain(..) {
            let follower = projectile.follower;
            let Some(state) = self.followers.get_mut(follower) else {
                out_events.push(Event::ProjectileArrived {
                    projectile: projectile.id,
                    follower,
                    hit: false,
                });
                continue;
            };

            state.health = state.health.saturating_sub(projectile.damage);
            let killed = state.health.is_depleted();
            out_events.push(Event::ProjectileArrived {
                projectile: projectile.id,
                follower,
                hit: true,
            });

            if killed && self.followers.remove(follower).is_some() {
                log::info!("follower {} killed", follower.get());
                out_events.push(Event::FollowerKilled { follower });
            }
        }
    }

    fn spawn_follower(&mut self, speed: f32, health: Health) -> Result<(FollowerId, Follower), SpawnError> {
        if health.is_depleted() {
            return Err(SpawnError::NoHealth);
        }

        // Paths always hold a first waypoint, so only the speed can be invalid.
        let follower = Follower::spawn(&self.path, speed).map_err(|_| SpawnError::InvalidSpeed)?;
        Ok((self.followers.insert(follower, health), follower))
    }

    fn place_tower(&mut self, cell: CellCoord, profile: TowerProfile) -> Result<TowerId, PlacementError> {
        if !self.grid.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if self.path.contains(cell) {
            return Err(PlacementError::OnPath);
        }

        if self.towers.is_occupied(cell) {
            return Err(PlacementError::Occupied);
        }

        if !is_valid_profile(&profile) {
            return Err(PlacementError::InvalidProfile);
        }

        let muzzle = cell
            .center(self.grid.cell_length)
            .extend(profile.muzzle_height);
        Ok(self.towers.insert(cell, profile, muzzle))
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        follower: FollowerId,
        aim: Vec3,
        flight_time: Duration,
    ) -> Result<(ProjectileId, Vec3), FireError> {
        let tower_state = self.towers.get_mut(tower).ok_or(FireError::MissingTower)?;
        if !tower_state.ready_in.is_zero() {
            return Err(FireError::CoolingDown);
        }

        let follower_state = self
            .followers
            .get_mut(follower)
            .ok_or(FireError::MissingFollower)?;

        let damage = tower_state.profile.damage;
        follower_state.committed_health = follower_state.committed_health.saturating_sub(damage);
        tower_state.ready_in = tower_state.profile.cooldown;

        let origin = tower_state.muzzle;
        let projectile = self.projectiles.launch(Launch {
            tower,
            follower,
            origin,
            aim,
            flight_time,
            damage,
        });
        Ok((projectile, origin))
    }
}

fn is_valid_profile(profile: &TowerProfile) -> bool {
    profile.projectile_speed.is_finite()
        && profile.projectile_speed > 0.0
        && profile.muzzle_height.is_finite()
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            world.towers.cool_down(dt);
            world.advance_followers(dt, out_events);
            world.land_projectiles(dt, out_events);
        }
        Command::SpawnFollower { speed, health } => match world.spawn_follower(speed, health) {
            Ok((follower, spawned)) => out_events.push(Event::FollowerSpawned {
                follower,
                position: spawned.position,
            }),
            Err(reason) => {
                log::debug!("follower spawn rejected: {reason:?}");
                out_events.push(Event::FollowerSpawnRejected { reason });
            }
        },
        Command::PlaceTower { cell, profile } => match world.place_tower(cell, profile) {
            Ok(tower) => out_events.push(Event::TowerPlaced { tower, cell }),
            Err(reason) => {
                log::debug!(
                    "tower placement at ({}, {}) rejected: {reason:?}",
                    cell.column(),
                    cell.row()
                );
                out_events.push(Event::TowerPlacementRejected { cell, reason });
            }
        },
        Command::FireProjectile {
            tower,
            follower,
            origin,
            aim,
            flight_time,
        } => match world.fire_projectile(tower, follower, aim, flight_time) {
            Ok((projectile, muzzle)) => {
                if muzzle != origin {
                    log::warn!(
                        "tower {} fired from its muzzle instead of the requested origin",
                        tower.get()
                    );
                }
                out_events.push(Event::ProjectileFired {
                    projectile,
                    tower,
                    follower,
                    aim,
                    flight_time,
                });
            }
            Err(reason) => {
                log::debug!(
                    "tower {} cannot fire at follower {}: {reason:?}",
                    tower.get(),
                    follower.get()
                );
                out_events.push(Event::ProjectileFireRejected {
                    tower,
                    follower,
                    reason,
                });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, World};
    use path_defence_core::{FollowerView, Path, ProjectileSnapshot, TowerView};

    /// Provides read-only access to the route every follower walks.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Provides read-only access to the world's cell layout.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Total simulated time since the world was created.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Captures a read-only view of the followers still in play.
    #[must_use]
    pub fn follower_view(world: &World) -> FollowerView {
        FollowerView::from_snapshots(world.followers.iter().map(|state| state.snapshot()).collect())
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|state| state.snapshot()).collect())
    }

    /// Captures every projectile still in flight, ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }
}
