//! In-flight projectiles travelling toward their aim points.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec3;
use path_defence_core::{FollowerId, ProjectileId, ProjectileSnapshot, TowerId};

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) follower: FollowerId,
    pub(crate) origin: Vec3,
    pub(crate) aim: Vec3,
    pub(crate) flight_time: Duration,
    pub(crate) elapsed: Duration,
    /// Damage applied to the follower on arrival.
    pub(crate) damage: u32,
}

impl ProjectileState {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            follower: self.follower,
            origin: self.origin,
            aim: self.aim,
            flight_time: self.flight_time,
            elapsed: self.elapsed,
        }
    }

    fn has_arrived(&self) -> bool {
        self.elapsed >= self.flight_time
    }
}

/// Parameters describing a newly launched projectile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) tower: TowerId,
    pub(crate) follower: FollowerId,
    pub(crate) origin: Vec3,
    pub(crate) aim: Vec3,
    pub(crate) flight_time: Duration,
    pub(crate) damage: u32,
}

/// Registry that stores projectiles and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, ProjectileState>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));

        let previous = self.entries.insert(
            id,
            ProjectileState {
                id,
                tower: launch.tower,
                follower: launch.follower,
                origin: launch.origin,
                aim: launch.aim,
                flight_time: launch.flight_time,
                elapsed: Duration::ZERO,
                damage: launch.damage,
            },
        );
        debug_assert!(previous.is_none(), "projectile identifiers are never reused");
        id
    }

    /// Advances every projectile by `dt` and removes those that arrived.
    ///
    /// Arrived projectiles are appended to `arrived` in identifier order.
    pub(crate) fn advance(&mut self, dt: Duration, arrived: &mut Vec<ProjectileState>) {
        for projectile in self.entries.values_mut() {
            projectile.elapsed = projectile.elapsed.saturating_add(dt);
        }

        let landed: Vec<ProjectileId> = self
            .entries
            .values()
            .filter(|projectile| projectile.has_arrived())
            .map(|projectile| projectile.id)
            .collect();

        for id in landed {
            if let Some(projectile) = self.entries.remove(&id) {
                arrived.push(projectile);
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.values()
    }
}
