//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec3;
use path_defence_core::{CellCoord, TowerId, TowerProfile, TowerSnapshot};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Firing characteristics supplied when the tower was placed.
    pub(crate) profile: TowerProfile,
    /// World position projectiles leave from.
    pub(crate) muzzle: Vec3,
    /// Time until the tower may fire again.
    pub(crate) ready_in: Duration,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            profile: self.profile,
            muzzle: self.muzzle,
            ready_in: self.ready_in,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new tower that is ready to fire immediately.
    pub(crate) fn insert(&mut self, cell: CellCoord, profile: TowerProfile, muzzle: Vec3) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));

        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                cell,
                profile,
                muzzle,
                ready_in: Duration::ZERO,
            },
        );
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.entries.values().any(|tower| tower.cell == cell)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Shortens every cooldown by `dt`, stopping at zero.
    pub(crate) fn cool_down(&mut self, dt: Duration) {
        for tower in self.entries.values_mut() {
            tower.ready_in = tower.ready_in.saturating_sub(dt);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(cooldown_ms: u64) -> TowerProfile {
        TowerProfile {
            cooldown: Duration::from_millis(cooldown_ms),
            projectile_speed: 60.0,
            damage: 1,
            muzzle_height: 7.5,
        }
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(CellCoord::new(0, 0), profile(500), Vec3::ZERO);
        let second = registry.insert(CellCoord::new(1, 0), profile(500), Vec3::ZERO);

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert!(registry.is_occupied(CellCoord::new(1, 0)));
        assert!(!registry.is_occupied(CellCoord::new(2, 0)));
    }

    #[test]
    fn cooldown_saturates_at_zero() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(CellCoord::new(0, 0), profile(500), Vec3::ZERO);
        registry.get_mut(id).expect("tower").ready_in = Duration::from_millis(300);

        registry.cool_down(Duration::from_millis(200));
        assert_eq!(
            registry.get_mut(id).expect("tower").ready_in,
            Duration::from_millis(100)
        );

        registry.cool_down(Duration::from_millis(200));
        assert!(registry.get_mut(id).expect("tower").ready_in.is_zero());
    }
}
