//! Authoritative follower state and health bookkeeping.

use std::collections::BTreeMap;

use path_defence_core::{Follower, FollowerId, FollowerSnapshot, Health};

/// Follower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct FollowerState {
    pub(crate) id: FollowerId,
    pub(crate) follower: Follower,
    /// Health that remains right now.
    pub(crate) health: Health,
    /// Health once every in-flight projectile has landed.
    pub(crate) committed_health: Health,
}

impl FollowerState {
    pub(crate) fn snapshot(&self) -> FollowerSnapshot {
        FollowerSnapshot {
            id: self.id,
            follower: self.follower,
            health: self.health,
            committed_health: self.committed_health,
        }
    }
}

/// Registry that stores followers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct FollowerRegistry {
    entries: BTreeMap<FollowerId, FollowerState>,
    next_follower_id: FollowerId,
}

impl FollowerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_follower_id: FollowerId::new(0),
        }
    }

    /// Stores a freshly spawned follower and returns its identifier.
    pub(crate) fn insert(&mut self, follower: Follower, health: Health) -> FollowerId {
        let id = self.next_follower_id;
        self.next_follower_id = FollowerId::new(id.get().saturating_add(1));

        let previous = self.entries.insert(
            id,
            FollowerState {
                id,
                follower,
                health,
                committed_health: health,
            },
        );
        debug_assert!(previous.is_none(), "follower identifiers are never reused");
        id
    }

    pub(crate) fn get_mut(&mut self, id: FollowerId) -> Option<&mut FollowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: FollowerId) -> Option<FollowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FollowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut FollowerState> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn committed_health_starts_at_full_health() {
        let mut registry = FollowerRegistry::new();
        let follower = Follower::new(0, Vec2::ZERO, 5.0).expect("valid follower");
        let id = registry.insert(follower, Health::new(4));

        let state = registry.get_mut(id).expect("stored follower");
        assert_eq!(state.health, Health::new(4));
        assert_eq!(state.committed_health, Health::new(4));
    }

    #[test]
    fn identifiers_are_not_reused_after_removal() {
        let mut registry = FollowerRegistry::new();
        let follower = Follower::new(0, Vec2::ZERO, 5.0).expect("valid follower");
        let first = registry.insert(follower, Health::new(1));
        assert!(registry.remove(first).is_some());

        let second = registry.insert(follower, Health::new(1));
        assert_ne!(first, second);
        assert_eq!(registry.iter().count(), 1);
    }
}
