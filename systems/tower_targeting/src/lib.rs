#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use std::cmp::Ordering;

use path_defence_core::{FollowerId, FollowerView, Path, TowerTarget, TowerView};
use path_defence_system_motion::path_location;

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    follower_workspace: Vec<FollowerCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Every tower engages the viable follower that progressed furthest along
    /// the path. Followers whose committed health is depleted, or that stand
    /// on the final waypoint, are never selected. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        followers: &FollowerView,
        path: &Path,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.iter().next().is_none() || followers.is_empty() {
            return;
        }

        self.prepare_follower_workspace(followers, path);

        let Some(best) = self
            .follower_workspace
            .iter()
            .min_by(|left, right| left.precedence(right))
        else {
            return;
        };

        for tower in towers.iter() {
            out.push(TowerTarget {
                tower: tower.id,
                follower: best.id,
            });
        }
    }

    fn prepare_follower_workspace(&mut self, followers: &FollowerView, path: &Path) {
        self.follower_workspace.clear();
        self.follower_workspace.reserve(followers.len());

        for snapshot in followers.iter() {
            if !snapshot.is_viable() {
                continue;
            }

            let follower = snapshot.follower;
            let Some(next) = path_location(path, follower.path_index + 1) else {
                continue;
            };

            self.follower_workspace.push(FollowerCandidate {
                id: snapshot.id,
                path_index: follower.path_index,
                distance_to_next: follower.position.distance(next),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FollowerCandidate {
    id: FollowerId,
    path_index: usize,
    distance_to_next: f32,
}

impl FollowerCandidate {
    /// Orders candidates so that the preferred target compares as smallest.
    fn precedence(&self, other: &Self) -> Ordering {
        other
            .path_index
            .cmp(&self.path_index)
            .then_with(|| self.distance_to_next.total_cmp(&other.distance_to_next))
            .then_with(|| self.id.cmp(&other.id))
    }
}
