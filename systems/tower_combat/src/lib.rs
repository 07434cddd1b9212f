#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.
//!
//! For every assigned target whose tower finished its cooldown, the system
//! estimates the follower's velocity, solves for the interception time from
//! the tower's muzzle, and turns that time into an aim point with the motion
//! model. Unreachable targets are skipped for the frame.

use std::time::Duration;

use glam::Vec3;
use path_defence_core::{
    Command, Follower, FollowerId, FollowerView, Path, TowerTarget, TowerView,
};
use path_defence_system_intercept::{time_to_interception, InterceptError};
use path_defence_system_motion::{future_location, speed_vector, MotionError, VelocityModel};
use thiserror::Error;

/// Reasons a tower cannot produce a shot this frame.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ShotError {
    /// The follower has no direction of travel.
    #[error(transparent)]
    Motion(#[from] MotionError),
    /// No interception time exists.
    #[error(transparent)]
    Intercept(#[from] InterceptError),
}

/// Firing solution for a single projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Predicted interception point on the ground plane.
    pub aim: Vec3,
    /// Time the projectile needs to reach the aim point.
    pub flight_time: Duration,
}

/// Computes where a tower at `muzzle` should aim to hit `follower`.
pub fn plan_shot(
    muzzle: Vec3,
    projectile_speed: f32,
    follower: &Follower,
    path: &Path,
    model: VelocityModel,
) -> Result<Shot, ShotError> {
    let velocity = speed_vector(follower, path, model)?;
    let flight_time = time_to_interception(
        follower.position.extend(0.0),
        velocity.extend(0.0),
        muzzle,
        projectile_speed,
    )?;

    let aim = future_location(follower, path, flight_time).ok_or(
        MotionError::InvalidFollowerState {
            path_index: follower.path_index,
            len: path.len(),
        },
    )?;

    Ok(Shot {
        aim: aim.extend(0.0),
        flight_time,
    })
}

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    velocity_model: VelocityModel,
    scratch: Vec<Command>,
    pending_damage: Vec<(FollowerId, u32)>,
}

impl TowerCombat {
    /// Creates a new tower combat system using the default velocity model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tower combat system that estimates velocity with `model`.
    #[must_use]
    pub fn with_velocity_model(model: VelocityModel) -> Self {
        Self {
            velocity_model: model,
            ..Self::default()
        }
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// Damage from shots queued earlier in the same call counts against a
    /// follower's committed health, so several ready towers never overkill a
    /// single follower within one frame.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        followers: &FollowerView,
        path: &Path,
        targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if targets.is_empty() {
            return;
        }

        self.scratch.clear();
        self.pending_damage.clear();

        for target in targets {
            let Some(tower) = towers.get(target.tower) else {
                continue;
            };
            if !tower.ready_in.is_zero() {
                continue;
            }

            let Some(snapshot) = followers.get(target.follower) else {
                continue;
            };
            let pending = self.pending_damage_for(target.follower);
            if snapshot.committed_health.saturating_sub(pending).is_depleted() {
                continue;
            }

            let shot = match plan_shot(
                tower.muzzle,
                tower.profile.projectile_speed,
                &snapshot.follower,
                path,
                self.velocity_model,
            ) {
                Ok(shot) => shot,
                Err(ShotError::Intercept(error)) if error.is_unreachable() => {
                    log::debug!(
                        "tower {} holds fire on follower {}: {error}",
                        tower.id.get(),
                        target.follower.get()
                    );
                    continue;
                }
                Err(error) => {
                    log::warn!(
                        "tower {} cannot engage follower {}: {error}",
                        tower.id.get(),
                        target.follower.get()
                    );
                    continue;
                }
            };

            self.add_pending_damage(target.follower, tower.profile.damage);
            self.scratch.push(Command::FireProjectile {
                tower: tower.id,
                follower: target.follower,
                origin: tower.muzzle,
                aim: shot.aim,
                flight_time: shot.flight_time,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn pending_damage_for(&self, follower: FollowerId) -> u32 {
        self.pending_damage
            .iter()
            .find(|(id, _)| *id == follower)
            .map_or(0, |(_, damage)| *damage)
    }

    fn add_pending_damage(&mut self, follower: FollowerId, damage: u32) {
        match self
            .pending_damage
            .iter_mut()
            .find(|(id, _)| *id == follower)
        {
            Some((_, total)) => *total = total.saturating_add(damage),
            None => self.pending_damage.push((follower, damage)),
        }
    }
}
