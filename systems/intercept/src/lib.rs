#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-form interception of a linearly moving target.
//!
//! A projectile leaves a stationary shooter at constant speed `s`. The target
//! starts at offset `o` from the shooter and moves with constant velocity
//! `v`. The projectile reaches it at time `t` when `|o + v·t| = s·t`, which
//! expands to the quadratic
//!
//! ```text
//! (|v|² - s²)·t² + 2·(o·v)·t + |o|² = 0
//! ```
//!
//! and the smallest non-negative root is the interception time. Velocities
//! and speeds are world units per
//! [`SPEED_TIME_BASE`](path_defence_core::SPEED_TIME_BASE).

use std::time::Duration;

use glam::Vec3;
use path_defence_core::duration_from_base_units;
use thiserror::Error;

/// Reasons no interception time can be produced.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum InterceptError {
    /// The projectile speed was zero, negative or not finite.
    #[error("projectile speed {0} must be a positive finite number")]
    InvalidProjectileSpeed(f32),
    /// Target and projectile speeds match and the target moves perpendicular
    /// to the line of sight, so the equation has no solution.
    #[error("closing geometry is degenerate")]
    Degenerate,
    /// The discriminant is negative; no real trajectory reaches the target.
    #[error("target cannot be reached on any trajectory")]
    NoRealRoot,
    /// Every mathematical interception lies in the past.
    #[error("every interception time lies in the past")]
    InPast,
    /// The interception time is too large to represent.
    #[error("interception time is out of range")]
    OutOfRange,
}

impl InterceptError {
    /// Reports whether the error means "target unreachable right now".
    ///
    /// These outcomes are expected during play: the caller skips the shot and
    /// re-evaluates on a later frame.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        !matches!(self, Self::InvalidProjectileSpeed(_))
    }
}

/// Earliest time a projectile fired now from `shooter` meets the target.
///
/// `target` and `target_velocity` describe the target's current position and
/// constant velocity; `projectile_speed` is the projectile's scalar speed.
pub fn time_to_interception(
    target: Vec3,
    target_velocity: Vec3,
    shooter: Vec3,
    projectile_speed: f32,
) -> Result<Duration, InterceptError> {
    if !projectile_speed.is_finite() || projectile_speed <= 0.0 {
        return Err(InterceptError::InvalidProjectileSpeed(projectile_speed));
    }

    let offset = target - shooter;
    let distance_sq = offset.length_squared();
    if distance_sq == 0.0 {
        return Ok(Duration::ZERO);
    }

    let h1 = target_velocity.length_squared() - projectile_speed * projectile_speed;
    let h2 = offset.dot(target_velocity);

    let time = if h1 == 0.0 {
        if h2 == 0.0 {
            return Err(InterceptError::Degenerate);
        }

        let t = -distance_sq / (2.0 * h2);
        if t < 0.0 {
            return Err(InterceptError::InPast);
        }
        t
    } else {
        let midpoint = -h2 / h1;
        let discriminant = midpoint * midpoint - distance_sq / h1;
        if discriminant < 0.0 {
            return Err(InterceptError::NoRealRoot);
        }

        let spread = discriminant.sqrt();
        let smaller = (midpoint - spread).min(midpoint + spread);
        let larger = (midpoint - spread).max(midpoint + spread);
        if smaller >= 0.0 {
            smaller
        } else if larger >= 0.0 {
            larger
        } else {
            return Err(InterceptError::InPast);
        }
    };

    duration_from_base_units(time).ok_or(InterceptError::OutOfRange)
}

/// Point where a target moving in a straight line meets the projectile.
///
/// Convenience for callers without path knowledge; path followers should
/// feed the returned time into the motion model instead.
pub fn interception_point(
    target: Vec3,
    target_velocity: Vec3,
    shooter: Vec3,
    projectile_speed: f32,
) -> Result<Vec3, InterceptError> {
    let time = time_to_interception(target, target_velocity, shooter, projectile_speed)?;
    Ok(target + target_velocity * path_defence_core::base_units(time))
}
