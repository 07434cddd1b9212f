//! Instantaneous velocity of a follower derived from its current segment.

use glam::Vec2;
use path_defence_core::{Follower, Path};
use thiserror::Error;

use crate::path_location;

/// Precondition violations raised by the velocity estimator.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MotionError {
    /// The follower has no next waypoint and therefore no direction of travel.
    #[error("follower at path index {path_index} has no next waypoint in a path of {len}")]
    InvalidFollowerState {
        /// Path index held by the follower.
        path_index: usize,
        /// Number of waypoints in the path.
        len: usize,
    },
}

/// How a follower's velocity is derived from its segment direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VelocityModel {
    /// Per-axis sign of the direction scaled by speed.
    ///
    /// Matches the legacy targeting behaviour. Diagonal segments overstate
    /// the magnitude by a factor of `√2` because the direction is never
    /// normalised.
    AxisRush,
    /// Unit direction scaled by speed.
    #[default]
    Normalized,
}

/// Velocity of `follower` toward its next waypoint.
///
/// The result is expressed in world units per
/// [`SPEED_TIME_BASE`](path_defence_core::SPEED_TIME_BASE). A follower that
/// already stands on the final waypoint has no direction of travel and is
/// reported as [`MotionError::InvalidFollowerState`]; callers must filter
/// finished followers before estimating their velocity.
pub fn speed_vector(
    follower: &Follower,
    path: &Path,
    model: VelocityModel,
) -> Result<Vec2, MotionError> {
    let next = path_location(path, follower.path_index + 1).ok_or(
        MotionError::InvalidFollowerState {
            path_index: follower.path_index,
            len: path.len(),
        },
    )?;
    let delta = next - follower.position;

    let direction = match model {
        VelocityModel::AxisRush => Vec2::new(axis_sign(delta.x), axis_sign(delta.y)),
        VelocityModel::Normalized => delta.normalize_or_zero(),
    };

    Ok(direction * follower.speed)
}

fn axis_sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
