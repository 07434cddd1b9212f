//! State carried by entities that walk the path.

use glam::Vec2;
use thiserror::Error;

use crate::Path;

/// Reasons a follower cannot be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum FollowerError {
    /// Speed was zero, negative or not finite.
    #[error("follower speed {0} must be a positive finite number")]
    InvalidSpeed(f32),
    /// The requested path index does not name a waypoint.
    #[error("path index {index} is outside a path of {len} waypoints")]
    IndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of waypoints in the path.
        len: usize,
    },
}

/// Position of a single path follower.
///
/// `position` always lies on the segment between waypoint `path_index` and
/// waypoint `path_index + 1`, or exactly on the final waypoint once
/// `path_index` names it. `path_index` only grows, by one per waypoint
/// reached. Whoever mutates a follower is responsible for keeping both fields
/// consistent; the motion system's `advance` does so.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Follower {
    /// Index of the waypoint most recently reached.
    pub path_index: usize,
    /// World-space position in the ground plane.
    pub position: Vec2,
    /// Travel speed in world units per [`crate::SPEED_TIME_BASE`].
    pub speed: f32,
}

impl Follower {
    /// Places a follower on the first waypoint of `path`.
    pub fn spawn(path: &Path, speed: f32) -> Result<Self, FollowerError> {
        Self::at_waypoint(path, 0, speed)
    }

    /// Places a follower exactly on waypoint `index`.
    pub fn at_waypoint(path: &Path, index: usize, speed: f32) -> Result<Self, FollowerError> {
        validate_speed(speed)?;
        let cell = path.waypoint(index).ok_or(FollowerError::IndexOutOfRange {
            index,
            len: path.len(),
        })?;

        Ok(Self {
            path_index: index,
            position: cell.corner(path.cell_length()),
            speed,
        })
    }

    /// Creates a follower from raw parts after validating its speed.
    pub fn new(path_index: usize, position: Vec2, speed: f32) -> Result<Self, FollowerError> {
        validate_speed(speed)?;
        Ok(Self {
            path_index,
            position,
            speed,
        })
    }

    /// Reports whether the follower stands on the final waypoint of `path`.
    #[must_use]
    pub fn has_finished(&self, path: &Path) -> bool {
        self.path_index >= path.last_index()
    }
}

fn validate_speed(speed: f32) -> Result<(), FollowerError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(FollowerError::InvalidSpeed(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellCoord;

    fn column_path() -> Path {
        Path::new(
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(0, 2),
            ],
            15.0,
        )
        .expect("valid path")
    }

    #[test]
    fn spawn_places_follower_on_first_waypoint() {
        let follower = Follower::spawn(&column_path(), 30.0).expect("valid follower");
        assert_eq!(follower.path_index, 0);
        assert_eq!(follower.position, Vec2::ZERO);
        assert!(!follower.has_finished(&column_path()));
    }

    #[test]
    fn waypoint_placement_scales_by_cell_length() {
        let path = column_path();
        let follower = Follower::at_waypoint(&path, 2, 30.0).expect("valid follower");
        assert_eq!(follower.position, Vec2::new(0.0, 30.0));
        assert!(follower.has_finished(&path));
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let path = column_path();
        assert_eq!(
            Follower::spawn(&path, 0.0),
            Err(FollowerError::InvalidSpeed(0.0))
        );
        assert_eq!(
            Follower::spawn(&path, -5.0),
            Err(FollowerError::InvalidSpeed(-5.0))
        );
        assert!(Follower::new(0, Vec2::ZERO, f32::INFINITY).is_err());
    }

    #[test]
    fn out_of_range_waypoint_is_rejected() {
        assert_eq!(
            Follower::at_waypoint(&column_path(), 3, 30.0),
            Err(FollowerError::IndexOutOfRange { index: 3, len: 3 })
        );
    }
}
