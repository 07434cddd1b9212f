#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic motion model for followers walking a fixed path.
//!
//! Every function here is pure over the state handed to it. Followers move
//! at constant speed along straight segments between consecutive waypoints;
//! a segment of length `d` takes `d / speed` units of
//! [`SPEED_TIME_BASE`](path_defence_core::SPEED_TIME_BASE).

use std::time::Duration;

use glam::Vec2;
use path_defence_core::{base_units, duration_from_base_units, Follower, Path};

pub mod velocity;

pub use velocity::{speed_vector, MotionError, VelocityModel};

/// Outcome of advancing a follower through one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// Number of waypoints reached during the frame.
    pub arrivals: usize,
    /// Whether the follower stands on the final waypoint.
    pub finished: bool,
}

/// World location of waypoint `index`, or `None` past the end of the path.
#[must_use]
pub fn path_location(path: &Path, index: usize) -> Option<Vec2> {
    path.waypoint(index)
        .map(|cell| cell.corner(path.cell_length()))
}

/// Predicts where `follower` stands after `elapsed` time.
///
/// Whole segments are consumed until the remaining time falls inside one,
/// which is then interpolated linearly. Once the path is exhausted the final
/// waypoint is returned; positions are never extrapolated beyond it. A zero
/// `elapsed` returns the current position unchanged.
///
/// Returns `None` only when the follower's `path_index` names no waypoint.
#[must_use]
pub fn future_location(follower: &Follower, path: &Path, elapsed: Duration) -> Option<Vec2> {
    if follower.path_index > path.last_index() {
        return None;
    }

    let mut remaining = base_units(elapsed);
    let mut from = follower.position;
    let mut index = follower.path_index;

    while let Some(next) = path_location(path, index + 1) {
        let segment = from.distance(next) / follower.speed;
        if remaining < segment {
            return Some(from.lerp(next, remaining / segment));
        }

        remaining -= segment;
        from = next;
        index += 1;
    }

    Some(from)
}

/// Total time `follower` needs to reach the final waypoint.
///
/// Returns `None` when the follower's `path_index` names no waypoint.
#[must_use]
pub fn remaining_travel_time(follower: &Follower, path: &Path) -> Option<Duration> {
    if follower.path_index > path.last_index() {
        return None;
    }

    let mut total = 0.0;
    let mut from = follower.position;
    let mut index = follower.path_index;
    while let Some(next) = path_location(path, index + 1) {
        total += from.distance(next) / follower.speed;
        from = next;
        index += 1;
    }

    duration_from_base_units(total)
}

/// Moves `follower` along `path` by `dt`, reporting waypoint arrivals.
///
/// This is the single authoritative advancement step: `path_index` grows by
/// one for every waypoint reached and `position` stays on the current
/// segment. A follower already on the final waypoint does not move.
pub fn advance(follower: &mut Follower, path: &Path, dt: Duration) -> Advance {
    let mut remaining = base_units(dt);
    let mut outcome = Advance::default();

    loop {
        let Some(next) = path_location(path, follower.path_index + 1) else {
            outcome.finished = true;
            return outcome;
        };

        let segment = follower.position.distance(next) / follower.speed;
        if remaining < segment {
            follower.position = follower.position.lerp(next, remaining / segment);
            return outcome;
        }

        remaining -= segment;
        follower.position = next;
        follower.path_index += 1;
        outcome.arrivals += 1;
        log::trace!("follower reached waypoint {}", follower.path_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::CellCoord;

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
    fn path_location_scales_waypoints() {
        let path = column_path();
        assert_eq!(path_location(&path, 0), Some(Vec2::ZERO));
        assert_eq!(path_location(&path, 2), Some(Vec2::new(0.0, 30.0)));
        assert_eq!(path_location(&path, 3), None);
    }

    #[test]
    fn follower_with_invalid_index_has_no_future() {
        let path = column_path();
        let follower = Follower::new(7, Vec2::ZERO, 30.0).expect("valid follower");
        assert_eq!(
            future_location(&follower, &path, Duration::from_millis(100)),
            None
        );
        assert_eq!(remaining_travel_time(&follower, &path), None);
    }

    #[test]
    fn advance_within_segment_interpolates() {
        let path = column_path();
        let mut follower = Follower::spawn(&path, 30.0).expect("valid follower");

        let outcome = advance(&mut follower, &path, Duration::from_millis(250));

        assert_eq!(outcome, Advance::default());
        assert_eq!(follower.path_index, 0);
        assert_eq!(follower.position, Vec2::new(0.0, 7.5));
    }

    #[test]
    fn advance_counts_every_waypoint_crossed() {
        let path = column_path();
        let mut follower = Follower::spawn(&path, 30.0).expect("valid follower");

        let outcome = advance(&mut follower, &path, Duration::from_millis(750));

        assert_eq!(
            outcome,
            Advance {
                arrivals: 1,
                finished: false
            }
        );
        assert_eq!(follower.path_index, 1);
        assert_eq!(follower.position, Vec2::new(0.0, 22.5));
    }

    #[test]
    fn advance_stops_on_final_waypoint() {
        let path = column_path();
        let mut follower = Follower::spawn(&path, 30.0).expect("valid follower");

        let outcome = advance(&mut follower, &path, Duration::from_secs(5));

        assert_eq!(
            outcome,
            Advance {
                arrivals: 2,
                finished: true
            }
        );
        assert_eq!(follower.path_index, path.last_index());
        assert_eq!(follower.position, Vec2::new(0.0, 30.0));

        let again = advance(&mut follower, &path, Duration::from_secs(1));
        assert_eq!(
            again,
            Advance {
                arrivals: 0,
                finished: true
            }
        );
    }

    #[test]
    fn remaining_travel_time_sums_segments() {
        let path = column_path();
        let follower = Follower::spawn(&path, 30.0).expect("valid follower");
        assert_eq!(
            remaining_travel_time(&follower, &path),
            Some(Duration::from_secs(1))
        );
    }
}
