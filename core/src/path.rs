//! Fixed enemy route expressed as an ordered list of grid cells.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Reasons a waypoint list cannot form a [`Path`].
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PathError {
    /// The waypoint list contained no cells.
    #[error("path must contain at least one waypoint")]
    Empty,
    /// Two consecutive waypoints referenced the same cell.
    #[error("waypoint {index} repeats the previous waypoint")]
    ConsecutiveDuplicate {
        /// Index of the second, repeated waypoint.
        index: usize,
    },
    /// The cell length was zero, negative or not finite.
    #[error("cell length {0} must be a positive finite number")]
    InvalidCellLength(f32),
}

/// Immutable route that every follower traverses.
///
/// A path is validated once on construction and shared read-only afterwards.
/// Waypoints are grid cells; their world location is the cell index scaled by
/// [`Path::cell_length`]. A membership index over the cells backs
/// [`Path::contains`] so map builders can reject placements on the route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathRecord", into = "PathRecord")]
pub struct Path {
    waypoints: Vec<CellCoord>,
    cells: BTreeSet<CellCoord>,
    cell_length: f32,
}

impl Path {
    /// Builds a path from ordered waypoints scaled by `cell_length` world units.
    pub fn new(waypoints: Vec<CellCoord>, cell_length: f32) -> Result<Self, PathError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(PathError::InvalidCellLength(cell_length));
        }

        if waypoints.is_empty() {
            return Err(PathError::Empty);
        }

        if let Some(index) = waypoints
            .windows(2)
            .position(|pair| pair[0] == pair[1])
        {
            return Err(PathError::ConsecutiveDuplicate { index: index + 1 });
        }

        let cells = waypoints.iter().copied().collect();
        Ok(Self {
            waypoints,
            cells,
            cell_length,
        })
    }

    /// Builds the default serpentine route for a square grid.
    ///
    /// The route runs down column 1, across row `grid_size - 2` and back up
    /// column `grid_size - 2`, leaving a one cell margin along three edges.
    pub fn serpentine(grid_size: u32, cell_length: f32) -> Result<Self, PathError> {
        let last = grid_size.saturating_sub(2);
        let mut waypoints = Vec::new();

        for row in 0..=last {
            waypoints.push(CellCoord::new(1, row));
        }
        for column in 2..=last {
            waypoints.push(CellCoord::new(column, last));
        }
        for row in (0..last).rev() {
            waypoints.push(CellCoord::new(last, row));
        }

        Self::new(waypoints, cell_length)
    }

    /// Number of waypoints along the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; a constructed path holds at least one waypoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the terminal waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Waypoint stored at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<CellCoord> {
        self.waypoints.get(index).copied()
    }

    /// Ordered waypoints composing the route.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Side length of a grid cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Reports whether `cell` lies on the route.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PathRecord {
    waypoints: Vec<CellCoord>,
    cell_length: f32,
}

impl TryFrom<PathRecord> for Path {
    type Error = PathError;

    fn try_from(record: PathRecord) -> Result<Self, Self::Error> {
        Self::new(record.waypoints, record.cell_length)
    }
}

impl From<Path> for PathRecord {
    fn from(path: Path) -> Self {
        Self {
            waypoints: path.waypoints,
            cell_length: path.cell_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, PathError};
    use crate::CellCoord;

    fn cells(coords: &[(u32, u32)]) -> Vec<CellCoord> {
        coords
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect()
    }

    #[test]
    fn rejects_empty_waypoints() {
        assert_eq!(Path::new(Vec::new(), 15.0), Err(PathError::Empty));
    }

    #[test]
    fn rejects_consecutive_duplicates() {
        let result = Path::new(cells(&[(0, 0), (0, 1), (0, 1), (0, 2)]), 15.0);
        assert_eq!(result, Err(PathError::ConsecutiveDuplicate { index: 2 }));
    }

    #[test]
    fn revisiting_a_cell_later_is_allowed() {
        let path = Path::new(cells(&[(0, 0), (0, 1), (0, 0)]), 15.0).expect("valid path");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn rejects_non_positive_cell_length() {
        assert!(matches!(
            Path::new(cells(&[(0, 0)]), 0.0),
            Err(PathError::InvalidCellLength(_))
        ));
        assert!(matches!(
            Path::new(cells(&[(0, 0)]), f32::NAN),
            Err(PathError::InvalidCellLength(_))
        ));
    }

    #[test]
    fn membership_matches_waypoints() {
        let path = Path::new(cells(&[(1, 0), (1, 1), (2, 1)]), 10.0).expect("valid path");
        assert!(path.contains(CellCoord::new(1, 1)));
        assert!(path.contains(CellCoord::new(2, 1)));
        assert!(!path.contains(CellCoord::new(0, 0)));
        assert!(!path.contains(CellCoord::new(2, 2)));
    }

    #[test]
    fn serpentine_route_hugs_three_edges() {
        let path = Path::serpentine(6, 15.0).expect("valid serpentine");
        let expected = cells(&[
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 4),
            (4, 3),
            (4, 2),
            (4, 1),
            (4, 0),
        ]);
        assert_eq!(path.waypoints(), expected.as_slice());
        assert_eq!(path.last_index(), expected.len() - 1);
    }

    #[test]
    fn deserialization_revalidates_waypoints() {
        let path = Path::new(cells(&[(0, 0), (0, 1)]), 15.0).expect("valid path");
        let bytes = bincode::serialize(&path).expect("serialize");
        let restored: Path = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, path);
        assert!(restored.contains(CellCoord::new(0, 1)));

        let invalid = super::PathRecord {
            waypoints: cells(&[(3, 3), (3, 3)]),
            cell_length: 15.0,
        };
        let bytes = bincode::serialize(&invalid).expect("serialize");
        assert!(bincode::deserialize::<Path>(&bytes).is_err());
    }
}
