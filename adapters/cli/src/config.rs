//! TOML scenario files describing the map, the follower waves and the towers.

use std::{fs, path::Path as FsPath, time::Duration};

use anyhow::{Context, Result};
use path_defence_core::{CellCoord, Health, Path, TowerProfile};
use path_defence_system_motion::VelocityModel;
use path_defence_world::WorldConfig;
use serde::Deserialize;

/// Complete description of a simulated scenario.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    pub(crate) map: MapConfig,
    pub(crate) spawn: SpawnConfig,
    pub(crate) targeting: TargetingConfig,
    pub(crate) towers: Vec<TowerConfig>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            spawn: SpawnConfig::default(),
            targeting: TargetingConfig::default(),
            towers: vec![
                TowerConfig {
                    column: 3,
                    row: 3,
                    profile: ProfileConfig::default(),
                },
                TowerConfig {
                    column: 6,
                    row: 5,
                    profile: ProfileConfig::default(),
                },
            ],
        }
    }
}

impl Scenario {
    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &FsPath) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scenario at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Builds the world layout, falling back to the serpentine route.
    pub(crate) fn world_config(&self) -> Result<WorldConfig> {
        let map = &self.map;
        let path = match &map.waypoints {
            Some(waypoints) => Path::new(
                waypoints
                    .iter()
                    .map(|&[column, row]| CellCoord::new(column, row))
                    .collect(),
                map.cell_length,
            ),
            None => Path::serpentine(map.grid_size, map.cell_length),
        }
        .context("scenario describes an invalid path")?;

        Ok(WorldConfig {
            columns: map.grid_size,
            rows: map.grid_size,
            path,
        })
    }
}

/// Square grid the path is laid out on.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MapConfig {
    pub(crate) grid_size: u32,
    pub(crate) cell_length: f32,
    /// Explicit `[column, row]` waypoints; the serpentine route when absent.
    pub(crate) waypoints: Option<Vec<[u32; 2]>>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            cell_length: 15.0,
            waypoints: None,
        }
    }
}

/// Followers entering the path at a fixed interval.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawnConfig {
    pub(crate) interval_ms: u64,
    pub(crate) count: u32,
    pub(crate) speed: f32,
    pub(crate) health: u32,
}

impl SpawnConfig {
    pub(crate) fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub(crate) fn health(&self) -> Health {
        Health::new(self.health)
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            count: 5,
            speed: 30.0,
            health: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum VelocityModelConfig {
    AxisRush,
    #[default]
    Normalized,
}

impl From<VelocityModelConfig> for VelocityModel {
    fn from(config: VelocityModelConfig) -> Self {
        match config {
            VelocityModelConfig::AxisRush => Self::AxisRush,
            VelocityModelConfig::Normalized => Self::Normalized,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TargetingConfig {
    pub(crate) velocity_model: VelocityModelConfig,
}

/// Tower standing on a single grid cell.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TowerConfig {
    pub(crate) column: u32,
    pub(crate) row: u32,
    #[serde(default)]
    pub(crate) profile: ProfileConfig,
}

impl TowerConfig {
    pub(crate) fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProfileConfig {
    pub(crate) cooldown_ms: u64,
    pub(crate) projectile_speed: f32,
    pub(crate) damage: u32,
    pub(crate) muzzle_height: f32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 667,
            projectile_speed: 120.0,
            damage: 1,
            muzzle_height: 11.25,
        }
    }
}

impl From<ProfileConfig> for TowerProfile {
    fn from(config: ProfileConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(config.cooldown_ms),
            projectile_speed: config.projectile_speed,
            damage: config.damage,
            muzzle_height: config.muzzle_height,
        }
    }
}
