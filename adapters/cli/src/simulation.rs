//! Headless frame loop wiring the world to the targeting and combat systems.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use path_defence_core::{Command, Event, TowerTarget};
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_world::{self as world, query, World};

use crate::config::{Scenario, SpawnConfig};

/// Totals gathered while the simulation runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) spawned: u32,
    pub(crate) escaped: u32,
    pub(crate) killed: u32,
    pub(crate) shots_fired: u32,
    pub(crate) hits: u32,
    pub(crate) elapsed: Duration,
}

impl Summary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::FollowerSpawned { .. } => self.spawned += 1,
            Event::FollowerEscaped { .. } => self.escaped += 1,
            Event::FollowerKilled { .. } => self.killed += 1,
            Event::ProjectileFired { .. } => self.shots_fired += 1,
            Event::ProjectileArrived { hit: true, .. } => self.hits += 1,
            _ => {}
        }
    }
}

/// Drives a single scenario frame by frame.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawn: SpawnConfig,
    targeting: TowerTargeting,
    combat: TowerCombat,
    until_spawn: Duration,
    remaining_spawns: u32,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
    summary: Summary,
}

impl Simulation {
    /// Builds the world described by `scenario` and places its towers.
    pub(crate) fn new(scenario: &Scenario) -> Result<Self> {
        let config = scenario.world_config()?;
        let world = World::new(config).context("scenario map is inconsistent")?;

        let mut simulation = Self {
            world,
            spawn: scenario.spawn.clone(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::with_velocity_model(scenario.targeting.velocity_model.into()),
            until_spawn: Duration::ZERO,
            remaining_spawns: scenario.spawn.count,
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            summary: Summary::default(),
        };

        for tower in &scenario.towers {
            simulation.submit(Command::PlaceTower {
                cell: tower.cell(),
                profile: tower.profile.into(),
            });
            if let Some(Event::TowerPlacementRejected { cell, reason }) = simulation.events.last() {
                bail!(
                    "tower at ({}, {}) cannot be placed: {reason:?}",
                    cell.column(),
                    cell.row()
                );
            }
        }

        Ok(simulation)
    }

    /// Advances the scenario by one frame of length `dt`.
    pub(crate) fn step(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
        self.spawn_due(dt);

        let towers = query::tower_view(&self.world);
        let followers = query::follower_view(&self.world);
        let path = query::path(&self.world);
        self.targeting
            .handle(&towers, &followers, path, &mut self.targets);
        self.combat
            .handle(&towers, &followers, path, &self.targets, &mut self.commands);

        for command in std::mem::take(&mut self.commands) {
            self.submit(command);
        }
    }

    /// Reports whether every follower has spawned and left play.
    pub(crate) fn is_settled(&self) -> bool {
        self.remaining_spawns == 0 && query::follower_view(&self.world).is_empty()
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            elapsed: query::elapsed(&self.world),
            ..self.summary
        }
    }

    fn spawn_due(&mut self, dt: Duration) {
        if self.remaining_spawns == 0 {
            return;
        }

        self.until_spawn = self.until_spawn.saturating_sub(dt);
        if !self.until_spawn.is_zero() {
            return;
        }

        self.remaining_spawns -= 1;
        self.until_spawn = self.spawn.interval();
        self.submit(Command::SpawnFollower {
            speed: self.spawn.speed,
            health: self.spawn.health(),
        });
    }

    fn submit(&mut self, command: Command) {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        for event in &self.events {
            log::trace!("{event:?}");
            self.summary.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProfileConfig, TowerConfig};

    fn run(simulation: &mut Simulation, limit: Duration) {
        let dt = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        while elapsed < limit && !simulation.is_settled() {
            simulation.step(dt);
            elapsed += dt;
        }
    }

    #[test]
    fn default_scenario_settles() {
        let mut simulation = Simulation::new(&Scenario::default()).expect("default scenario");
        run(&mut simulation, Duration::from_secs(60));

        let summary = simulation.summary();
        assert!(simulation.is_settled());
        assert_eq!(summary.spawned, 5);
        assert_eq!(summary.escaped + summary.killed, 5);
        assert!(summary.shots_fired >= summary.hits);
    }

    #[test]
    fn without_towers_every_follower_escapes() {
        let scenario = Scenario {
            towers: Vec::new(),
            ..Scenario::default()
        };
        let mut simulation = Simulation::new(&scenario).expect("scenario without towers");
        run(&mut simulation, Duration::from_secs(60));

        let summary = simulation.summary();
        assert_eq!(summary.escaped, 5);
        assert_eq!(summary.killed, 0);
        assert_eq!(summary.shots_fired, 0);
    }

    #[test]
    fn towers_on_the_path_are_rejected() {
        let scenario = Scenario {
            towers: vec![TowerConfig {
                column: 1,
                row: 0,
                profile: ProfileConfig::default(),
            }],
            ..Scenario::default()
        };

        assert!(Simulation::new(&scenario).is_err());
    }
}
