//! Simulation configuration and the run-state machine driving [`step`](crate::step).

use crate::engine;
use crate::error::{AutomatonError, Result};
use crate::lattice::{Extents, Lattice, create_empty, seed_center, seed_random};
use crate::neighborhood::{Neighborhood, neighborhood_for};
use crate::rule::{RuleId, RuleTable, build_rule_table, elementary_rules, rules_3d};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How generation 0 is populated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeedMode {
    /// A single filled cell at the center.
    #[default]
    Center,
    /// Random fill, see [`seed_random`] for how `density` is applied.
    Random {
        /// Expected fraction of empty cells (0.0 - 1.0).
        density: f32,
        /// Seed for reproducible fills (None = seeded from the OS).
        seed: Option<u64>,
    },
}

/// Everything needed to (re)start a simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Lattice extents; their dimensionality selects the neighborhood.
    pub extents: Extents,
    /// Rule identifier for that neighborhood.
    pub rule: RuleId,
    /// Generations per second in live mode.
    pub fps: u32,
    /// How generation 0 is populated.
    pub seed: SeedMode,
    /// Rows to precompute in 1D history mode.
    pub generations: usize,
}

impl SimulationConfig {
    /// Creates a configuration with a centered seed.
    pub fn new(extents: Extents, rule: impl Into<RuleId>) -> Self {
        Self {
            extents,
            rule: rule.into(),
            fps: 30,
            seed: SeedMode::Center,
            generations: 200,
        }
    }

    /// A 1D elementary automaton.
    pub fn elementary(cells: usize, rule: u64) -> Self {
        Self::new(Extents::D1(cells), rule)
    }

    /// A 2D automaton over the five-cell Von Neumann neighborhood.
    pub fn planar(width: usize, height: usize, rule: u64) -> Self {
        Self::new(Extents::D2(width, height), rule)
    }

    /// A 3D automaton over the seven-cell Von Neumann neighborhood.
    pub fn volumetric(width: usize, height: usize, depth: usize, words: [u32; 4]) -> Self {
        Self::new(Extents::D3(width, height, depth), words)
    }

    /// The 17³ scene the interactive 3D view starts with.
    pub fn default_3d() -> Self {
        Self::volumetric(17, 17, 17, rules_3d::DEFAULT)
    }

    /// Sets the seeding mode.
    pub fn with_seed(mut self, seed: SeedMode) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Sets the number of generations in history mode.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Validates every field and builds the rule table.
    pub fn validate(&self) -> Result<RuleTable> {
        self.extents.validate()?;
        if self.fps == 0 {
            return Err(AutomatonError::InvalidFrameRate(self.fps));
        }
        if let SeedMode::Random { density, .. } = self.seed {
            if !(0.0..=1.0).contains(&density) {
                return Err(AutomatonError::InvalidDensity(density));
            }
        }
        build_rule_table(&self.rule, self.extents.dimensionality())
    }

    /// Returns the delay between generations in live mode.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Builds generation 0 as configured.
    pub fn initial_lattice(&self) -> Result<Lattice> {
        let lattice = create_empty(self.extents)?;
        match self.seed {
            SeedMode::Center => Ok(seed_center(lattice)),
            SeedMode::Random { density, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                seed_random(lattice, density, &mut rng)
            }
        }
    }

    /// Creates a running simulation from this configuration.
    pub fn apply(&self) -> Result<Simulation> {
        Simulation::new(self.clone())
    }
}

impl Default for SimulationConfig {
    /// Rule 30 on 201 cells, 200 generations.
    fn default() -> Self {
        Self::elementary(201, elementary_rules::RULE_30)
    }
}

/// Run state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not stepping; waiting for [`Simulation::start`].
    Stopped,
    /// Stepping on every [`Simulation::tick`].
    Running,
    /// Suspended by the user; [`Simulation::resume`] continues.
    Paused,
}

/// A validated automaton plus its current generation.
///
/// Starts [`RunState::Running`]. Any configuration change moves it to
/// [`RunState::Stopped`] with a freshly seeded lattice.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    rule: RuleTable,
    neighborhood: &'static dyn Neighborhood,
    lattice: Lattice,
    generation: u64,
    state: RunState,
}

impl Simulation {
    /// Validates `config`, seeds generation 0 and starts running.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let (rule, neighborhood, lattice) = Self::prepare(&config)?;
        info!(extents = %config.extents, rule = %config.rule, "simulation started");
        Ok(Self {
            config,
            rule,
            neighborhood,
            lattice,
            generation: 0,
            state: RunState::Running,
        })
    }

    fn prepare(
        config: &SimulationConfig,
    ) -> Result<(RuleTable, &'static dyn Neighborhood, Lattice)> {
        let rule = config.validate()?;
        let neighborhood = neighborhood_for(config.extents.dimensionality());
        let lattice = config.initial_lattice()?;
        engine::validate(&lattice, &rule, neighborhood)?;
        debug!(entries = rule.len(), seed = ?config.seed, "configuration validated");
        Ok((rule, neighborhood, lattice))
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the active rule table.
    pub fn rule(&self) -> &RuleTable {
        &self.rule
    }

    /// Returns the current generation's lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Returns how many generations have been computed since seeding.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Stopped → Running. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        self.transition(RunState::Stopped, RunState::Running)
    }

    /// Running → Paused. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        self.transition(RunState::Running, RunState::Paused)
    }

    /// Paused → Running. Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        self.transition(RunState::Paused, RunState::Running)
    }

    /// Flips between Running and Paused; no effect when Stopped.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Stopped => false,
        }
    }

    fn transition(&mut self, from: RunState, to: RunState) -> bool {
        if self.state != from {
            return false;
        }
        info!(?from, ?to, generation = self.generation, "state change");
        self.state = to;
        true
    }

    /// Stops and reseeds with the current configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.reconfigure(self.config.clone())
    }

    /// Applies a new configuration, stopping and reseeding.
    ///
    /// On failure nothing changes: the previous configuration, lattice and
    /// run state stay in place.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<()> {
        let (rule, neighborhood, lattice) = Self::prepare(&config).inspect_err(|err| {
            warn!(%err, "configuration rejected");
        })?;
        info!(extents = %config.extents, rule = %config.rule, "reconfigured");
        self.config = config;
        self.rule = rule;
        self.neighborhood = neighborhood;
        self.lattice = lattice;
        self.generation = 0;
        self.state = RunState::Stopped;
        Ok(())
    }

    /// Advances one generation if running.
    ///
    /// Returns the new lattice, or `None` when stopped or paused.
    pub fn tick(&mut self) -> Option<&Lattice> {
        if self.state != RunState::Running {
            return None;
        }
        self.lattice = engine::advance(&self.lattice, &self.rule, self.neighborhood);
        self.generation += 1;
        Some(&self.lattice)
    }

    /// Precomputes the configured number of generations from the current one.
    ///
    /// Does not change the simulation.
    pub fn history(&self) -> Vec<Lattice> {
        engine::unfold(
            self.lattice.clone(),
            &self.rule,
            self.neighborhood,
            self.config.generations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Dimensionality;
    use crate::rule::rules_2d;

    #[test]
    fn test_starts_running() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.state(), RunState::Running);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.lattice().population(), 1);
        assert!(sim.lattice().get(100));
    }

    #[test]
    fn test_pause_resume() {
        let mut sim = SimulationConfig::planar(8, 8, rules_2d::GROWTH).apply().unwrap();
        assert!(sim.tick().is_some());

        assert!(sim.pause());
        assert_eq!(sim.state(), RunState::Paused);
        assert!(sim.tick().is_none());
        assert_eq!(sim.generation(), 1);

        assert!(sim.toggle_pause());
        assert_eq!(sim.state(), RunState::Running);
        assert!(sim.tick().is_some());
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert!(!sim.start());
        assert!(!sim.resume());
        assert_eq!(sim.state(), RunState::Running);
    }

    #[test]
    fn test_reconfigure_stops_and_reseeds() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.tick();
        sim.tick();
        sim.pause();

        sim.reconfigure(SimulationConfig::default_3d()).unwrap();
        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.lattice().dimensionality(), Dimensionality::Three);
        assert_eq!(sim.rule().len(), 128);
        assert!(sim.tick().is_none());
        assert!(!sim.toggle_pause());

        assert!(sim.start());
        assert!(sim.tick().is_some());
    }

    #[test]
    fn test_failed_reconfigure_keeps_state() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.tick();
        let before = sim.lattice().clone();

        let err = sim
            .reconfigure(SimulationConfig::elementary(10, 300))
            .unwrap_err();
        assert!(matches!(err, AutomatonError::RuleOutOfRange { .. }));
        assert_eq!(sim.state(), RunState::Running);
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.lattice(), &before);
        assert_eq!(sim.config(), &SimulationConfig::default());
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            SimulationConfig::planar(0, 4, 0).validate(),
            Err(AutomatonError::InvalidDimension { axis: 0, extent: 0 })
        ));
        assert_eq!(
            SimulationConfig::default().with_fps(0).validate(),
            Err(AutomatonError::InvalidFrameRate(0))
        );
        let bad_density = SimulationConfig::default().with_seed(SeedMode::Random {
            density: -0.1,
            seed: Some(1),
        });
        assert!(matches!(
            Simulation::new(bad_density),
            Err(AutomatonError::InvalidDensity(_))
        ));
    }

    #[test]
    fn test_random_seed_reproducible() {
        let config = SimulationConfig::planar(20, 20, rules_2d::PARITY).with_seed(SeedMode::Random {
            density: 0.5,
            seed: Some(12345),
        });
        let a = config.initial_lattice().unwrap();
        let b = config.initial_lattice().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_history_matches_ticks() {
        let config = SimulationConfig::elementary(31, elementary_rules::RULE_110).with_generations(8);
        let mut sim = config.apply().unwrap();
        let stack = sim.history();
        assert_eq!(stack.len(), 8);
        assert_eq!(&stack[0], sim.lattice());
        for expected in &stack[1..] {
            assert_eq!(sim.tick(), Some(expected));
        }
    }

    #[test]
    fn test_history_same_as_engine() {
        let config = SimulationConfig::elementary(21, elementary_rules::RULE_30).with_generations(5);
        let sim = config.apply().unwrap();
        let expected = engine::history(
            sim.lattice().clone(),
            &config.validate().unwrap(),
            neighborhood_for(Dimensionality::One),
            5,
        )
        .unwrap();
        assert_eq!(sim.history(), expected);

        let sim = config.with_generations(0).apply().unwrap();
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_frame_interval() {
        let config = SimulationConfig::default().with_fps(4);
        assert_eq!(config.frame_interval(), Duration::from_millis(250));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_json() {
        let config = SimulationConfig::default_3d().with_seed(SeedMode::Random {
            density: 0.75,
            seed: Some(3),
        });
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_reset() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let initial = sim.lattice().clone();
        sim.tick();
        sim.reset().unwrap();
        assert_eq!(sim.lattice(), &initial);
        assert_eq!(sim.state(), RunState::Stopped);
    }
}
