//! The simulation loop: ticks within a day, day boundaries, termination.

use crate::config::SimConfig;
use crate::environment::Environment;
use crate::lifecycle::{create_organism_with_rng, random_food_position};
use crate::metrics::{self, Metrics};
use crate::snapshot::{entity_views, WorldSnapshot};
use crate::spatial_hash::SpatialHash;
use crate::systems::{action, day_cycle, interaction, stats};
use forage_data::{RunStats, Vec2};
use hecs::Entity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

pub use crate::systems::day_cycle::DayOutcome;
pub use crate::systems::interaction::InteractionOutcome;

fn positions_of(env: &Environment, handles: &[Entity]) -> Vec<Vec2> {
    handles
        .iter()
        .map(|&h| env.position(h).unwrap_or(Vec2::new(f64::NAN, f64::NAN)))
        .collect()
}

/// Advances the environment by one minute.
///
/// Every organism moves, then every organism of the pre-movement snapshot
/// gets one chance to eat. The spatial index is rebuilt before each phase.
pub fn step<R: Rng>(
    env: &mut Environment,
    minute: u32,
    config: &SimConfig,
    spatial: &mut SpatialHash,
    rng: &mut R,
) -> InteractionOutcome {
    let max_trait = stats::max_trait(env);
    let snapshot = env.snapshot_handles();

    let positions = positions_of(env, &snapshot);
    spatial.build(&positions);
    action::movement_phase(env, &snapshot, &positions, spatial, config, rng);

    let moved = positions_of(env, &snapshot);
    spatial.build(&moved);
    interaction::interaction_phase(env, &snapshot, &moved, spatial, config, minute, max_trait)
}

pub struct Simulation {
    config: SimConfig,
    pub env: Environment,
    pub metrics: Metrics,
    rng: ChaCha8Rng,
    seed: u64,
    day: u32,
    minute: u32,
    food_target: usize,
    stats: RunStats,
    spatial: SpatialHash,
}

impl Simulation {
    /// Validates `config` and populates the initial environment: food first,
    /// then every founder group in order. Records the day 0 statistics.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let seed = config.world.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut env = Environment::new(config.world.width, config.world.height);

        let food_target = config.food.initial_amount;
        for _ in 0..food_target {
            let position = random_food_position(&config, &mut rng);
            env.spawn_food(position);
        }
        for group in &config.population {
            for _ in 0..group.count {
                let organism = create_organism_with_rng(group.traits(), &config, &mut rng);
                env.spawn_organism(organism);
            }
        }

        Ok(Self::assemble(config, env, rng, seed, food_target))
    }

    /// Starts from a prepared environment instead of spawning founders.
    /// The food target is the food currently present.
    pub fn with_environment(config: SimConfig, env: Environment) -> anyhow::Result<Self> {
        config.validate()?;
        anyhow::ensure!(
            env.width() == config.world.width && env.height() == config.world.height,
            "Environment is {}x{} but config expects {}x{}",
            env.width(),
            env.height(),
            config.world.width,
            config.world.height
        );
        let seed = config.world.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let food_target = env.food_count();
        Ok(Self::assemble(config, env, rng, seed, food_target))
    }

    fn assemble(
        config: SimConfig,
        env: Environment,
        rng: ChaCha8Rng,
        seed: u64,
        food_target: usize,
    ) -> Self {
        let spatial = SpatialHash::new(
            config.world.cell_size,
            config.wrap_width(),
            config.wrap_height(),
        );
        let mut stats = RunStats::default();
        stats.record(stats::collect_day_stats(&env, 0, food_target));

        tracing::info!(
            seed,
            width = config.world.width,
            height = config.world.height,
            population = env.organism_count(),
            food = food_target,
            "Simulation initialized"
        );

        Self {
            config,
            env,
            metrics: Metrics::new(),
            rng,
            seed,
            day: 0,
            minute: 0,
            food_target,
            stats,
            spatial,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Seed the run was started with, drawn at random if the config had none.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of completed days.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn food_target(&self) -> usize {
        self.food_target
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn population(&self) -> usize {
        self.env.organism_count()
    }

    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Runs one minute. Returns the day boundary outcome when this minute
    /// completed a day.
    pub fn tick(&mut self) -> Option<DayOutcome> {
        let start = Instant::now();
        let outcome = step(
            &mut self.env,
            self.minute,
            &self.config,
            &mut self.spatial,
            &mut self.rng,
        );
        self.metrics.record_tick(
            start.elapsed(),
            self.env.organism_count(),
            self.env.food_count(),
        );
        self.metrics
            .increment_counter_by(metrics::MEALS, outcome.meals as u64);
        self.metrics
            .increment_counter_by(metrics::PREDATIONS, outcome.predations as u64);

        self.minute += 1;
        if self.minute < self.config.day.minutes_per_day {
            return None;
        }
        self.minute = 0;
        self.day += 1;
        Some(self.finish_day())
    }

    fn finish_day(&mut self) -> DayOutcome {
        let outcome = day_cycle::end_of_day(
            &mut self.env,
            self.day,
            self.food_target,
            &self.config,
            &mut self.rng,
        );
        self.food_target = outcome.food_target;
        self.stats
            .record(stats::collect_day_stats(&self.env, self.day, self.food_target));

        self.metrics
            .increment_counter_by(metrics::BIRTHS, outcome.births as u64);
        self.metrics
            .increment_counter_by(metrics::STARVED, outcome.starved as u64);
        self.metrics
            .increment_counter_by(metrics::STRANDED, outcome.stranded as u64);

        tracing::info!(
            day = self.day,
            population = self.env.organism_count(),
            food = self.food_target,
            births = outcome.births,
            deaths = outcome.deaths(),
            "Day completed"
        );
        outcome
    }

    /// Runs until extinction or until `num_days` days have completed in
    /// total. `None` falls back to `world.max_days`; if that is also `None`
    /// the run only ends by extinction.
    pub fn run(&mut self, num_days: Option<u32>) -> RunStats {
        let limit = num_days.or(self.config.world.max_days);
        loop {
            if self.is_extinct() {
                tracing::warn!(day = self.day, "Population went extinct");
                break;
            }
            if limit.is_some_and(|l| self.day >= l) {
                break;
            }
            self.tick();
        }
        self.stats.clone()
    }

    /// Current state for a renderer.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            day: self.day,
            minute: self.minute,
            width: self.config.world.width,
            height: self.config.world.height,
            entities: entity_views(&self.env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PopulationGroup;

    fn seeded(seed: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.world.seed = Some(seed);
        config
    }

    #[test]
    fn test_new_records_day_zero() {
        let sim = Simulation::new(seeded(1)).unwrap();
        assert_eq!(sim.stats().len(), 1);
        assert_eq!(sim.stats().population[0], 4);
        assert_eq!(sim.stats().food[0], 50);
        assert_eq!(sim.env.food_count(), 50);
        assert_eq!(sim.population(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = seeded(1);
        config.organism.predator_prey_ratio = 0.9;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_tick_rolls_over_day() {
        let mut sim = Simulation::new(seeded(2)).unwrap();
        for _ in 0..99 {
            assert!(sim.tick().is_none());
        }
        assert!(sim.tick().is_some());
        assert_eq!(sim.day(), 1);
        assert_eq!(sim.minute(), 0);
        assert_eq!(sim.stats().len(), 2);
        assert_eq!(sim.metrics.tick_count(), 100);
    }

    #[test]
    fn test_run_stops_at_limit() {
        let mut sim = Simulation::new(seeded(3)).unwrap();
        let stats = sim.run(Some(3));
        assert!(sim.day() <= 3);
        assert_eq!(stats.len(), sim.day() as usize + 1);
    }

    #[test]
    fn test_run_stops_on_extinction() {
        let mut config = seeded(4);
        config.population = vec![];
        let mut sim = Simulation::new(config).unwrap();
        let stats = sim.run(Some(10));
        assert_eq!(sim.day(), 0);
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut config = seeded(5);
        config.population = vec![PopulationGroup::new(10, 1.0, 1.0, 3.0)];
        let a = Simulation::new(config.clone()).unwrap().run(Some(4));
        let b = Simulation::new(config).unwrap().run(Some(4));
        assert_eq!(a, b);
    }

    #[test]
    fn test_snapshot_has_every_entity() {
        let sim = Simulation::new(seeded(6)).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.entities.len(), 54);
        assert_eq!(snap.organisms().count(), 4);
    }
}
