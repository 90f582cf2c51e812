//! Independent repeated runs of named founder populations.
//!
//! Each run owns its own [`Simulation`]; runs share nothing and execute in
//! parallel on the rayon pool.
//!
//! ## Example `experiments.toml`
//!
//! ```toml
//! [[experiment]]
//! name = "small_fast"
//! repeats = 3
//! population = [{ count = 20, size = 1.0, speed = 3.0, sense = 5.0 }]
//!
//! [[experiment]]
//! name = "mixed"
//! population = [
//!     { count = 10, size = 1.0, speed = 3.0, sense = 5.0 },
//!     { count = 10, size = 2.0, speed = 1.5, sense = 5.0 },
//! ]
//! ```

use crate::config::{PopulationGroup, SimConfig};
use crate::simulation::Simulation;
use forage_data::RunStats;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn default_repeats() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Experiment {
    pub name: String,
    pub population: Vec<PopulationGroup>,
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExperimentPlan {
    #[serde(rename = "experiment", default)]
    pub experiments: Vec<Experiment>,
}

impl ExperimentPlan {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let plan = toml::from_str::<Self>(content)?;
        for e in &plan.experiments {
            anyhow::ensure!(!e.name.is_empty(), "Experiment name must not be empty");
            anyhow::ensure!(e.repeats > 0, "Experiment '{}' needs at least one repeat", e.name);
        }
        Ok(plan)
    }

    /// Total number of runs across all experiments.
    pub fn run_count(&self) -> usize {
        self.experiments.iter().map(|e| e.repeats as usize).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub name: String,
    pub repeat: u32,
    pub seed: u64,
    pub stats: RunStats,
}

/// Seed of run `index` derived from a base seed (splitmix64 step).
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Runs every experiment `repeats` times for up to `days` days.
///
/// `base` supplies everything except the population. Results come back in
/// plan order, repeats consecutive. With a seed in `base` the batch is
/// reproducible regardless of thread scheduling.
pub fn run_batch(base: &SimConfig, plan: &ExperimentPlan, days: u32) -> anyhow::Result<Vec<BatchRun>> {
    let base_seed = base.world.seed.unwrap_or_else(rand::random);

    let mut jobs = Vec::with_capacity(plan.run_count());
    for experiment in &plan.experiments {
        let mut config = base.clone();
        config.population = experiment.population.clone();
        config.validate()?;
        for repeat in 0..experiment.repeats {
            let seed = derive_seed(base_seed, jobs.len() as u64);
            let mut run_config = config.clone();
            run_config.world.seed = Some(seed);
            jobs.push((experiment.name.clone(), repeat, seed, run_config));
        }
    }

    tracing::info!(runs = jobs.len(), days, "Starting batch");

    jobs.into_par_iter()
        .map(|(name, repeat, seed, config)| -> anyhow::Result<BatchRun> {
            let mut sim = Simulation::new(config)?;
            let stats = sim.run(Some(days));
            tracing::info!(
                experiment = %name,
                repeat,
                days = sim.day(),
                population = sim.population(),
                "Run finished"
            );
            Ok(BatchRun {
                name,
                repeat,
                seed,
                stats,
            })
        })
        .collect()
}
