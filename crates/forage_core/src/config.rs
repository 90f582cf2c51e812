//! Configuration for a simulation run.
//!
//! A [`SimConfig`] is built once (from defaults or a `config.toml`),
//! validated, and then handed by value to
//! [`Simulation::new`](crate::simulation::Simulation::new). Nothing in the
//! engine mutates it afterwards.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 100
//! height = 80
//! seed = 42
//! max_days = 200
//!
//! [day]
//! minutes_per_day = 100
//! day_energy = 2500.0
//!
//! [food]
//! initial_amount = 50
//! decrease = true
//! decrease_rate = 0.1
//! decrease_period_days = 10
//!
//! [[population]]
//! count = 50
//! size = 1.0
//! speed = 1.0
//! sense = 3.0
//! ```

use forage_data::Traits;
use serde::{Deserialize, Serialize};

/// Dimensions of the shared coordinate space and run limits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    /// Side of a spatial hash cell in world units.
    pub cell_size: f64,
    pub seed: Option<u64>,
    /// Day limit used by `run(None)`. `None` runs until extinction.
    pub max_days: Option<u32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 80,
            cell_size: 5.0,
            seed: None,
            max_days: Some(100),
        }
    }
}

/// Length of a day and its energy budget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DayConfig {
    pub minutes_per_day: u32,
    /// Energy every organism starts the day with.
    pub day_energy: f64,
    /// Organisms head home once the trip would take this close to the deadline.
    pub return_margin_minutes: u32,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            minutes_per_day: 100,
            day_energy: 2500.0,
            return_margin_minutes: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FoodConfig {
    pub initial_amount: usize,
    /// Shrink the replenishment target over time.
    pub decrease: bool,
    /// Fraction removed from the target at each decay step.
    pub decrease_rate: f64,
    pub decrease_period_days: u32,
    /// Purge uneaten food before replenishing.
    pub remove_excess: bool,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            initial_amount: 50,
            decrease: true,
            decrease_rate: 0.1,
            decrease_period_days: 10,
            remove_excess: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OrganismConfig {
    /// Minimum size multiple needed to eat another organism. Must exceed 1.
    pub predator_prey_ratio: f64,
    /// Perception radius is `sense * sense_factor`.
    pub sense_factor: f64,
    /// Maximum distance at which a meal is consumed.
    pub contact_distance: f64,
    /// Half-width of the uniform wander turn, in radians.
    pub wander_angle: f64,
    /// Organisms farther than this from a border at day end are culled.
    pub safe_border_distance: f64,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            predator_prey_ratio: 1.6,
            sense_factor: 1.0,
            contact_distance: 0.01,
            wander_angle: 0.5,
            safe_border_distance: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MutationConfig {
    /// Independent per-trait probability of mutating at birth.
    pub chance: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    /// Mutated traits never drop below this value.
    pub trait_floor: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            chance: 0.1,
            min_amount: 0.1,
            max_amount: 0.5,
            trait_floor: 0.1,
        }
    }
}

/// `count` founders sharing the same traits.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PopulationGroup {
    pub count: usize,
    pub size: f64,
    pub speed: f64,
    pub sense: f64,
}

impl PopulationGroup {
    #[must_use]
    pub const fn new(count: usize, size: f64, speed: f64, sense: f64) -> Self {
        Self {
            count,
            size,
            speed,
            sense,
        }
    }

    #[must_use]
    pub fn traits(&self) -> Traits {
        Traits::new(self.size, self.speed, self.sense)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub day: DayConfig,
    pub food: FoodConfig,
    pub organism: OrganismConfig,
    pub mutation: MutationConfig,
    pub population: Vec<PopulationGroup>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            day: DayConfig::default(),
            food: FoodConfig::default(),
            organism: OrganismConfig::default(),
            mutation: MutationConfig::default(),
            population: vec![
                PopulationGroup::new(2, 1.0, 3.0, 5.0),
                PopulationGroup::new(1, 2.0, 1.5, 5.0),
                PopulationGroup::new(1, 1.0, 2.0, 10.0),
            ],
        }
    }
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width >= 3, "World width must be at least 3");
        anyhow::ensure!(self.world.height >= 3, "World height must be at least 3");
        anyhow::ensure!(
            self.world.cell_size > 0.0 && self.world.cell_size.is_finite(),
            "Cell size must be positive"
        );

        anyhow::ensure!(
            self.day.minutes_per_day > 0,
            "Minutes per day must be positive"
        );
        anyhow::ensure!(self.day.day_energy > 0.0, "Day energy must be positive");

        anyhow::ensure!(
            self.food.decrease_rate >= 0.0 && self.food.decrease_rate <= 1.0,
            "Food decrease rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            !self.food.decrease || self.food.decrease_period_days > 0,
            "Food decrease period must be positive when decrease is enabled"
        );
        anyhow::ensure!(
            self.food.initial_amount <= 100_000,
            "Initial food too large (max 100000)"
        );

        anyhow::ensure!(
            self.organism.predator_prey_ratio > 1.0,
            "Predator/prey ratio must be greater than 1"
        );
        anyhow::ensure!(
            self.organism.sense_factor > 0.0,
            "Sense factor must be positive"
        );
        anyhow::ensure!(
            self.organism.contact_distance >= 0.0,
            "Contact distance must be non-negative"
        );
        anyhow::ensure!(
            self.organism.wander_angle >= 0.0,
            "Wander angle must be non-negative"
        );
        anyhow::ensure!(
            self.organism.safe_border_distance >= 0.0,
            "Safe border distance must be non-negative"
        );

        anyhow::ensure!(
            self.mutation.chance >= 0.0 && self.mutation.chance <= 1.0,
            "Mutation chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.mutation.min_amount >= 0.0 && self.mutation.min_amount <= self.mutation.max_amount,
            "Mutation amount range must satisfy 0 <= min <= max"
        );
        anyhow::ensure!(
            self.mutation.trait_floor > 0.0,
            "Trait floor must be positive"
        );

        for group in &self.population {
            let floor = self.mutation.trait_floor;
            anyhow::ensure!(
                group.size >= floor && group.speed >= floor && group.sense >= floor,
                "Founder traits ({}, {}, {}) fall below the trait floor {}",
                group.size,
                group.speed,
                group.sense,
                floor
            );
        }
        anyhow::ensure!(
            self.founder_count() <= 100_000,
            "Initial population too large (max 100000)"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn founder_count(&self) -> usize {
        self.population.iter().map(|g| g.count).sum()
    }

    /// Width of the periodic domain positions wrap into.
    #[must_use]
    pub fn wrap_width(&self) -> f64 {
        f64::from(self.world.width) + 1.0
    }

    #[must_use]
    pub fn wrap_height(&self) -> f64 {
        f64::from(self.world.height) + 1.0
    }

    /// Hash of every behaviour-affecting section. Seed and day limit excluded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{}x{}", self.world.width, self.world.height).as_bytes());
        hasher.update(format!("{:?}", self.day).as_bytes());
        hasher.update(format!("{:?}", self.food).as_bytes());
        hasher.update(format!("{:?}", self.organism).as_bytes());
        hasher.update(format!("{:?}", self.mutation).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hex::encode(hasher.finalize())
    }
}
