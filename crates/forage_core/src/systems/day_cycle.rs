//! End-of-day lifecycle: cull, reproduce, and restock food.

use crate::config::SimConfig;
use crate::environment::Environment;
use crate::lifecycle::{distance_to_border, offspring_of, random_food_position};
use forage_data::{Energy, Forager};
use rand::Rng;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayOutcome {
    pub starved: usize,
    pub stranded: usize,
    pub births: usize,
    pub food_purged: usize,
    pub food_spawned: usize,
    pub food_target: usize,
}

impl DayOutcome {
    pub fn deaths(&self) -> usize {
        self.starved + self.stranded
    }
}

/// Removes organisms that ran out of energy or ended the day away from the
/// border. Returns `(starved, stranded)`.
pub fn cull(env: &mut Environment, config: &SimConfig) -> (usize, usize) {
    let mut starved = 0;
    let mut stranded = 0;
    for handle in env.organism_handles() {
        let Some(organism) = env.organism(handle) else {
            continue;
        };
        if organism.energy.0 <= 0.0 {
            env.remove(handle);
            starved += 1;
        } else if distance_to_border(organism.position, config) > config.organism.safe_border_distance {
            env.remove(handle);
            stranded += 1;
        }
    }
    env.compact();
    (starved, stranded)
}

/// Every survivor with at least two meals gets one offspring; all survivors
/// are refilled and reset for the next day. Returns the number of births.
pub fn reproduce_and_reset<R: Rng>(env: &mut Environment, config: &SimConfig, rng: &mut R) -> usize {
    let mut babies = Vec::new();
    for handle in env.organism_handles() {
        let Some(parent) = env.organism(handle) else {
            continue;
        };
        if parent.forager.food_found >= 2 {
            babies.push(offspring_of(&parent, config, rng));
        }
        if let Ok((energy, forager)) = env.ecs.query_one_mut::<(&mut Energy, &mut Forager)>(handle) {
            energy.0 = config.day.day_energy;
            forager.reset_for_new_day();
        }
    }
    let births = babies.len();
    for baby in babies {
        env.spawn_organism(baby);
    }
    births
}

/// Replenishment target for the day that just ended. Shrinks by
/// `decrease_rate` (floored) every `decrease_period_days` days.
pub fn decayed_food_target(current: usize, day: u32, config: &SimConfig) -> usize {
    let food = &config.food;
    if food.decrease && food.decrease_period_days > 0 && day % food.decrease_period_days == 0 {
        (current as f64 * (1.0 - food.decrease_rate)).floor() as usize
    } else {
        current
    }
}

/// Spawns food at random interior positions until `target` items exist.
pub fn replenish_food<R: Rng>(
    env: &mut Environment,
    target: usize,
    config: &SimConfig,
    rng: &mut R,
) -> usize {
    let missing = target.saturating_sub(env.food_count());
    for _ in 0..missing {
        let position = random_food_position(config, rng);
        env.spawn_food(position);
    }
    missing
}

/// Runs the whole day boundary. `day` is the number of the day that just
/// ended (1 for the first day).
pub fn end_of_day<R: Rng>(
    env: &mut Environment,
    day: u32,
    food_target: usize,
    config: &SimConfig,
    rng: &mut R,
) -> DayOutcome {
    let (starved, stranded) = cull(env, config);
    let births = reproduce_and_reset(env, config, rng);

    let target = decayed_food_target(food_target, day, config);
    if target != food_target {
        tracing::debug!(day, from = food_target, to = target, "Food supply decayed");
    }

    let food_purged = if config.food.remove_excess {
        let purged = env.remove_all_food();
        tracing::debug!(day, purged, "Uneaten food removed");
        purged
    } else {
        0
    };
    let food_spawned = replenish_food(env, target, config, rng);

    DayOutcome {
        starved,
        stranded,
        births,
        food_purged,
        food_spawned,
        food_target: target,
    }
}
