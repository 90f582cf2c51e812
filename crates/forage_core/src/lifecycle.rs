//! Organism birth: founders on the border, offspring from a parent's traits.

use crate::config::{MutationConfig, SimConfig};
use forage_data::{Appearance, Energy, Forager, Heading, Organism, Traits, Vec2};
use rand::Rng;

/// Distance to the nearest edge of the `width` x `height` rectangle and the
/// point on that edge. Ties resolve in the order bottom, right, top, left.
pub fn closest_border(position: Vec2, width: f64, height: f64) -> (f64, Vec2) {
    let candidates = [
        Vec2::new(position.x, 0.0),
        Vec2::new(width, position.y),
        Vec2::new(position.x, height),
        Vec2::new(0.0, position.y),
    ];
    let mut best = (position.distance(candidates[0]), candidates[0]);
    for &c in &candidates[1..] {
        let d = position.distance(c);
        if d < best.0 {
            best = (d, c);
        }
    }
    best
}

pub fn distance_to_border(position: Vec2, config: &SimConfig) -> f64 {
    closest_border(
        position,
        f64::from(config.world.width),
        f64::from(config.world.height),
    )
    .0
}

/// A random point on one of the four edges.
pub fn random_border_position<R: Rng>(width: f64, height: f64, rng: &mut R) -> Vec2 {
    if rng.gen::<f64>() > 0.5 {
        let x = rng.gen_range(0.0..=width - 1.0);
        let y = if rng.gen::<f64>() > 0.5 {
            height - 1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    } else {
        let y = rng.gen_range(0.0..=height - 1.0);
        let x = if rng.gen::<f64>() > 0.5 {
            width - 1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Uniformly drawn unit vector from the `[-1, 1]^2` square.
pub fn random_heading<R: Rng>(rng: &mut R) -> Vec2 {
    loop {
        let v = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        if let Some(unit) = v.normalized() {
            return unit;
        }
    }
}

/// Food lands on integer coordinates strictly inside the border.
pub fn random_food_position<R: Rng>(config: &SimConfig, rng: &mut R) -> Vec2 {
    let x = rng.gen_range(1..config.world.width - 1);
    let y = rng.gen_range(1..config.world.height - 1);
    Vec2::new(f64::from(x), f64::from(y))
}

/// Creates a founder with full daily energy at a random border position.
pub fn create_organism_with_rng<R: Rng>(traits: Traits, config: &SimConfig, rng: &mut R) -> Organism {
    let position = random_border_position(
        f64::from(config.world.width),
        f64::from(config.world.height),
        rng,
    );
    let heading = random_heading(rng);
    Organism {
        position,
        traits,
        heading: Heading(heading),
        energy: Energy(config.day.day_energy),
        forager: Forager::default(),
        appearance: Appearance::default(),
    }
}

/// Maps each trait to a candidate offspring value.
///
/// Every trait independently mutates with probability `chance`, shifting by
/// `U(min_amount, max_amount)` with a random sign. Results are clamped to
/// `trait_floor`; untouched traits are copied bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationPolicy {
    pub chance: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub trait_floor: f64,
}

impl From<&MutationConfig> for MutationPolicy {
    fn from(c: &MutationConfig) -> Self {
        Self {
            chance: c.chance,
            min_amount: c.min_amount,
            max_amount: c.max_amount,
            trait_floor: c.trait_floor,
        }
    }
}

impl MutationPolicy {
    pub fn mutate_value<R: Rng>(&self, value: f64, rng: &mut R) -> f64 {
        if self.chance <= rng.gen::<f64>() {
            return value;
        }
        let amount = rng.gen_range(self.min_amount..=self.max_amount);
        let shifted = if rng.gen::<bool>() {
            value + amount
        } else {
            value - amount
        };
        shifted.max(self.trait_floor)
    }

    pub fn mutate<R: Rng>(&self, traits: &Traits, rng: &mut R) -> Traits {
        Traits {
            size: self.mutate_value(traits.size, rng),
            speed: self.mutate_value(traits.speed, rng),
            sense: self.mutate_value(traits.sense, rng),
        }
    }
}

/// Builds a child from its parent's trait snapshot.
///
/// The child starts where the parent stands, facing the same way, with a
/// full day's energy and a fresh forager record.
pub fn offspring_of<R: Rng>(parent: &Organism, config: &SimConfig, rng: &mut R) -> Organism {
    let policy = MutationPolicy::from(&config.mutation);
    Organism {
        position: parent.position,
        traits: policy.mutate(&parent.traits, rng),
        heading: parent.heading,
        energy: Energy(config.day.day_energy),
        forager: Forager::default(),
        appearance: parent.appearance,
    }
}
