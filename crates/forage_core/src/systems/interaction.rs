//! Consumption phase: who eats whom after everyone has moved.

use crate::config::SimConfig;
use crate::environment::{Edible, Environment};
use crate::lifecycle::closest_border;
use crate::spatial_hash::SpatialHash;
use forage_data::{Appearance, Forager, Traits, Vec2};
use hecs::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub meals: usize,
    pub predations: usize,
}

/// Whether an organism that just ate should start heading home.
///
/// A second meal always triggers the return; otherwise it is triggered once
/// the trip to the border would take at least the minutes left minus the
/// safety margin.
pub fn should_return(
    food_found: u32,
    distance_to_border: f64,
    speed: f64,
    minutes_left: f64,
    margin: f64,
) -> bool {
    food_found > 1 || distance_to_border / speed >= minutes_left - margin
}

/// Display color: each trait scaled against the largest trait value seen
/// among all organisms this tick.
pub fn trait_color(traits: &Traits, max_trait: f64) -> Appearance {
    if max_trait <= 0.0 || !max_trait.is_finite() {
        return Appearance::default();
    }
    let channel = |v: f64| (v * 255.0 / max_trait).clamp(0.0, 255.0) as u8;
    Appearance {
        r: channel(traits.size),
        g: channel(traits.speed),
        b: channel(traits.sense),
    }
}

/// Resolves consumption for every organism of the pre-movement `snapshot`.
///
/// `positions[i]` is the post-movement position of `snapshot[i]` and
/// `spatial` was built from `positions`; it only decides who is nearby. Removals go to the live
/// environment; an organism eaten earlier in this phase no longer acts, and
/// an entity already eaten cannot be eaten again. Each organism eats at most
/// once, then has its position wrapped and its color refreshed.
pub fn interaction_phase(
    env: &mut Environment,
    snapshot: &[Entity],
    positions: &[Vec2],
    spatial: &SpatialHash,
    config: &SimConfig,
    minute: u32,
    max_trait: f64,
) -> InteractionOutcome {
    let mut outcome = InteractionOutcome::default();
    let ratio = config.organism.predator_prey_ratio;
    let width = f64::from(config.world.width);
    let height = f64::from(config.world.height);
    let minutes_left = f64::from(config.day.minutes_per_day) - f64::from(minute);
    let margin = f64::from(config.day.return_margin_minutes);
    let mut nearby = Vec::new();

    for (idx, &handle) in snapshot.iter().enumerate() {
        let Some(organism) = env.organism(handle) else {
            continue;
        };
        let traits = organism.traits;
        let mut position = organism.position;
        let mut forager: Forager = organism.forager;

        let radius = traits.sense * config.organism.sense_factor;
        spatial.query_within_radius(position, radius, positions, &mut nearby);

        for &n in &nearby {
            if n == idx {
                continue;
            }
            let target = snapshot[n];
            // Contact is measured against the live position, which may
            // already have been wrapped earlier in this phase.
            let Some(target_position) = env.position(target) else {
                continue;
            };
            if target_position.distance(position) > config.organism.contact_distance {
                continue;
            }
            let Some(kind) = env.kind(target) else {
                continue;
            };
            if !kind.is_edible_by(&traits, ratio) {
                continue;
            }
            if env.remove(target) {
                forager.food_found += 1;
                if kind.is_organism() {
                    outcome.predations += 1;
                } else {
                    outcome.meals += 1;
                }
                tracing::trace!(
                    eater = ?handle,
                    eaten = ?target,
                    predation = kind.is_organism(),
                    food_found = forager.food_found,
                    "Consumption"
                );
                let (dist, _) = closest_border(position, width, height);
                if should_return(forager.food_found, dist, traits.speed, minutes_left, margin) {
                    forager.start_returning();
                }
                break;
            }
        }

        position = position.wrapped(config.wrap_width(), config.wrap_height());
        let appearance = trait_color(&traits, max_trait);

        if let Ok((p, f, a)) = env
            .ecs
            .query_one_mut::<(&mut Vec2, &mut Forager, &mut Appearance)>(handle)
        {
            *p = position;
            *f = forager;
            *a = appearance;
        }
    }

    env.compact();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_data::{Energy, ForageState, Heading, Organism};

    fn organism(x: f64, y: f64, size: f64) -> Organism {
        Organism {
            position: Vec2::new(x, y),
            traits: Traits::new(size, 1.0, 3.0),
            heading: Heading(Vec2::new(1.0, 0.0)),
            energy: Energy(100.0),
            forager: Forager::default(),
            appearance: Appearance::default(),
        }
    }

    fn resolve(env: &mut Environment, config: &SimConfig, minute: u32) -> InteractionOutcome {
        let snapshot = env.snapshot_handles();
        let positions: Vec<Vec2> = snapshot.iter().filter_map(|&h| env.position(h)).collect();
        let mut spatial = SpatialHash::new(5.0, config.wrap_width(), config.wrap_height());
        spatial.build(&positions);
        interaction_phase(env, &snapshot, &positions, &spatial, config, minute, 3.0)
    }

    #[test]
    fn test_eats_food_in_contact_once_per_tick() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        env.spawn_food(Vec2::new(40.0, 40.0));
        env.spawn_food(Vec2::new(40.0, 40.005));
        env.spawn_food(Vec2::new(40.0, 40.5));
        let o = env.spawn_organism(organism(40.0, 40.0, 1.0));

        let outcome = resolve(&mut env, &config, 0);
        assert_eq!(outcome.meals, 1);
        assert_eq!(env.food_count(), 2);
        let after = env.organism(o).unwrap();
        assert_eq!(after.forager.food_found, 1);
        assert_eq!(after.forager.state, ForageState::Foraging);
    }

    #[test]
    fn test_second_meal_triggers_return() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        env.spawn_food(Vec2::new(40.0, 40.0));
        let mut fed = organism(40.0, 40.0, 1.0);
        fed.forager.food_found = 1;
        let o = env.spawn_organism(fed);

        resolve(&mut env, &config, 0);
        let after = env.organism(o).unwrap();
        assert_eq!(after.forager.food_found, 2);
        assert_eq!(after.forager.state, ForageState::Returning);
    }

    #[test]
    fn test_late_meal_far_from_border_triggers_return() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        env.spawn_food(Vec2::new(40.0, 40.0));
        let o = env.spawn_organism(organism(40.0, 40.0, 1.0));

        // 40 units from the border at speed 1, 45 minutes left, 5 minute margin.
        resolve(&mut env, &config, 55);
        assert_eq!(env.organism(o).unwrap().forager.state, ForageState::Returning);
    }

    #[test]
    fn test_shared_target_is_eaten_once() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        let a = env.spawn_organism(organism(30.0, 30.0, 1.0));
        env.spawn_food(Vec2::new(30.0, 30.0));
        let b = env.spawn_organism(organism(30.0, 30.0, 1.0));

        let outcome = resolve(&mut env, &config, 0);
        assert_eq!(outcome.meals, 1);
        assert_eq!(env.organism(a).unwrap().forager.food_found, 1);
        assert_eq!(env.organism(b).unwrap().forager.food_found, 0);
    }

    #[test]
    fn test_predation_is_one_way_and_eaten_prey_does_not_act() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        let big = env.spawn_organism(organism(20.0, 20.0, 2.0));
        let small = env.spawn_organism(organism(20.0, 20.0, 1.0));
        env.spawn_food(Vec2::new(20.0, 20.0));

        let outcome = resolve(&mut env, &config, 0);
        assert_eq!(outcome.predations, 1);
        assert!(!env.contains(small));
        assert_eq!(env.organism(big).unwrap().forager.food_found, 1);
        assert_eq!(env.food_count(), 1);
    }

    #[test]
    fn test_positions_wrap_periodically() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        let o = env.spawn_organism(organism(101.5, -0.5, 1.0));
        resolve(&mut env, &config, 0);
        let p = env.organism(o).unwrap().position;
        assert!((p.x - 0.5).abs() < 1e-9);
        assert!((p.y - 80.5).abs() < 1e-9);
    }

    #[test]
    fn test_color_scales_by_max_trait() {
        let c = trait_color(&Traits::new(1.0, 3.0, 5.0), 10.0);
        assert_eq!((c.r, c.g, c.b), (25, 76, 127));
        assert_eq!(trait_color(&Traits::new(1.0, 1.0, 1.0), 0.0), Appearance::default());
    }

    #[test]
    fn test_contact_uses_wrapped_position_of_earlier_actor() {
        let config = SimConfig::default();
        let mut env = Environment::new(100, 80);
        let prey = env.spawn_organism(organism(101.0, 40.0, 1.0));
        let predator = env.spawn_organism(organism(100.995, 40.0, 2.0));

        let outcome = resolve(&mut env, &config, 0);
        assert_eq!(outcome.predations, 0);
        assert!(env.contains(prey));
        assert_eq!(env.organism(prey).unwrap().position, Vec2::new(0.0, 40.0));
        assert_eq!(env.organism(predator).unwrap().forager.food_found, 0);
    }
}
