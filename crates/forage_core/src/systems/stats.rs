use crate::environment::Environment;
use forage_data::{DayStats, Traits};

/// Largest single trait value over all organisms, or 0 with none left.
pub fn max_trait(env: &Environment) -> f64 {
    env.ecs
        .query::<&Traits>()
        .iter()
        .map(|(_, t)| t.max_component())
        .fold(0.0, f64::max)
}

/// Aggregates for the day that just ended. `food` is the replenishment target.
pub fn collect_day_stats(env: &Environment, day: u32, food: usize) -> DayStats {
    let attributes: Vec<[f64; 3]> = env
        .organisms()
        .iter()
        .map(|o| o.traits.as_array())
        .collect();
    DayStats {
        day,
        population: attributes.len(),
        attributes,
        food,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_data::{Appearance, Energy, Forager, Heading, Organism, Vec2};

    fn spawn(env: &mut Environment, traits: Traits) {
        env.spawn_organism(Organism {
            position: Vec2::ZERO,
            traits,
            heading: Heading(Vec2::new(0.0, 1.0)),
            energy: Energy(1.0),
            forager: Forager::default(),
            appearance: Appearance::default(),
        });
    }

    #[test]
    fn test_max_trait_across_population() {
        let mut env = Environment::new(10, 10);
        assert_eq!(max_trait(&env), 0.0);
        spawn(&mut env, Traits::new(1.0, 3.0, 5.0));
        spawn(&mut env, Traits::new(2.0, 1.5, 10.0));
        env.spawn_food(Vec2::new(1.0, 1.0));
        assert_eq!(max_trait(&env), 10.0);
    }

    #[test]
    fn test_day_stats_lists_organisms_in_order() {
        let mut env = Environment::new(10, 10);
        spawn(&mut env, Traits::new(1.0, 3.0, 5.0));
        env.spawn_food(Vec2::new(1.0, 1.0));
        spawn(&mut env, Traits::new(2.0, 1.5, 5.0));
        let stats = collect_day_stats(&env, 4, 45);
        assert_eq!(stats.day, 4);
        assert_eq!(stats.population, 2);
        assert_eq!(stats.food, 45);
        assert_eq!(stats.attributes, vec![[1.0, 3.0, 5.0], [2.0, 1.5, 5.0]]);
    }
}
