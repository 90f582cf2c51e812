//! The environment: every food item and organism sharing one coordinate space.
//!
//! Entities live in an [`hecs::World`], so a handle stays valid (or becomes
//! dead) independently of other removals. An insertion-ordered handle list
//! preserves the iteration order the simulation relies on for reproducible
//! runs.

use forage_data::{Appearance, Energy, Food, Forager, Heading, Organism, Traits, Vec2};
use hecs::Entity;

/// Anything that may end up as someone's meal.
pub trait Edible {
    /// Whether an organism with `eater` traits can consume this.
    fn is_edible_by(&self, eater: &Traits, ratio: f64) -> bool;
}

impl Edible for Food {
    fn is_edible_by(&self, _eater: &Traits, _ratio: f64) -> bool {
        true
    }
}

impl Edible for Traits {
    fn is_edible_by(&self, eater: &Traits, ratio: f64) -> bool {
        eater.can_eat(self, ratio)
    }
}

/// What an entity is, as seen by another entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Food,
    Organism(Traits),
}

impl EntityKind {
    pub fn is_organism(&self) -> bool {
        matches!(self, EntityKind::Organism(_))
    }

    /// Whether this entity can eat an organism with `prey` traits.
    pub fn can_eat(&self, prey: &Traits, ratio: f64) -> bool {
        match self {
            EntityKind::Food => false,
            EntityKind::Organism(t) => t.can_eat(prey, ratio),
        }
    }
}

impl Edible for EntityKind {
    fn is_edible_by(&self, eater: &Traits, ratio: f64) -> bool {
        match self {
            EntityKind::Food => Food.is_edible_by(eater, ratio),
            EntityKind::Organism(t) => t.is_edible_by(eater, ratio),
        }
    }
}

pub struct Environment {
    pub ecs: hecs::World,
    order: Vec<Entity>,
    width: u16,
    height: u16,
}

impl Environment {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ecs: hecs::World::new(),
            order: Vec::new(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn spawn_food(&mut self, position: Vec2) -> Entity {
        let handle = self.ecs.spawn((position, Food));
        self.order.push(handle);
        handle
    }

    pub fn spawn_organism(&mut self, organism: Organism) -> Entity {
        let handle = self.ecs.spawn((
            organism.position,
            organism.traits,
            organism.heading,
            organism.energy,
            organism.forager,
            organism.appearance,
        ));
        self.order.push(handle);
        handle
    }

    /// Removes an entity. Returns `false` if it was already gone.
    pub fn remove(&mut self, handle: Entity) -> bool {
        self.ecs.despawn(handle).is_ok()
    }

    pub fn contains(&self, handle: Entity) -> bool {
        self.ecs.contains(handle)
    }

    /// Drops dead handles from the iteration order.
    pub fn compact(&mut self) {
        let ecs = &self.ecs;
        self.order.retain(|&h| ecs.contains(h));
    }

    /// Live handles in insertion order. A stable snapshot for iteration
    /// while removals go to the live world.
    pub fn snapshot_handles(&self) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&h| self.ecs.contains(h))
            .collect()
    }

    pub fn organism_handles(&self) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&h| self.is_organism(h))
            .collect()
    }

    pub fn food_handles(&self) -> Vec<Entity> {
        self.order
            .iter()
            .copied()
            .filter(|&h| self.ecs.entity(h).is_ok_and(|e| e.has::<Food>()))
            .collect()
    }

    pub fn is_organism(&self, handle: Entity) -> bool {
        self.ecs.entity(handle).is_ok_and(|e| e.has::<Traits>())
    }

    pub fn kind(&self, handle: Entity) -> Option<EntityKind> {
        let entity = self.ecs.entity(handle).ok()?;
        if let Some(traits) = entity.get::<&Traits>() {
            Some(EntityKind::Organism(*traits))
        } else if entity.has::<Food>() {
            Some(EntityKind::Food)
        } else {
            None
        }
    }

    pub fn position(&self, handle: Entity) -> Option<Vec2> {
        self.ecs.get::<&Vec2>(handle).ok().map(|p| *p)
    }

    /// Detached copy of an organism's components.
    pub fn organism(&self, handle: Entity) -> Option<Organism> {
        let mut query = self
            .ecs
            .query_one::<(&Vec2, &Traits, &Heading, &Energy, &Forager, &Appearance)>(handle)
            .ok()?;
        let (position, traits, heading, energy, forager, appearance) = query.get()?;
        Some(Organism {
            position: *position,
            traits: *traits,
            heading: *heading,
            energy: *energy,
            forager: *forager,
            appearance: *appearance,
        })
    }

    /// Detached copies of every organism, in environment order.
    pub fn organisms(&self) -> Vec<Organism> {
        self.order
            .iter()
            .filter_map(|&h| self.organism(h))
            .collect()
    }

    pub fn organism_count(&self) -> usize {
        self.ecs.query::<&Traits>().iter().count()
    }

    pub fn food_count(&self) -> usize {
        self.ecs.query::<&Food>().iter().count()
    }

    pub fn len(&self) -> usize {
        self.ecs.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.ecs.len() == 0
    }

    /// Removes every uneaten food item. Returns how many were removed.
    pub fn remove_all_food(&mut self) -> usize {
        let food = self.food_handles();
        let removed = food.into_iter().filter(|&h| self.remove(h)).count();
        self.compact();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_data::ForageState;

    fn organism_at(x: f64, y: f64, size: f64) -> Organism {
        Organism {
            position: Vec2::new(x, y),
            traits: Traits::new(size, 1.0, 3.0),
            heading: Heading(Vec2::new(1.0, 0.0)),
            energy: Energy(100.0),
            forager: Forager::default(),
            appearance: Appearance::default(),
        }
    }

    #[test]
    fn test_spawn_and_read_back() {
        let mut env = Environment::new(100, 80);
        let f = env.spawn_food(Vec2::new(5.0, 5.0));
        let o = env.spawn_organism(organism_at(1.0, 2.0, 1.0));

        assert_eq!(env.len(), 2);
        assert_eq!(env.food_count(), 1);
        assert_eq!(env.organism_count(), 1);
        assert_eq!(env.kind(f), Some(EntityKind::Food));
        assert!(env.is_organism(o));
        let back = env.organism(o).unwrap();
        assert_eq!(back.position, Vec2::new(1.0, 2.0));
        assert_eq!(back.forager.state, ForageState::Foraging);
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut env = Environment::new(100, 80);
        let f = env.spawn_food(Vec2::new(5.0, 5.0));
        assert!(env.remove(f));
        assert!(!env.remove(f));
        assert!(!env.contains(f));
        assert!(env.kind(f).is_none());
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut env = Environment::new(100, 80);
        let a = env.spawn_food(Vec2::new(1.0, 1.0));
        let b = env.spawn_organism(organism_at(2.0, 2.0, 1.0));
        let c = env.spawn_food(Vec2::new(3.0, 3.0));
        env.remove(b);
        let d = env.spawn_organism(organism_at(4.0, 4.0, 1.0));
        assert_eq!(env.snapshot_handles(), vec![a, c, d]);
        assert_eq!(env.organism_handles(), vec![d]);
        assert_eq!(env.food_handles(), vec![a, c]);
    }

    #[test]
    fn test_edible_capability() {
        let ratio = 1.6;
        let small = Traits::new(1.0, 1.0, 1.0);
        let big = Traits::new(2.0, 1.0, 1.0);
        assert!(EntityKind::Food.is_edible_by(&small, ratio));
        assert!(EntityKind::Organism(small).is_edible_by(&big, ratio));
        assert!(!EntityKind::Organism(big).is_edible_by(&small, ratio));
        assert!(EntityKind::Organism(big).can_eat(&small, ratio));
        assert!(!EntityKind::Food.can_eat(&small, ratio));
    }

    #[test]
    fn test_remove_all_food() {
        let mut env = Environment::new(100, 80);
        for i in 0..5 {
            env.spawn_food(Vec2::new(i as f64, 1.0));
        }
        env.spawn_organism(organism_at(2.0, 2.0, 1.0));
        assert_eq!(env.remove_all_food(), 5);
        assert_eq!(env.food_count(), 0);
        assert_eq!(env.organism_count(), 1);
        assert_eq!(env.snapshot_handles().len(), 1);
    }
}
