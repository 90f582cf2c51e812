use crate::environment::Environment;
use forage_data::{Appearance, Vec2};
use serde::{Deserialize, Serialize};

/// What a renderer needs to draw one entity.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub position: Vec2,
    pub is_organism: bool,
    pub color: Appearance,
    /// Drawn size: the organism's size trait, or 1 for food.
    pub size: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    pub day: u32,
    pub minute: u32,
    pub width: u16,
    pub height: u16,
    pub entities: Vec<EntityView>,
}

impl WorldSnapshot {
    pub fn organisms(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| e.is_organism)
    }
}

/// Read-only view of every entity, in environment order.
pub fn entity_views(env: &Environment) -> Vec<EntityView> {
    env.snapshot_handles()
        .into_iter()
        .filter_map(|h| {
            if let Some(o) = env.organism(h) {
                Some(EntityView {
                    position: o.position,
                    is_organism: true,
                    color: o.appearance,
                    size: o.traits.size,
                })
            } else {
                env.position(h).map(|position| EntityView {
                    position,
                    is_organism: false,
                    color: Appearance::FOOD,
                    size: 1.0,
                })
            }
        })
        .collect()
}
