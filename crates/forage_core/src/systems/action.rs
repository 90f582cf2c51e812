//! Movement phase: every organism picks one move per tick and pays for it.

use crate::config::SimConfig;
use crate::environment::{Edible, EntityKind, Environment};
use crate::lifecycle::closest_border;
use crate::spatial_hash::SpatialHash;
use forage_data::{Energy, ForageState, Heading, Organism, Vec2};
use hecs::Entity;
use rand::Rng;

/// Something an organism can perceive this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perceived {
    pub position: Vec2,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Flee,
    Return,
    Seek,
    Wander,
}

/// The outcome of a movement decision, before energy is checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub intent: Intent,
    /// Unit direction of travel. `None` means stay put this tick.
    pub direction: Option<Vec2>,
    pub step: f64,
    /// New persistent heading, if the decision changes it.
    pub heading: Option<Vec2>,
}

impl Movement {
    fn stay(intent: Intent) -> Self {
        Self {
            intent,
            direction: None,
            step: 0.0,
            heading: None,
        }
    }

    fn toward(intent: Intent, offset: Vec2, step: f64) -> Self {
        match offset.normalized() {
            Some(direction) => Self {
                intent,
                direction: Some(direction),
                step,
                heading: None,
            },
            None => Self::stay(intent),
        }
    }

    /// Distance this movement covers if it is executed.
    pub fn displacement(&self) -> Vec2 {
        self.direction.map_or(Vec2::ZERO, |d| d * self.step)
    }
}

fn nearest(from: Vec2, candidates: impl Iterator<Item = Vec2>) -> Option<(Vec2, f64)> {
    let mut best: Option<(Vec2, f64)> = None;
    for p in candidates {
        let d = from.distance(p);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((p, d));
        }
    }
    best
}

/// Decides the move of `organism` given what it perceives.
///
/// Priority, highest first: flee the nearest predator, head to the nearest
/// border while returning, approach the nearest edible entity, wander.
/// `neighbors` must not contain the organism itself.
pub fn choose_movement<R: Rng>(
    organism: &Organism,
    neighbors: &[Perceived],
    config: &SimConfig,
    rng: &mut R,
) -> Movement {
    let ratio = config.organism.predator_prey_ratio;
    let me = organism.traits;
    let pos = organism.position;
    let speed = me.speed;

    let predator = nearest(
        pos,
        neighbors
            .iter()
            .filter(|n| !n.kind.is_edible_by(&me, ratio) && n.kind.can_eat(&me, ratio))
            .map(|n| n.position),
    );
    if let Some((predator_pos, _)) = predator {
        // Negated sum of both positions, not the displacement between them.
        return Movement::toward(Intent::Flee, -(predator_pos + pos), speed);
    }

    if organism.forager.state == ForageState::Returning {
        let (dist, border) = closest_border(
            pos,
            f64::from(config.world.width),
            f64::from(config.world.height),
        );
        return Movement::toward(Intent::Return, border - pos, dist.min(speed));
    }

    let meal = nearest(
        pos,
        neighbors
            .iter()
            .filter(|n| n.kind.is_edible_by(&me, ratio))
            .map(|n| n.position),
    );
    if let Some((target, dist)) = meal {
        return Movement::toward(Intent::Seek, target - pos, dist.min(speed));
    }

    let spread = config.organism.wander_angle;
    let angle = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };
    let turned = organism.heading.0.rotated(angle);
    match turned.normalized() {
        Some(heading) => Movement {
            intent: Intent::Wander,
            direction: Some(heading),
            step: speed,
            heading: Some(heading),
        },
        None => Movement::stay(Intent::Wander),
    }
}

/// Executes a movement: moves only if energy covers the cost, always pays it.
pub fn apply_movement(
    position: &mut Vec2,
    heading: &mut Heading,
    energy: &mut Energy,
    cost: f64,
    movement: &Movement,
) {
    if let Some(h) = movement.heading {
        heading.0 = h;
    }
    if energy.0 >= cost {
        *position += movement.displacement();
    }
    energy.0 -= cost;
}

/// Runs the movement phase over every organism in `handles` order.
///
/// `positions` and `spatial` describe the environment at the start of the
/// tick; neighbor membership comes from them while the positions used for
/// decisions are read live, so later movers see earlier moves.
pub fn movement_phase<R: Rng>(
    env: &mut Environment,
    handles: &[Entity],
    positions: &[Vec2],
    spatial: &SpatialHash,
    config: &SimConfig,
    rng: &mut R,
) {
    let mut nearby = Vec::new();
    let mut perceived = Vec::new();

    for (idx, &handle) in handles.iter().enumerate() {
        let Some(organism) = env.organism(handle) else {
            continue;
        };
        let radius = organism.traits.sense * config.organism.sense_factor;
        spatial.query_within_radius(organism.position, radius, positions, &mut nearby);

        perceived.clear();
        for &n in &nearby {
            if n == idx {
                continue;
            }
            let other = handles[n];
            if let (Some(position), Some(kind)) = (env.position(other), env.kind(other)) {
                perceived.push(Perceived { position, kind });
            }
        }

        let movement = choose_movement(&organism, &perceived, config, rng);
        let cost = organism.energy_cost();
        if let Ok((position, heading, energy)) = env
            .ecs
            .query_one_mut::<(&mut Vec2, &mut Heading, &mut Energy)>(handle)
        {
            apply_movement(position, heading, energy, cost, &movement);
        }
    }
}
