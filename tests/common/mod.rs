use forage_lib::model::config::SimConfig;
use forage_lib::model::environment::Environment;
use forage_lib::model::simulation::Simulation;
use forage_lib::model::state::{
    Appearance, Energy, ForageState, Forager, Heading, Organism, Traits, Vec2,
};
use hecs::Entity;

#[allow(dead_code)]
pub struct SimulationBuilder {
    config: SimConfig,
    organisms: Vec<Organism>,
    food: Vec<Vec2>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.population.clear();
        config.food.initial_amount = 0;
        config.world.seed = Some(0);
        Self {
            config,
            organisms: Vec::new(),
            food: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_organism(mut self, organism: Organism) -> Self {
        self.organisms.push(organism);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push(Vec2::new(x, y));
        self
    }

    /// Food on a regular interior lattice, `count` items.
    pub fn with_food_grid(mut self, count: usize) -> Self {
        let width = u32::from(self.config.world.width).saturating_sub(2).max(1);
        for i in 0..count as u32 {
            let x = 1 + i % width;
            let y = 1 + i / width;
            self.food.push(Vec2::new(f64::from(x), f64::from(y)));
        }
        self
    }

    /// Builds the simulation. Food is spawned before organisms, and the
    /// returned handles follow the order organisms were added.
    pub fn build(self) -> (Simulation, Vec<Entity>) {
        let mut env = Environment::new(self.config.world.width, self.config.world.height);
        for p in self.food {
            env.spawn_food(p);
        }
        let handles = self
            .organisms
            .into_iter()
            .map(|o| env.spawn_organism(o))
            .collect();
        let sim = Simulation::with_environment(self.config, env)
            .expect("Failed to create simulation in test builder");
        (sim, handles)
    }
}

#[allow(dead_code)]
pub struct OrganismBuilder {
    position: Vec2,
    traits: Traits,
    heading: Vec2,
    energy: f64,
    food_found: u32,
    state: ForageState,
}

#[allow(dead_code)]
impl OrganismBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::new(10.0, 10.0),
            traits: Traits::new(1.0, 1.0, 3.0),
            heading: Vec2::new(1.0, 0.0),
            energy: 2500.0,
            food_found: 0,
            state: ForageState::Foraging,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn traits(mut self, size: f64, speed: f64, sense: f64) -> Self {
        self.traits = Traits::new(size, speed, sense);
        self
    }

    pub fn heading(mut self, x: f64, y: f64) -> Self {
        self.heading = Vec2::new(x, y);
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = amount;
        self
    }

    pub fn food_found(mut self, count: u32) -> Self {
        self.food_found = count;
        self
    }

    pub fn returning(mut self) -> Self {
        self.state = ForageState::Returning;
        self
    }

    pub fn build(self) -> Organism {
        Organism {
            position: self.position,
            traits: self.traits,
            heading: Heading(self.heading),
            energy: Energy(self.energy),
            forager: Forager {
                food_found: self.food_found,
                state: self.state,
            },
            appearance: Appearance::default(),
        }
    }
}
