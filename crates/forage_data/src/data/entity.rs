use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A point or displacement in the shared 2D coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).norm()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    #[must_use]
    pub fn normalized(self) -> Option<Vec2> {
        let n = self.norm();
        if n == 0.0 || !n.is_finite() {
            None
        } else {
            Some(Vec2::new(self.x / n, self.y / n))
        }
    }

    /// Rotates by `angle` radians (counter-clockwise).
    #[must_use]
    pub fn rotated(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    /// Periodic wrap into `[0, w) x [0, h)`.
    #[must_use]
    pub fn wrapped(self, w: f64, h: f64) -> Vec2 {
        Vec2::new(self.x.rem_euclid(w), self.y.rem_euclid(h))
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Heritable traits of an organism. Fixed at birth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub size: f64,
    pub speed: f64,
    pub sense: f64,
}

impl Traits {
    #[must_use]
    pub const fn new(size: f64, speed: f64, sense: f64) -> Self {
        Self { size, speed, sense }
    }

    /// Per-tick energy toll, independent of the distance actually moved.
    #[must_use]
    pub fn energy_cost(&self) -> f64 {
        self.size.powi(3) * self.speed.powi(2) + self.sense
    }

    /// `self` can consume `prey` iff it is at least `ratio` times larger.
    #[must_use]
    pub fn can_eat(&self, prey: &Traits, ratio: f64) -> bool {
        self.size >= ratio * prey.size
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 3] {
        [self.size, self.speed, self.sense]
    }

    #[must_use]
    pub fn max_component(&self) -> f64 {
        self.size.max(self.speed).max(self.sense)
    }
}

/// Daily behavioural mode. Only moves Foraging -> Returning within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForageState {
    #[default]
    Foraging,
    Returning,
}

/// Per-day bookkeeping of an organism.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Forager {
    pub food_found: u32,
    pub state: ForageState,
}

impl Forager {
    /// Moves to `Returning`; never reverts within the day.
    pub fn start_returning(&mut self) {
        self.state = ForageState::Returning;
    }

    pub fn reset_for_new_day(&mut self) {
        self.food_found = 0;
        self.state = ForageState::Foraging;
    }
}

/// Unit heading vector persisted between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub Vec2);

/// Remaining energy. May go negative before the day boundary culls it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy(pub f64);

/// Display color. Derived from traits, never read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

impl Appearance {
    pub const FOOD: Appearance = Appearance { r: 0, g: 255, b: 0 };
}

/// Marker for a food item. Food has a position and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Food;

/// A complete organism, detached from the environment arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub position: Vec2,
    pub traits: Traits,
    pub heading: Heading,
    pub energy: Energy,
    pub forager: Forager,
    pub appearance: Appearance,
}

impl Organism {
    #[must_use]
    pub fn energy_cost(&self) -> f64 {
        self.traits.energy_cost()
    }
}
