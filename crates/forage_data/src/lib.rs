//! Core data structures for the Forage simulation.

pub mod data;

pub use data::entity::{
    Appearance, Energy, Food, ForageState, Forager, Heading, Organism, Traits, Vec2,
};
pub use data::stats::{DayStats, RunStats};
