pub mod action;
pub mod day_cycle;
pub mod interaction;
pub mod stats;
