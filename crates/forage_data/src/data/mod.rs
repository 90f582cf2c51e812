//! Plain data shared between the engine, persistence and front ends.

pub mod entity;
pub mod stats;
