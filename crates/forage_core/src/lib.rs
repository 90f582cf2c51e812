//! # Forage Core
//!
//! The deterministic engine of the forage simulator: organisms with
//! heritable size, speed and sense search for food on a rectangular field,
//! flee from larger organisms, return to the border before nightfall and
//! reproduce with mutation.
//!
//! ## Architecture
//!
//! - **Environment arena**: food and organisms live in one `hecs` world with
//!   a stable iteration order
//! - **Systems**: movement, interaction, day cycle and statistics run in a
//!   fixed order each tick
//! - **Spatial hashing**: a uniform grid rebuilt before every phase
//! - **Deterministic runs**: one seeded `ChaCha8Rng` per simulation
//!
//! ## Example
//!
//! ```
//! use forage_core::config::SimConfig;
//! use forage_core::simulation::Simulation;
//!
//! let mut config = SimConfig::default();
//! config.world.seed = Some(42);
//! let mut sim = Simulation::new(config).unwrap();
//! let stats = sim.run(Some(2));
//! assert_eq!(stats.population.len() as u32, sim.day() + 1);
//! ```

/// Isolated parallel runs of named experiments
pub mod batch;
/// Simulation parameters and validation
pub mod config;
/// Entity arena shared by food and organisms
pub mod environment;
/// Founder creation, reproduction and mutation
pub mod lifecycle;
/// Run counters and structured logging
pub mod metrics;
/// The tick/day loop
pub mod simulation;
/// Read-only views for renderers
pub mod snapshot;
/// Uniform grid for radius queries
pub mod spatial_hash;
/// Per-tick and per-day systems
pub mod systems;

pub use config::SimConfig;
pub use environment::{Edible, EntityKind, Environment};
pub use metrics::{init_logging, Metrics};
pub use simulation::{step, Simulation};
