pub mod model;
pub mod report;

pub use forage_core::{init_logging, Edible, EntityKind, SimConfig, Simulation};
