pub use forage_core::{Edible, EntityKind};
pub mod batch {
    pub use forage_core::batch::*;
}
pub mod config {
    pub use forage_core::config::*;
}
pub mod spatial_hash {
    pub use forage_core::spatial_hash::*;
}
pub mod lifecycle {
    pub use forage_core::lifecycle::*;
}
pub mod environment {
    pub use forage_core::environment::*;
}
pub mod snapshot {
    pub use forage_core::snapshot::*;
}
pub mod simulation {
    pub use forage_core::simulation::*;
}
pub mod systems {
    pub use forage_core::systems::*;
}
pub mod history {
    pub use forage_io::history::*;
}

pub mod state {
    pub use forage_data::*;
}
