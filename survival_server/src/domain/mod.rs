// Domain layer: world generation, entities and game rules.

pub mod bsp;
pub mod buildings;
pub mod errors;
pub mod events;
pub mod noise;
pub mod roads;
pub mod scheduler;
pub mod state;
pub mod systems;
pub mod terrain;
pub mod tuning;
pub mod worldgen;

pub use errors::ActionError;
pub use events::{Audience, Emit, WorldEvent};
pub use state::WorldState;
