// Use cases layer: application workflows for the survival server.

pub mod game;
pub mod session;
pub mod simulation;
pub mod types;

pub use simulation::GameWorld;
pub use types::{Command, ConnId, GameEvent, Outbound, Recipients, WorldStats};
