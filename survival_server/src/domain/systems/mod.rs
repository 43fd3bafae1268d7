// World rules. Each function mutates `WorldState` and returns what to tell clients.

pub mod blocks;
pub mod buildings;
pub mod capture;
pub mod combat;
pub mod economy;
pub mod janitor;
pub mod pickups;
pub mod players;

#[cfg(test)]
pub(crate) mod fixtures;
