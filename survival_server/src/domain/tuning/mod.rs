// Gameplay tuning, kept separate from runtime/server configuration.

pub mod capture;
pub mod economy;
pub mod player;

pub use capture::CaptureTuning;
pub use economy::EconomyTuning;
pub use player::PlayerTuning;

#[derive(Debug, Clone, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub economy: EconomyTuning,
    pub capture: CaptureTuning,
}
