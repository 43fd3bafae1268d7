/// Capture, hack and cleanup pacing. Steps are per simulation tick.

#[derive(Debug, Clone)]
pub struct CaptureTuning {
    pub point_step: f32,
    pub point_decay: f32,

    pub building_step: f32,
    /// Attacker gain while a foreign owner still holds progress.
    pub building_contest_step: f32,
    /// Owner progress drained per tick per attacker present.
    pub owner_drain: f32,
    pub building_decay: f32,

    /// Owned buildings below this integrity percentage are lost.
    pub integrity_threshold: f32,

    pub hack_duration_ms: u64,

    pub bullet_ttl_ms: u64,
    pub max_ability_pickups: usize,
}

impl Default for CaptureTuning {
    fn default() -> Self {
        Self {
            point_step: 2.0,
            point_decay: 1.0,
            building_step: 2.0,
            building_contest_step: 1.0,
            owner_drain: 2.0,
            building_decay: 0.5,
            integrity_threshold: 40.0,
            hack_duration_ms: 10_000,
            bullet_ttl_ms: 5_000,
            max_ability_pickups: 3,
        }
    }
}
