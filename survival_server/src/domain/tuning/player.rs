/// Gameplay tuning for player avatars.

#[derive(Debug, Clone)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub max_armor: f32,

    /// Grace window after spawning or respawning, in milliseconds.
    pub invulnerability_ms: u64,

    /// Delay between death and respawn, in milliseconds.
    pub respawn_delay_ms: u64,

    pub default_weapon: &'static str,
    pub default_color: &'static str,
    pub max_name_len: usize,

    /// Damage applied by a `bulletHit` that carries no amount.
    pub default_bullet_damage: f32,

    /// Spawn points are sampled inside `[spawn_min, spawn_max]` on both axes.
    pub spawn_min: f32,
    pub spawn_max: f32,
    /// Clearance kept from standing walls when sampling spawn points.
    pub spawn_margin: f32,
    pub spawn_attempts: usize,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_armor: 100.0,
            invulnerability_ms: 1500,
            respawn_delay_ms: 2000,
            default_weapon: "pistol",
            default_color: "#4ecdc4",
            max_name_len: 20,
            default_bullet_damage: 20.0,
            spawn_min: 200.0,
            spawn_max: 4800.0,
            spawn_margin: 50.0,
            spawn_attempts: 10,
        }
    }
}
