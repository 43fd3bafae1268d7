/// Scrap economy, block durability and pickup payloads.

#[derive(Debug, Clone)]
pub struct EconomyTuning {
    pub scrap_per_block: u32,
    pub crate_scrap: u32,

    pub obstacle_hit_damage: f32,
    pub hammer_hit_damage: f32,
    /// Damage divisor against blocks of a building owned by someone else.
    pub fortified_divisor: f32,

    pub repair_cost: u32,
    /// Health restored per repair on a standing block.
    pub repair_amount: f32,
    /// Health of a debris block rebuilt into a wall.
    pub rebuild_health: f32,

    pub terminal_upgrade_cost: u32,
    pub terminal_upgrade_multiplier: f32,

    /// Scrap cost indexed by the level being bought.
    pub base_upgrade_costs: [u32; 4],
    pub guard_supply_cost: u32,
    pub guard_supply_ammo: u32,

    pub health_pickup: f32,
    pub armor_pickup: f32,
    pub scrap_pickup: u32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            scrap_per_block: 2,
            crate_scrap: 10,
            obstacle_hit_damage: 20.0,
            hammer_hit_damage: 30.0,
            fortified_divisor: 10.0,
            repair_cost: 1,
            repair_amount: 100.0,
            rebuild_health: 100.0,
            terminal_upgrade_cost: 100,
            terminal_upgrade_multiplier: 1.5,
            base_upgrade_costs: [0, 50, 100, 200],
            guard_supply_cost: 5,
            guard_supply_ammo: 50,
            health_pickup: 30.0,
            armor_pickup: 50.0,
            scrap_pickup: 5,
        }
    }
}
