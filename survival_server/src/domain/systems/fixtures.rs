// Small hand-built worlds for rule tests.

use crate::domain::bsp::Room;
use crate::domain::noise::NoiseField;
use crate::domain::state::{
    BlockType, Building, MaterialTier, Obstacle, Player, Rect, WorldState,
};
use crate::domain::terrain::TerrainGrid;
use crate::domain::tuning::Tuning;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn world() -> WorldState {
    let terrain = TerrainGrid::generate(&NoiseField::seeded(1), 1000.0, 50.0);
    WorldState::new(
        terrain,
        ChaCha8Rng::seed_from_u64(1),
        Tuning::default(),
        Some(1),
    )
}

pub fn add_player(world: &mut WorldState, id: &str, x: f32, y: f32) {
    world.players.insert(
        id.to_string(),
        Player {
            id: id.to_string(),
            name: format!("name-{id}"),
            x,
            y,
            angle: 0.0,
            health: 100.0,
            max_health: 100.0,
            armor: 0.0,
            max_armor: 100.0,
            color: "#fff".into(),
            weapon: "pistol".into(),
            ability: None,
            scrap: 0,
            invulnerable: false,
            invulnerable_until: 0,
            is_dead: false,
        },
    );
}

pub fn player<'a>(world: &'a WorldState, id: &str) -> &'a Player {
    &world.players[id]
}

pub fn set_scrap(world: &mut WorldState, id: &str, scrap: u32) {
    if let Some(p) = world.players.get_mut(id) {
        p.scrap = scrap;
    }
}

/// A 4x1 voxel building at (200, 200) whose capture zone is centred at (240, 210).
pub fn add_building(world: &mut WorldState, id: &str, block_health: f32) {
    let footprint = Rect::new(200.0, 200.0, 80.0, 20.0);
    world.push_building(Building::new(
        id.to_string(),
        footprint,
        vec![Room {
            x: 0,
            y: 0,
            width: 80,
            height: 20,
        }],
        "test".into(),
        BlockType::Wood,
        MaterialTier::Low,
    ));
    for i in 0..4 {
        let block_type = if i == 1 || i == 2 {
            BlockType::Door
        } else {
            BlockType::Wood
        };
        world.push_obstacle(Obstacle::wall(
            format!("{id}_{i}_0"),
            200.0 + i as f32 * 20.0,
            200.0,
            20.0,
            block_type,
            block_health,
            Some(id.to_string()),
        ));
    }
}

pub fn set_owner(world: &mut WorldState, building_id: &str, owner: &str) {
    if let Some(b) = world.building_mut(building_id) {
        b.owner_id = Some(owner.to_string());
        b.owner_name = Some(owner.to_string());
        b.capture_progress.insert(owner.to_string(), 100.0);
    }
}
