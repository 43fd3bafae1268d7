// Boot-time world pipeline: terrain, buildings, roads, then map furniture.

use crate::domain::buildings::{self, PlacementTuning, Zone};
use crate::domain::noise::NoiseField;
use crate::domain::roads::{self, RoadTuning};
use crate::domain::state::{AmmoCrate, CapturePoint, Pickup, WeaponSpawn, WorldState};
use crate::domain::terrain::{MAP_SIZE, TILE_SIZE, TerrainGrid};
use crate::domain::tuning::Tuning;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::info;

// (pickup type, count, respawn ms)
const WEAPON_TABLE: [(&str, usize, u64); 5] = [
    ("weapon_smg", 4, 30_000),
    ("weapon_shotgun", 4, 30_000),
    ("weapon_rifle", 3, 45_000),
    ("weapon_sniper", 2, 60_000),
    ("weapon_rocket", 2, 90_000),
];

#[derive(Debug, Clone)]
pub struct WorldGenConfig {
    pub map_size: f32,
    pub tile_size: f32,
    pub zones: Vec<Zone>,
    pub placement: PlacementTuning,
    pub roads: RoadTuning,
    pub capture_radius: f32,
    pub ammo_crates: usize,
    pub crate_ammo: u32,
    pub supply_pickups: usize,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            map_size: MAP_SIZE,
            tile_size: TILE_SIZE,
            zones: buildings::default_zones(),
            placement: PlacementTuning::default(),
            roads: RoadTuning::default(),
            capture_radius: 100.0,
            ammo_crates: 15,
            crate_ammo: 100,
            supply_pickups: 10,
        }
    }
}

/// Builds the full static map. `None` draws the seed from OS entropy.
pub fn generate_world(seed: Option<u64>, tuning: Tuning, config: &WorldGenConfig) -> WorldState {
    let (noise, rng) = match seed {
        Some(seed) => (
            NoiseField::seeded(seed),
            ChaCha8Rng::seed_from_u64(seed.rotate_left(17) ^ 0x9e37_79b9_7f4a_7c15),
        ),
        None => (NoiseField::from_entropy(), ChaCha8Rng::from_entropy()),
    };

    let terrain = TerrainGrid::generate(&noise, config.map_size, config.tile_size);
    let mut world = WorldState::new(terrain, rng, tuning, seed);

    buildings::generate_buildings(&mut world, &config.zones, &config.placement);
    let (terrain, placed) = world.terrain_and_buildings();
    roads::generate_roads(terrain, placed, &config.roads);

    place_capture_points(&mut world, &config.zones, config.capture_radius);
    place_ammo_crates(&mut world, config.ammo_crates, config.crate_ammo);
    place_weapons(&mut world);
    place_supplies(&mut world, config.supply_pickups);

    info!(
        seed = ?seed,
        buildings = world.buildings().len(),
        obstacles = world.obstacles().len(),
        capture_points = world.capture_points.len(),
        pickups = world.pickups.len(),
        "world generated"
    );
    world
}

fn place_capture_points(world: &mut WorldState, zones: &[Zone], radius: f32) {
    for (index, zone) in zones.iter().enumerate() {
        world.capture_points.push(CapturePoint {
            id: format!("capture_{index}"),
            x: zone.center.0,
            y: zone.center.1,
            radius,
            owner: None,
            capture_progress: BTreeMap::new(),
            level: 0,
            guards: Vec::new(),
            ammo_supply: 0,
        });
    }
}

fn place_ammo_crates(world: &mut WorldState, count: usize, ammo: u32) {
    for index in 0..count {
        let (x, y) = world.find_spawn_point();
        world.ammo_crates.push(AmmoCrate {
            id: format!("ammo_crate_{index}"),
            x,
            y,
            ammo_amount: ammo,
        });
    }
}

/// Weapons sit at room centres of random buildings.
fn place_weapons(world: &mut WorldState) {
    for (kind, count, respawn_time_ms) in WEAPON_TABLE {
        for _ in 0..count {
            let (x, y) = match random_room_center(world) {
                Some(point) => point,
                None => world.find_spawn_point(),
            };
            let index = world.weapon_spawns.len();
            let spawn = WeaponSpawn {
                kind: kind.to_string(),
                x,
                y,
                respawn_time_ms,
            };
            world.pickups.push(spawn.pickup(index));
            world.weapon_spawns.push(spawn);
        }
    }
}

fn random_room_center(world: &mut WorldState) -> Option<(f32, f32)> {
    if world.buildings().is_empty() {
        return None;
    }
    let b = world.rng.gen_range(0..world.buildings().len());
    let building = &world.buildings()[b];
    if building.rooms.is_empty() {
        return None;
    }
    let (fp, room_count) = (building.footprint, building.rooms.len());
    let r = world.rng.gen_range(0..room_count);
    let room = world.buildings()[b].rooms[r];
    Some((
        fp.x + room.x as f32 + room.width as f32 / 2.0,
        fp.y + room.y as f32 + room.height as f32 / 2.0,
    ))
}

fn place_supplies(world: &mut WorldState, count: usize) {
    for index in 0..count {
        let (x, y) = world.find_spawn_point();
        let kind = if world.rng.gen_bool(0.5) {
            "health"
        } else {
            "armor"
        };
        world
            .pickups
            .push(Pickup::new(format!("{kind}_{index}"), kind.to_string(), x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(world: &WorldState) -> (Vec<(String, u32)>, Vec<String>, usize) {
        (
            world
                .obstacles()
                .iter()
                .map(|o| (o.id.clone(), o.max_health as u32))
                .collect(),
            world
                .pickups
                .iter()
                .map(|p| format!("{}@{:.1},{:.1}", p.kind, p.x, p.y))
                .collect(),
            world
                .terrain
                .tiles()
                .iter()
                .filter(|t| t.biome == crate::domain::terrain::Biome::Road)
                .count(),
        )
    }

    #[test]
    fn same_seed_generates_the_same_world() {
        let config = WorldGenConfig::default();
        let a = generate_world(Some(123456789), Tuning::default(), &config);
        let b = generate_world(Some(123456789), Tuning::default(), &config);
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(a.terrain.tiles(), b.terrain.tiles());
    }

    #[test]
    fn furniture_is_placed() {
        let world = generate_world(Some(42), Tuning::default(), &WorldGenConfig::default());
        assert_eq!(world.capture_points.len(), 5);
        assert_eq!(world.ammo_crates.len(), 15);
        assert_eq!(world.weapon_spawns.len(), 15);
        assert_eq!(world.pickups.len(), 25);
        assert!(
            world
                .pickups
                .iter()
                .filter(|p| p.kind.starts_with("weapon_"))
                .all(|p| p.spawn_point_index.is_some() && p.respawn_time_ms.is_some())
        );

        let military = world
            .capture_points
            .iter()
            .find(|cp| (cp.x, cp.y) == (2600.0, 2600.0));
        assert!(military.is_some_and(|cp| cp.radius == 100.0 && cp.owner.is_none()));
    }
}
