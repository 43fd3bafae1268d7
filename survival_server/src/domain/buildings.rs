// Zoned building placement: footprints, BSP interiors and voxel walls.

use crate::domain::bsp::{Room, SpacePartitioner};
use crate::domain::state::{
    BlockType, Building, Circle, Floor, MaterialTier, Obstacle, Rect, WorldState,
};
use crate::domain::terrain::Biome;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

pub const VOXEL_SIZE: f32 = 20.0;

/// A themed district of the map.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: &'static str,
    pub center: (f32, f32),
    /// Max offset of a footprint centre from the zone centre, per axis.
    pub spread: f32,
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub tier: MaterialTier,
    pub materials: &'static [BlockType],
    /// Skip the grass test and flatten the footprint to grass.
    pub clear_terrain: bool,
}

impl Zone {
    pub fn plaza(&self, radius: f32) -> Circle {
        Circle {
            x: self.center.0,
            y: self.center.1,
            radius,
        }
    }
}

pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone {
            name: "residential",
            center: (1200.0, 1200.0),
            spread: 700.0,
            count: 6,
            min_size: 200.0,
            max_size: 320.0,
            tier: MaterialTier::Low,
            materials: &[BlockType::Wood, BlockType::Sand],
            clear_terrain: false,
        },
        Zone {
            name: "commercial",
            center: (3800.0, 1200.0),
            spread: 700.0,
            count: 5,
            min_size: 260.0,
            max_size: 400.0,
            tier: MaterialTier::Elevated,
            materials: &[BlockType::Brick],
            clear_terrain: false,
        },
        Zone {
            name: "military",
            center: (2600.0, 2600.0),
            spread: 700.0,
            count: 4,
            min_size: 300.0,
            max_size: 460.0,
            tier: MaterialTier::High,
            materials: &[BlockType::Metal],
            clear_terrain: true,
        },
        Zone {
            name: "industrial",
            center: (1200.0, 3800.0),
            spread: 700.0,
            count: 4,
            min_size: 300.0,
            max_size: 480.0,
            tier: MaterialTier::Elevated,
            materials: &[BlockType::Stone],
            clear_terrain: false,
        },
        Zone {
            name: "outskirts",
            center: (3800.0, 3800.0),
            spread: 700.0,
            count: 4,
            min_size: 220.0,
            max_size: 340.0,
            tier: MaterialTier::Low,
            materials: &[BlockType::Wood, BlockType::Sand],
            clear_terrain: false,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct PlacementTuning {
    pub attempts_per_building: usize,
    pub spacing_margin: f32,
    pub map_margin: f32,
    pub min_grass_ratio: f32,
    /// Capture plaza kept free at each zone centre.
    pub plaza_radius: f32,
    pub window_chance: f64,
    pub door_half_width: usize,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            attempts_per_building: 50,
            spacing_margin: 100.0,
            map_margin: 100.0,
            min_grass_ratio: 0.8,
            plaza_radius: 100.0,
            window_chance: 0.15,
            door_half_width: 1,
        }
    }
}

/// Places buildings zone by zone. Returns how many were placed.
pub fn generate_buildings(world: &mut WorldState, zones: &[Zone], tuning: &PlacementTuning) -> usize {
    let map_size = world.terrain.cols as f32 * world.terrain.tile_size;
    let mut placed = 0usize;

    for zone in zones {
        let mut in_zone = 0usize;
        for _ in 0..zone.count {
            let Some(footprint) = find_footprint(world, zone, map_size, tuning) else {
                continue;
            };
            build(world, zone, footprint, placed, tuning);
            placed += 1;
            in_zone += 1;
        }

        if in_zone < zone.count {
            warn!(
                zone = zone.name,
                placed = in_zone,
                requested = zone.count,
                "zone placement exhausted its attempts"
            );
        } else {
            debug!(zone = zone.name, placed = in_zone, "zone placed");
        }
    }

    info!(
        buildings = placed,
        obstacles = world.obstacles().len(),
        floors = world.floors.len(),
        "generated buildings"
    );
    placed
}

fn snap(size: f32) -> f32 {
    ((size / VOXEL_SIZE).floor() * VOXEL_SIZE).max(VOXEL_SIZE * 3.0)
}

fn find_footprint(
    world: &mut WorldState,
    zone: &Zone,
    map_size: f32,
    tuning: &PlacementTuning,
) -> Option<Rect> {
    let plaza = zone.plaza(tuning.plaza_radius);
    for _ in 0..tuning.attempts_per_building {
        let width = snap(world.rng.gen_range(zone.min_size..=zone.max_size));
        let height = snap(world.rng.gen_range(zone.min_size..=zone.max_size));
        let cx = zone.center.0 + world.rng.gen_range(-zone.spread..=zone.spread);
        let cy = zone.center.1 + world.rng.gen_range(-zone.spread..=zone.spread);
        let candidate = Rect::new(
            (cx - width / 2.0).floor(),
            (cy - height / 2.0).floor(),
            width,
            height,
        );

        if candidate.x < tuning.map_margin
            || candidate.y < tuning.map_margin
            || candidate.x + candidate.width > map_size - tuning.map_margin
            || candidate.y + candidate.height > map_size - tuning.map_margin
        {
            continue;
        }
        if !zone.clear_terrain && world.terrain.grass_ratio(candidate) <= tuning.min_grass_ratio {
            continue;
        }
        if world
            .buildings()
            .iter()
            .any(|b| b.footprint.inflate(tuning.spacing_margin).intersects(&candidate))
        {
            continue;
        }
        if rect_touches_circle(&candidate, &plaza) {
            continue;
        }
        return Some(candidate);
    }
    None
}

fn rect_touches_circle(rect: &Rect, circle: &Circle) -> bool {
    let nx = circle.x.clamp(rect.x, rect.x + rect.width);
    let ny = circle.y.clamp(rect.y, rect.y + rect.height);
    let (dx, dy) = (circle.x - nx, circle.y - ny);
    dx * dx + dy * dy <= circle.radius * circle.radius
}

fn build(world: &mut WorldState, zone: &Zone, footprint: Rect, index: usize, tuning: &PlacementTuning) {
    let material = zone
        .materials
        .choose(&mut world.rng)
        .copied()
        .unwrap_or(BlockType::Wood);
    let max_health = zone.tier.roll_max_health(&mut world.rng);
    let rooms = SpacePartitioner::new(footprint.width as i32, footprint.height as i32)
        .partition(zone.tier.bsp_splits(), &mut world.rng)
        .rooms();

    if zone.clear_terrain {
        flatten(world, footprint);
    }

    let building_id = format!("building_{index}");
    world.push_building(Building::new(
        building_id.clone(),
        footprint,
        rooms.clone(),
        zone.name.to_string(),
        material,
        zone.tier,
    ));

    let chunks_x = (footprint.width / VOXEL_SIZE) as usize;
    let chunks_y = (footprint.height / VOXEL_SIZE) as usize;
    let door_center = chunks_x / 2;

    for vx in 0..chunks_x {
        for vy in 0..chunks_y {
            let x = footprint.x + vx as f32 * VOXEL_SIZE;
            let y = footprint.y + vy as f32 * VOXEL_SIZE;
            let exterior = vx == 0 || vx == chunks_x - 1 || vy == 0 || vy == chunks_y - 1;

            if exterior || !inside_any(&rooms, vx, vy) {
                let block_type = if vy == 0 {
                    BlockType::Roof
                } else if exterior
                    && vy == chunks_y - 1
                    && vx.abs_diff(door_center) <= tuning.door_half_width
                {
                    BlockType::Door
                } else if exterior && world.rng.gen_bool(tuning.window_chance) {
                    BlockType::Window
                } else {
                    material
                };

                world.push_obstacle(Obstacle::wall(
                    format!("{building_id}_{vx}_{vy}"),
                    x,
                    y,
                    VOXEL_SIZE,
                    block_type,
                    max_health,
                    Some(building_id.clone()),
                ));
            } else {
                world.floors.push(Floor {
                    id: format!("floor_{index}_{vx}_{vy}"),
                    x,
                    y,
                    size: VOXEL_SIZE,
                    building_type: material,
                });
            }
        }
    }
}

fn inside_any(rooms: &[Room], vx: usize, vy: usize) -> bool {
    let lx = (vx as f32 * VOXEL_SIZE) as i32;
    let ly = (vy as f32 * VOXEL_SIZE) as i32;
    rooms.iter().any(|room| room.contains(lx, ly))
}

fn flatten(world: &mut WorldState, footprint: Rect) {
    let step = world.terrain.tile_size;
    let mut x = footprint.x;
    while x < footprint.x + footprint.width {
        let mut y = footprint.y;
        while y < footprint.y + footprint.height {
            if let Some(tile) = world.terrain.tile_at_mut(x, y) {
                tile.biome = Biome::Grass;
                tile.speed_modifier = 1.0;
            }
            y += step;
        }
        x += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::noise::NoiseField;
    use crate::domain::terrain::{MAP_SIZE, TILE_SIZE, TerrainGrid};
    use crate::domain::tuning::Tuning;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn world(seed: u64) -> WorldState {
        let terrain = TerrainGrid::generate(&NoiseField::seeded(seed), MAP_SIZE, TILE_SIZE);
        WorldState::new(
            terrain,
            ChaCha8Rng::seed_from_u64(seed),
            Tuning::default(),
            Some(seed),
        )
    }

    fn generated(seed: u64) -> WorldState {
        let mut world = world(seed);
        generate_buildings(&mut world, &default_zones(), &PlacementTuning::default());
        world
    }

    #[test]
    fn every_voxel_is_either_a_block_or_a_floor() {
        let world = generated(11);
        assert!(!world.buildings().is_empty());

        let blocks: HashSet<(i64, i64)> = world
            .obstacles()
            .iter()
            .map(|o| (o.x as i64, o.y as i64))
            .collect();
        let floors: HashSet<(i64, i64)> = world
            .floors
            .iter()
            .map(|f| (f.x as i64, f.y as i64))
            .collect();
        assert!(blocks.is_disjoint(&floors));

        for building in world.buildings() {
            let fp = building.footprint;
            let mut x = fp.x;
            while x < fp.x + fp.width {
                let mut y = fp.y;
                while y < fp.y + fp.height {
                    let key = (x as i64, y as i64);
                    assert!(
                        blocks.contains(&key) ^ floors.contains(&key),
                        "voxel {key:?} of {} is not exactly one of block/floor",
                        building.id
                    );
                    y += VOXEL_SIZE;
                }
                x += VOXEL_SIZE;
            }
        }
    }

    #[test]
    fn floors_sit_inside_rooms_and_walls_close_the_perimeter() {
        let world = generated(12);
        for building in world.buildings() {
            let fp = building.footprint;
            for floor in world.floors.iter().filter(|f| fp.contains_point(f.x, f.y)) {
                let lx = (floor.x - fp.x) as i32;
                let ly = (floor.y - fp.y) as i32;
                assert!(building.rooms.iter().any(|r| r.contains(lx, ly)));
                assert!(lx > 0 && ly > 0);
                assert!((lx as f32) < fp.width - VOXEL_SIZE);
                assert!((ly as f32) < fp.height - VOXEL_SIZE);
            }
        }
    }

    #[test]
    fn buildings_respect_spacing_plazas_and_blocks_share_health() {
        let world = generated(13);
        let tuning = PlacementTuning::default();
        let zones = default_zones();
        let buildings = world.buildings();

        for (i, a) in buildings.iter().enumerate() {
            assert_eq!(a.footprint.width % VOXEL_SIZE, 0.0);
            assert_eq!(a.footprint.height % VOXEL_SIZE, 0.0);
            for b in &buildings[i + 1..] {
                assert!(!a.footprint.inflate(tuning.spacing_margin).intersects(&b.footprint));
            }
            for zone in &zones {
                assert!(!rect_touches_circle(&a.footprint, &zone.plaza(tuning.plaza_radius)));
            }

            let blocks = world.building_blocks(&a.id);
            assert_eq!(a.total_blocks, blocks.len());
            let (lo, hi) = a.tier.health_range();
            let hp = world.obstacles()[blocks[0]].max_health;
            assert!(hp >= lo as f32 && hp <= hi as f32);
            assert!(blocks.iter().all(|&i| world.obstacles()[i].max_health == hp));
        }
    }

    #[test]
    fn roofs_top_and_doors_south() {
        let world = generated(14);
        for building in world.buildings() {
            let fp = building.footprint;
            let blocks = world.building_blocks(&building.id);
            let doors: Vec<_> = blocks
                .iter()
                .map(|&i| &world.obstacles()[i])
                .filter(|o| o.is_door)
                .collect();
            assert_eq!(doors.len(), 3);
            for door in doors {
                assert_eq!(door.y, fp.y + fp.height - VOXEL_SIZE);
            }
            for &i in &blocks {
                let o = &world.obstacles()[i];
                assert_eq!(o.block_type == BlockType::Roof, o.y == fp.y);
            }
        }
    }

    #[test]
    fn military_zone_ignores_terrain_and_is_metal() {
        let world = generated(15);
        for building in world.buildings().iter().filter(|b| b.zone == "military") {
            assert_eq!(building.material, BlockType::Metal);
            assert_eq!(building.tier, MaterialTier::High);
            let (cx, cy) = building.footprint.center();
            assert_eq!(
                world.terrain.tile_at(cx, cy).map(|t| t.biome),
                Some(Biome::Grass)
            );
        }
    }

    #[test]
    fn same_seed_places_the_same_buildings() {
        let a = generated(99);
        let b = generated(99);
        let ids = |w: &WorldState| {
            w.obstacles()
                .iter()
                .map(|o| (o.id.clone(), o.block_type, o.max_health as u32))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&a), ids(&b));
    }
}
