// Authoritative world entities and the arena store that owns them.

use crate::domain::bsp::Room;
use crate::domain::terrain::TerrainGrid;
use crate::domain::tuning::Tuning;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};

pub type PlayerId = String;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Wood,
    Sand,
    Brick,
    Stone,
    Metal,
    Roof,
    Window,
    Door,
    Debris,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Wood => "wood",
            BlockType::Sand => "sand",
            BlockType::Brick => "brick",
            BlockType::Stone => "stone",
            BlockType::Metal => "metal",
            BlockType::Roof => "roof",
            BlockType::Window => "window",
            BlockType::Door => "door",
            BlockType::Debris => "debris",
        }
    }
}

/// Durability class of a zone's buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialTier {
    Low,
    Elevated,
    High,
}

impl MaterialTier {
    pub fn bsp_splits(self) -> usize {
        match self {
            MaterialTier::Low => 2,
            MaterialTier::Elevated => 3,
            MaterialTier::High => 4,
        }
    }

    /// Inclusive block max-health bounds; rolled in steps of 100.
    pub fn health_range(self) -> (u32, u32) {
        match self {
            MaterialTier::Low => (1000, 1500),
            MaterialTier::Elevated => (1500, 2000),
            MaterialTier::High => (2000, 2000),
        }
    }

    pub fn roll_max_health<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        let (lo, hi) = self.health_range();
        let steps = (hi - lo) / 100;
        (lo + rng.gen_range(0..=steps) * 100) as f32
    }
}

/// Result of applying damage to a standing block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    Damaged { health: f32 },
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepairOutcome {
    Rebuilt { block_type: BlockType, health: f32 },
    Repaired { health: f32 },
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub block_type: BlockType,
    pub is_wall: bool,
    pub is_door: bool,
    pub is_open: bool,
    pub building_id: Option<String>,
    pub is_destroyed: bool,
    pub original_type: Option<BlockType>,
}

impl Obstacle {
    pub fn wall(
        id: String,
        x: f32,
        y: f32,
        size: f32,
        block_type: BlockType,
        max_health: f32,
        building_id: Option<String>,
    ) -> Self {
        Self {
            id,
            x,
            y,
            width: size,
            height: size,
            health: max_health,
            max_health,
            block_type,
            is_wall: true,
            is_door: block_type == BlockType::Door,
            is_open: false,
            building_id,
            is_destroyed: false,
            original_type: None,
        }
    }

    pub fn is_standing(&self) -> bool {
        !self.is_destroyed
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Health is clamped at zero; reaching it converts the block into debris.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health = (self.health - amount).max(0.0);
        if self.health > 0.0 {
            return DamageOutcome::Damaged {
                health: self.health,
            };
        }

        self.original_type = Some(self.block_type);
        self.block_type = BlockType::Debris;
        self.is_destroyed = true;
        self.is_wall = false;
        self.is_door = false;
        self.is_open = false;
        DamageOutcome::Destroyed
    }

    /// Debris is rebuilt into its original material; standing blocks are topped up.
    pub fn repair(&mut self, amount: f32, rebuild_health: f32) -> RepairOutcome {
        if self.is_destroyed {
            let restored = self.original_type.take().unwrap_or(BlockType::Wood);
            self.block_type = restored;
            self.is_destroyed = false;
            self.is_wall = true;
            self.is_door = restored == BlockType::Door;
            self.is_open = false;
            self.health = rebuild_health.min(self.max_health);
            return RepairOutcome::Rebuilt {
                block_type: restored,
                health: self.health,
            };
        }

        self.health = (self.health + amount).min(self.max_health);
        RepairOutcome::Repaired {
            health: self.health,
        }
    }

    /// Whether the block stops movement.
    pub fn blocks_movement(&self) -> bool {
        self.is_wall && !(self.is_door && self.is_open)
    }
}

#[derive(Debug, Clone)]
pub struct Floor {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub building_type: BlockType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.x, y - self.y);
        (dx * dx + dy * dy).sqrt() < self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HackProgress {
    pub progress: f32,
    pub start_time: u64,
    pub duration: u64,
}

#[derive(Debug, Clone)]
pub struct Building {
    pub id: String,
    pub footprint: Rect,
    pub rooms: Vec<Room>,
    pub zone: String,
    pub material: BlockType,
    pub tier: MaterialTier,
    pub owner_id: Option<PlayerId>,
    pub owner_name: Option<String>,
    pub capture_progress: BTreeMap<PlayerId, f32>,
    pub capture_zone: Circle,
    pub total_blocks: usize,
    pub destroyed_blocks: usize,
    pub integrity: f32,
    pub hack_progress: BTreeMap<PlayerId, HackProgress>,
    pub terminal: Circle,
    pub upgrade_level: u32,
    block_indices: Vec<usize>,
}

impl Building {
    pub fn new(
        id: String,
        footprint: Rect,
        rooms: Vec<Room>,
        zone: String,
        material: BlockType,
        tier: MaterialTier,
    ) -> Self {
        let (cx, cy) = footprint.center();
        let terminal = rooms
            .first()
            .map(|room| Circle {
                x: footprint.x + room.x as f32 + room.width as f32 / 2.0,
                y: footprint.y + room.y as f32 + room.height as f32 / 2.0,
                radius: 50.0,
            })
            .unwrap_or(Circle {
                x: cx,
                y: cy,
                radius: 50.0,
            });

        Self {
            id,
            footprint,
            rooms,
            zone,
            material,
            tier,
            owner_id: None,
            owner_name: None,
            capture_progress: BTreeMap::new(),
            capture_zone: Circle {
                x: cx,
                y: cy,
                radius: 80.0,
            },
            total_blocks: 0,
            destroyed_blocks: 0,
            integrity: 100.0,
            hack_progress: BTreeMap::new(),
            terminal,
            upgrade_level: 0,
            block_indices: Vec::new(),
        }
    }

    pub fn block_indices(&self) -> &[usize] {
        &self.block_indices
    }

    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner_id.as_deref() == Some(player_id)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub armor: f32,
    pub max_armor: f32,
    pub color: String,
    pub weapon: String,
    pub ability: Option<String>,
    pub scrap: u32,
    pub invulnerable: bool,
    pub invulnerable_until: u64,
    pub is_dead: bool,
}

impl Player {
    pub fn is_invulnerable(&self, now_ms: u64) -> bool {
        self.invulnerable && now_ms < self.invulnerable_until
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.health > 0.0
    }

    /// Armor absorbs first; the remainder comes off health, clamped at zero.
    pub fn absorb_damage(&mut self, damage: f32) {
        if self.armor >= damage {
            self.armor -= damage;
        } else {
            let rest = damage - self.armor;
            self.armor = 0.0;
            self.health = (self.health - rest).max(0.0);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub owner: PlayerId,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct CapturePoint {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub owner: Option<PlayerId>,
    pub capture_progress: BTreeMap<PlayerId, f32>,
    pub level: u8,
    pub guards: Vec<String>,
    pub ammo_supply: u32,
}

impl CapturePoint {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        Circle {
            x: self.x,
            y: self.y,
            radius: self.radius,
        }
        .contains(x, y)
    }
}

#[derive(Debug, Clone)]
pub struct Guard {
    pub id: String,
    pub capture_point_id: String,
    pub owner: PlayerId,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub weapon: String,
}

#[derive(Debug, Clone)]
pub struct AmmoCrate {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub ammo_amount: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub spawn_point_index: Option<usize>,
    pub respawn_time_ms: Option<u64>,
    pub amount: Option<u32>,
}

impl Pickup {
    pub fn new(id: String, kind: String, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            spawn_point_index: None,
            respawn_time_ms: None,
            amount: None,
        }
    }

    pub fn is_ability(&self) -> bool {
        self.kind.starts_with("ability_")
    }
}

/// Fixed weapon location; the pickup comes back here after being collected.
#[derive(Debug, Clone)]
pub struct WeaponSpawn {
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub respawn_time_ms: u64,
}

impl WeaponSpawn {
    pub fn pickup(&self, index: usize) -> Pickup {
        Pickup {
            id: format!("weapon_spawn_{index}"),
            kind: self.kind.clone(),
            x: self.x,
            y: self.y,
            spawn_point_index: Some(index),
            respawn_time_ms: Some(self.respawn_time_ms),
            amount: None,
        }
    }
}

/// The whole simulation state. Owned by the world task and passed by `&mut`.
pub struct WorldState {
    pub seed: Option<u64>,
    pub tuning: Tuning,
    pub rng: ChaCha8Rng,
    pub terrain: TerrainGrid,
    pub floors: Vec<Floor>,
    pub players: BTreeMap<PlayerId, Player>,
    pub bullets: Vec<Bullet>,
    pub capture_points: Vec<CapturePoint>,
    pub guards: Vec<Guard>,
    pub ammo_crates: Vec<AmmoCrate>,
    pub pickups: Vec<Pickup>,
    pub weapon_spawns: Vec<WeaponSpawn>,

    obstacles: Vec<Obstacle>,
    obstacle_index: HashMap<String, usize>,
    buildings: Vec<Building>,
    building_index: HashMap<String, usize>,
    next_id: u64,
}

impl WorldState {
    pub fn new(terrain: TerrainGrid, rng: ChaCha8Rng, tuning: Tuning, seed: Option<u64>) -> Self {
        Self {
            seed,
            tuning,
            rng,
            terrain,
            floors: Vec::new(),
            players: BTreeMap::new(),
            bullets: Vec::new(),
            capture_points: Vec::new(),
            guards: Vec::new(),
            ammo_crates: Vec::new(),
            pickups: Vec::new(),
            weapon_spawns: Vec::new(),
            obstacles: Vec::new(),
            obstacle_index: HashMap::new(),
            buildings: Vec::new(),
            building_index: HashMap::new(),
            next_id: 0,
        }
    }

    /// Monotonic server-side ids for entities created during play.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }

    // Obstacles

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn push_obstacle(&mut self, obstacle: Obstacle) -> usize {
        let index = self.obstacles.len();
        self.obstacle_index.insert(obstacle.id.clone(), index);
        if let Some(building) = obstacle
            .building_id
            .as_ref()
            .and_then(|id| self.building_index.get(id))
            .and_then(|&b| self.buildings.get_mut(b))
        {
            building.block_indices.push(index);
            building.total_blocks = building.block_indices.len();
        }
        self.obstacles.push(obstacle);
        index
    }

    pub fn obstacle_index(&self, id: &str) -> Option<usize> {
        self.obstacle_index.get(id).copied()
    }

    pub fn obstacle(&self, id: &str) -> Option<&Obstacle> {
        self.obstacle_index(id).map(|i| &self.obstacles[i])
    }

    pub fn obstacle_mut(&mut self, id: &str) -> Option<&mut Obstacle> {
        self.obstacle_index(id).map(move |i| &mut self.obstacles[i])
    }

    pub fn obstacle_at_mut(&mut self, index: usize) -> Option<&mut Obstacle> {
        self.obstacles.get_mut(index)
    }

    // Buildings

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn buildings_mut(&mut self) -> &mut [Building] {
        &mut self.buildings
    }

    pub fn push_building(&mut self, building: Building) -> usize {
        let index = self.buildings.len();
        self.building_index.insert(building.id.clone(), index);
        self.buildings.push(building);
        index
    }

    /// Terrain and buildings borrowed together so roads can be carved in place.
    pub fn terrain_and_buildings(&mut self) -> (&mut TerrainGrid, &[Building]) {
        (&mut self.terrain, &self.buildings)
    }

    pub fn building_index(&self, id: &str) -> Option<usize> {
        self.building_index.get(id).copied()
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.building_index(id).map(|i| &self.buildings[i])
    }

    pub fn building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.building_index(id).map(move |i| &mut self.buildings[i])
    }

    /// Recomputes destroyed count and integrity (surviving share of block health).
    pub fn refresh_integrity(&mut self, building_id: &str) -> Option<f32> {
        let index = self.building_index(building_id)?;
        let building = &mut self.buildings[index];

        let mut health = 0.0f32;
        let mut max_health = 0.0f32;
        let mut destroyed = 0usize;
        for &block in &building.block_indices {
            let obstacle = &self.obstacles[block];
            max_health += obstacle.max_health;
            if obstacle.is_destroyed {
                destroyed += 1;
            } else {
                health += obstacle.health;
            }
        }

        building.destroyed_blocks = destroyed;
        building.integrity = if max_health > 0.0 {
            100.0 * health / max_health
        } else {
            100.0
        };
        Some(building.integrity)
    }

    /// Block indices of a building, cloned so callers can mutate the obstacle arena.
    pub fn building_blocks(&self, building_id: &str) -> Vec<usize> {
        self.building(building_id)
            .map(|b| b.block_indices.clone())
            .unwrap_or_default()
    }

    // Spawning

    /// True when no movement-blocking block lies within `margin` of the point.
    pub fn is_position_clear(&self, x: f32, y: f32, margin: f32) -> bool {
        !self
            .obstacles
            .iter()
            .filter(|o| o.blocks_movement())
            .any(|o| o.rect().inflate(margin).contains_point(x, y))
    }

    /// Rejection-samples a clear point; falls back to an unchecked sample.
    pub fn find_spawn_point(&mut self) -> (f32, f32) {
        let (min, max) = (self.tuning.player.spawn_min, self.tuning.player.spawn_max);
        let margin = self.tuning.player.spawn_margin;
        for _ in 0..self.tuning.player.spawn_attempts {
            let x = self.rng.gen_range(min..max);
            let y = self.rng.gen_range(min..max);
            if self.is_position_clear(x, y, margin) {
                return (x, y);
            }
        }
        (self.rng.gen_range(min..max), self.rng.gen_range(min..max))
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_alive())
    }
}
