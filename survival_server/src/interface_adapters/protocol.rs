// Wire protocol DTOs and conversions for survival server messages.
// Every frame is a flat JSON object tagged by `type`, fields in camelCase.

use crate::domain::bsp::Room;
use crate::domain::events::CaptureMethod;
use crate::domain::state::{
    AmmoCrate, BlockType, Building, CapturePoint, Circle, Floor, Guard, HackProgress,
    MaterialTier, Obstacle, Pickup, Player,
};
use crate::domain::terrain::TerrainTile;
use crate::domain::WorldEvent;
use crate::use_cases::{Command, WorldStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Register {
        persistent_id: Option<String>,
        name: Option<String>,
        color: Option<String>,
    },
    Move {
        x: f32,
        y: f32,
        #[serde(default)]
        angle: f32,
    },
    Shoot {
        bullet_id: Option<BulletId>,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    },
    BulletHit {
        target_id: String,
        damage: Option<f32>,
    },
    ObstacleHit {
        obstacle_id: String,
        damage: Option<f32>,
    },
    HammerHit {
        obstacle_id: String,
        damage: Option<f32>,
    },
    RepairBlock {
        obstacle_id: String,
    },
    ToggleDoor {
        door_id: String,
    },
    StartHack {
        building_id: String,
    },
    TerminalUpgrade {
        building_id: String,
    },
    CollectPickup {
        pickup_id: String,
    },
    CollectAmmoCrate {
        crate_id: String,
    },
    DropAbility {
        x: Option<f32>,
        y: Option<f32>,
        // Older clients send the whole pickup; only its position is used.
        pickup: Option<DroppedPickupDto>,
    },
    UpgradeBase {
        capture_point_id: String,
    },
    SupplyGuard {
        guard_id: String,
    },
    UpdateName {
        name: String,
    },
    Ping,
}

/// Clients send bullet ids as strings or as timestamps.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BulletId {
    Text(String),
    Number(f64),
}

impl BulletId {
    fn into_string(self) -> String {
        match self {
            BulletId::Text(text) => text,
            BulletId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DroppedPickupDto {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    // A numeric field was NaN, infinite, or out of range.
    InvalidNumber(&'static str),
    MissingPosition,
}

fn finite(field: &'static str, value: f32) -> Result<f32, ProtocolError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProtocolError::InvalidNumber(field))
    }
}

fn damage(value: Option<f32>) -> Result<Option<f32>, ProtocolError> {
    match value {
        Some(d) if !d.is_finite() || d < 0.0 => Err(ProtocolError::InvalidNumber("damage")),
        other => Ok(other),
    }
}

impl TryFrom<ClientMessage> for Command {
    type Error = ProtocolError;

    fn try_from(msg: ClientMessage) -> Result<Self, Self::Error> {
        Ok(match msg {
            ClientMessage::Register {
                persistent_id,
                name,
                color,
            } => Command::Register {
                persistent_id,
                name,
                color,
            },
            ClientMessage::Move { x, y, angle } => Command::Move {
                x: finite("x", x)?,
                y: finite("y", y)?,
                angle: finite("angle", angle)?,
            },
            ClientMessage::Shoot {
                bullet_id,
                x,
                y,
                vx,
                vy,
            } => Command::Shoot {
                bullet_id: bullet_id.map(BulletId::into_string),
                x: finite("x", x)?,
                y: finite("y", y)?,
                vx: finite("vx", vx)?,
                vy: finite("vy", vy)?,
            },
            ClientMessage::BulletHit {
                target_id,
                damage: d,
            } => Command::BulletHit {
                target_id,
                damage: damage(d)?,
            },
            ClientMessage::ObstacleHit {
                obstacle_id,
                damage: d,
            } => Command::ObstacleHit {
                obstacle_id,
                damage: damage(d)?,
            },
            ClientMessage::HammerHit {
                obstacle_id,
                damage: d,
            } => Command::HammerHit {
                obstacle_id,
                damage: damage(d)?,
            },
            ClientMessage::RepairBlock { obstacle_id } => Command::RepairBlock { obstacle_id },
            ClientMessage::ToggleDoor { door_id } => Command::ToggleDoor { door_id },
            ClientMessage::StartHack { building_id } => Command::StartHack { building_id },
            ClientMessage::TerminalUpgrade { building_id } => {
                Command::TerminalUpgrade { building_id }
            }
            ClientMessage::CollectPickup { pickup_id } => Command::CollectPickup { pickup_id },
            ClientMessage::CollectAmmoCrate { crate_id } => Command::CollectAmmoCrate { crate_id },
            ClientMessage::DropAbility { x, y, pickup } => {
                let (x, y) = match (x, y, pickup) {
                    (Some(x), Some(y), _) => (x, y),
                    (_, _, Some(p)) => (p.x, p.y),
                    _ => return Err(ProtocolError::MissingPosition),
                };
                Command::DropAbility {
                    x: finite("x", x)?,
                    y: finite("y", y)?,
                }
            }
            ClientMessage::UpgradeBase { capture_point_id } => {
                Command::UpgradeBase { capture_point_id }
            }
            ClientMessage::SupplyGuard { guard_id } => Command::SupplyGuard { guard_id },
            ClientMessage::UpdateName { name } => Command::UpdateName { name },
            ClientMessage::Ping => Command::Ping,
        })
    }
}

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Init {
        player_id: String,
        player: PlayerDto,
        players: Vec<PlayerDto>,
    },
    PlayerJoined {
        player: PlayerDto,
    },
    PlayerLeft {
        player_id: String,
    },
    PlayerMoved {
        player_id: String,
        x: f32,
        y: f32,
        angle: f32,
    },
    PlayerShot {
        bullet_id: String,
        player_id: String,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    },
    PlayerArmorUpdate {
        player_id: String,
        armor: f32,
    },
    PlayerDamaged {
        player_id: String,
        health: f32,
        by_player: String,
    },
    PlayerDied {
        player_id: String,
        killed_by: String,
    },
    PlayerRespawned {
        player_id: String,
        x: f32,
        y: f32,
        health: f32,
        invulnerable: bool,
    },
    PlayerScrapUpdate {
        player_id: String,
        scrap: u32,
    },
    PlayerNameChanged {
        player_id: String,
        name: String,
    },
    ObstacleDamaged {
        obstacle_id: String,
        health: f32,
    },
    ObstacleDestroyed {
        obstacle_id: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        is_debris: bool,
        obstacle: ObstacleDto,
    },
    ObstacleRebuilt {
        obstacle_id: String,
        block_type: &'static str,
        health: f32,
    },
    DoorToggled {
        door_id: String,
        is_open: bool,
    },
    ObstaclesUpdate {
        obstacles: Vec<ObstacleDto>,
    },
    FloorsUpdate {
        floors: Vec<FloorDto>,
    },
    TerrainUpdate {
        terrain: Vec<TerrainTileDto>,
    },
    BuildingsUpdate {
        buildings: Vec<BuildingDto>,
    },
    CapturePointsUpdate {
        capture_points: Vec<CapturePointDto>,
    },
    PickupsUpdate {
        pickups: Vec<PickupDto>,
    },
    AmmoCratesUpdate {
        ammo_crates: Vec<AmmoCrateDto>,
    },
    GuardsUpdate {
        guards: Vec<GuardDto>,
    },
    PickupCollected {
        pickup_id: String,
        player_id: String,
        pickup_type: String,
    },
    AmmoCrateCollected {
        crate_id: String,
        player_id: String,
    },
    CaptureProgress {
        capture_point_id: String,
        player_id: String,
        progress: f32,
    },
    BaseCaptured {
        capture_point_id: String,
        owner: String,
    },
    BaseUpgraded {
        capture_point_id: String,
        level: u8,
        owner: String,
    },
    GuardSupplied {
        guard_id: String,
        ammo: u32,
    },
    BuildingCaptureProgress {
        building_id: String,
        player_id: String,
        progress: f32,
        owner_id: Option<String>,
    },
    BuildingCaptured {
        building_id: String,
        owner_id: String,
        owner_name: String,
        method: &'static str,
    },
    BuildingNeutralized {
        building_id: String,
        contester_id: String,
    },
    BuildingLost {
        building_id: String,
        reason: &'static str,
    },
    BuildingUpgraded {
        building_id: String,
        level: u32,
        max_health: f32,
    },
    BuildingIntegrity {
        building_id: String,
        integrity: f32,
        destroyed_blocks: usize,
        total_blocks: usize,
    },
    HackStarted {
        building_id: String,
        player_id: String,
        duration: u64,
    },
    HackProgress {
        building_id: String,
        player_id: String,
        progress: f32,
    },
    TerminalMessage {
        building_id: String,
        success: bool,
        message: String,
    },
    Pong,
}

fn all<T, D: for<'a> From<&'a T>>(items: &[T]) -> Vec<D> {
    items.iter().map(D::from).collect()
}

impl From<WorldEvent> for ServerMessage {
    fn from(event: WorldEvent) -> Self {
        match event {
            WorldEvent::Init {
                player_id,
                player,
                players,
            } => ServerMessage::Init {
                player_id,
                player: PlayerDto::from(&player),
                players: all(&players),
            },
            WorldEvent::PlayerJoined { player } => ServerMessage::PlayerJoined {
                player: PlayerDto::from(&player),
            },
            WorldEvent::PlayerLeft { player_id } => ServerMessage::PlayerLeft { player_id },
            WorldEvent::PlayerMoved {
                player_id,
                x,
                y,
                angle,
            } => ServerMessage::PlayerMoved {
                player_id,
                x,
                y,
                angle,
            },
            WorldEvent::PlayerShot {
                bullet_id,
                player_id,
                x,
                y,
                vx,
                vy,
            } => ServerMessage::PlayerShot {
                bullet_id,
                player_id,
                x,
                y,
                vx,
                vy,
            },
            WorldEvent::PlayerArmorUpdate { player_id, armor } => {
                ServerMessage::PlayerArmorUpdate { player_id, armor }
            }
            WorldEvent::PlayerDamaged {
                player_id,
                health,
                by_player,
            } => ServerMessage::PlayerDamaged {
                player_id,
                health,
                by_player,
            },
            WorldEvent::PlayerDied {
                player_id,
                killed_by,
            } => ServerMessage::PlayerDied {
                player_id,
                killed_by,
            },
            WorldEvent::PlayerRespawned {
                player_id,
                x,
                y,
                health,
                invulnerable,
            } => ServerMessage::PlayerRespawned {
                player_id,
                x,
                y,
                health,
                invulnerable,
            },
            WorldEvent::PlayerScrapUpdate { player_id, scrap } => {
                ServerMessage::PlayerScrapUpdate { player_id, scrap }
            }
            WorldEvent::PlayerNameChanged { player_id, name } => {
                ServerMessage::PlayerNameChanged { player_id, name }
            }
            WorldEvent::ObstacleDamaged {
                obstacle_id,
                health,
            } => ServerMessage::ObstacleDamaged {
                obstacle_id,
                health,
            },
            WorldEvent::ObstacleDestroyed { obstacle } => ServerMessage::ObstacleDestroyed {
                obstacle_id: obstacle.id.clone(),
                x: obstacle.x,
                y: obstacle.y,
                width: obstacle.width,
                height: obstacle.height,
                is_debris: obstacle.is_destroyed,
                obstacle: ObstacleDto::from(&obstacle),
            },
            WorldEvent::ObstacleRebuilt {
                obstacle_id,
                block_type,
                health,
            } => ServerMessage::ObstacleRebuilt {
                obstacle_id,
                block_type: block_type.as_str(),
                health,
            },
            WorldEvent::DoorToggled { door_id, is_open } => {
                ServerMessage::DoorToggled { door_id, is_open }
            }
            WorldEvent::ObstaclesUpdate(obstacles) => ServerMessage::ObstaclesUpdate {
                obstacles: all(&obstacles),
            },
            WorldEvent::FloorsUpdate(floors) => ServerMessage::FloorsUpdate {
                floors: all(&floors),
            },
            WorldEvent::TerrainUpdate(tiles) => ServerMessage::TerrainUpdate {
                terrain: all(&tiles),
            },
            WorldEvent::BuildingsUpdate(buildings) => ServerMessage::BuildingsUpdate {
                buildings: all(&buildings),
            },
            WorldEvent::CapturePointsUpdate(points) => ServerMessage::CapturePointsUpdate {
                capture_points: all(&points),
            },
            WorldEvent::PickupsUpdate(pickups) => ServerMessage::PickupsUpdate {
                pickups: all(&pickups),
            },
            WorldEvent::AmmoCratesUpdate(crates) => ServerMessage::AmmoCratesUpdate {
                ammo_crates: all(&crates),
            },
            WorldEvent::GuardsUpdate(guards) => ServerMessage::GuardsUpdate {
                guards: all(&guards),
            },
            WorldEvent::PickupCollected {
                pickup_id,
                player_id,
                pickup_type,
            } => ServerMessage::PickupCollected {
                pickup_id,
                player_id,
                pickup_type,
            },
            WorldEvent::AmmoCrateCollected {
                crate_id,
                player_id,
            } => ServerMessage::AmmoCrateCollected {
                crate_id,
                player_id,
            },
            WorldEvent::CaptureProgress {
                capture_point_id,
                player_id,
                progress,
            } => ServerMessage::CaptureProgress {
                capture_point_id,
                player_id,
                progress,
            },
            WorldEvent::BaseCaptured {
                capture_point_id,
                owner,
            } => ServerMessage::BaseCaptured {
                capture_point_id,
                owner,
            },
            WorldEvent::BaseUpgraded {
                capture_point_id,
                level,
                owner,
            } => ServerMessage::BaseUpgraded {
                capture_point_id,
                level,
                owner,
            },
            WorldEvent::GuardSupplied { guard_id, ammo } => {
                ServerMessage::GuardSupplied { guard_id, ammo }
            }
            WorldEvent::BuildingCaptureProgress {
                building_id,
                player_id,
                progress,
                owner_id,
            } => ServerMessage::BuildingCaptureProgress {
                building_id,
                player_id,
                progress,
                owner_id,
            },
            WorldEvent::BuildingCaptured {
                building_id,
                owner_id,
                owner_name,
                method,
            } => ServerMessage::BuildingCaptured {
                building_id,
                owner_id,
                owner_name,
                method: match method {
                    CaptureMethod::Zone => "zone",
                    CaptureMethod::Hack => "hack",
                },
            },
            WorldEvent::BuildingNeutralized {
                building_id,
                contester_id,
            } => ServerMessage::BuildingNeutralized {
                building_id,
                contester_id,
            },
            WorldEvent::BuildingLost {
                building_id,
                reason,
            } => ServerMessage::BuildingLost {
                building_id,
                reason,
            },
            WorldEvent::BuildingUpgraded {
                building_id,
                level,
                max_health,
            } => ServerMessage::BuildingUpgraded {
                building_id,
                level,
                max_health,
            },
            WorldEvent::BuildingIntegrity {
                building_id,
                integrity,
                destroyed_blocks,
                total_blocks,
            } => ServerMessage::BuildingIntegrity {
                building_id,
                integrity,
                destroyed_blocks,
                total_blocks,
            },
            WorldEvent::HackStarted {
                building_id,
                player_id,
                duration,
            } => ServerMessage::HackStarted {
                building_id,
                player_id,
                duration,
            },
            WorldEvent::HackProgress {
                building_id,
                player_id,
                progress,
            } => ServerMessage::HackProgress {
                building_id,
                player_id,
                progress,
            },
            WorldEvent::TerminalMessage {
                building_id,
                success,
                message,
            } => ServerMessage::TerminalMessage {
                building_id,
                success,
                message,
            },
            WorldEvent::Pong => ServerMessage::Pong,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    pub scrap: u32,
    pub invulnerable: bool,
    pub invulnerable_until: u64,
    pub is_dead: bool,
}

impl From<&Player> for PlayerDto {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            angle: p.angle,
            health: p.health,
            max_health: p.max_health,
            armor: p.armor,
            max_armor: p.max_armor,
            color: p.color.clone(),
            weapon: p.weapon.clone(),
            ability: p.ability.clone(),
            scrap: p.scrap,
            invulnerable: p.invulnerable,
            invulnerable_until: p.invulnerable_until,
            is_dead: p.is_dead,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: f32,
    pub max_health: f32,
    pub block_type: &'static str,
    pub is_wall: bool,
    pub is_door: bool,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    pub is_destroyed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_type: Option<&'static str>,
}

impl From<&Obstacle> for ObstacleDto {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id.clone(),
            x: o.x,
            y: o.y,
            width: o.width,
            height: o.height,
            health: o.health,
            max_health: o.max_health,
            block_type: o.block_type.as_str(),
            is_wall: o.is_wall,
            is_door: o.is_door,
            is_open: o.is_open,
            building_id: o.building_id.clone(),
            is_destroyed: o.is_destroyed,
            original_type: o.original_type.map(BlockType::as_str),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub building_type: &'static str,
}

impl From<&Floor> for FloorDto {
    fn from(f: &Floor) -> Self {
        Self {
            id: f.id.clone(),
            x: f.x,
            y: f.y,
            size: f.size,
            building_type: f.building_type.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainTileDto {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    #[serde(rename = "type")]
    pub biome: &'static str,
    pub speed_modifier: f32,
}

impl From<&TerrainTile> for TerrainTileDto {
    fn from(t: &TerrainTile) -> Self {
        Self {
            x: t.x,
            y: t.y,
            size: t.size,
            biome: t.biome.as_str(),
            speed_modifier: t.speed_modifier,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CircleDto {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<&Circle> for CircleDto {
    fn from(c: &Circle) -> Self {
        Self {
            x: c.x,
            y: c.y,
            radius: c.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoomDto {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<&Room> for RoomDto {
    fn from(r: &Room) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HackProgressDto {
    pub progress: f32,
    pub start_time: u64,
    pub duration: u64,
}

impl From<&HackProgress> for HackProgressDto {
    fn from(h: &HackProgress) -> Self {
        Self {
            progress: h.progress,
            start_time: h.start_time,
            duration: h.duration,
        }
    }
}

fn tier_name(tier: MaterialTier) -> &'static str {
    match tier {
        MaterialTier::Low => "low",
        MaterialTier::Elevated => "elevated",
        MaterialTier::High => "high",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rooms: Vec<RoomDto>,
    pub zone: String,
    pub material: &'static str,
    pub tier: &'static str,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    pub capture_progress: BTreeMap<String, f32>,
    pub capture_zone: CircleDto,
    pub total_blocks: usize,
    pub destroyed_blocks: usize,
    pub integrity: f32,
    pub hack_progress: BTreeMap<String, HackProgressDto>,
    pub terminal: CircleDto,
    pub upgrade_level: u32,
}

impl From<&Building> for BuildingDto {
    fn from(b: &Building) -> Self {
        Self {
            id: b.id.clone(),
            x: b.footprint.x,
            y: b.footprint.y,
            width: b.footprint.width,
            height: b.footprint.height,
            rooms: all(&b.rooms),
            zone: b.zone.clone(),
            material: b.material.as_str(),
            tier: tier_name(b.tier),
            owner_id: b.owner_id.clone(),
            owner_name: b.owner_name.clone(),
            capture_progress: b.capture_progress.clone(),
            capture_zone: CircleDto::from(&b.capture_zone),
            total_blocks: b.total_blocks,
            destroyed_blocks: b.destroyed_blocks,
            integrity: b.integrity,
            hack_progress: b
                .hack_progress
                .iter()
                .map(|(id, h)| (id.clone(), HackProgressDto::from(h)))
                .collect(),
            terminal: CircleDto::from(&b.terminal),
            upgrade_level: b.upgrade_level,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePointDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub owner: Option<String>,
    pub capture_progress: BTreeMap<String, f32>,
    pub level: u8,
    pub guards: Vec<String>,
    pub ammo_supply: u32,
}

impl From<&CapturePoint> for CapturePointDto {
    fn from(cp: &CapturePoint) -> Self {
        Self {
            id: cp.id.clone(),
            x: cp.x,
            y: cp.y,
            radius: cp.radius,
            owner: cp.owner.clone(),
            capture_progress: cp.capture_progress.clone(),
            level: cp.level,
            guards: cp.guards.clone(),
            ammo_supply: cp.ammo_supply,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardDto {
    pub id: String,
    pub capture_point_id: String,
    pub owner: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub weapon: String,
}

impl From<&Guard> for GuardDto {
    fn from(g: &Guard) -> Self {
        Self {
            id: g.id.clone(),
            capture_point_id: g.capture_point_id.clone(),
            owner: g.owner.clone(),
            x: g.x,
            y: g.y,
            angle: g.angle,
            health: g.health,
            max_health: g.max_health,
            ammo: g.ammo,
            max_ammo: g.max_ammo,
            weapon: g.weapon.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoCrateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub ammo_amount: u32,
}

impl From<&AmmoCrate> for AmmoCrateDto {
    fn from(c: &AmmoCrate) -> Self {
        Self {
            id: c.id.clone(),
            x: c.x,
            y: c.y,
            ammo_amount: c.ammo_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_point_index: Option<usize>,
    #[serde(rename = "respawnTime", skip_serializing_if = "Option::is_none")]
    pub respawn_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

impl From<&Pickup> for PickupDto {
    fn from(p: &Pickup) -> Self {
        Self {
            id: p.id.clone(),
            kind: p.kind.clone(),
            x: p.x,
            y: p.y,
            spawn_point_index: p.spawn_point_index,
            respawn_time_ms: p.respawn_time_ms,
            amount: p.amount,
        }
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub tick: u64,
    pub players: usize,
    pub buildings: usize,
    pub owned_buildings: usize,
    pub obstacles: usize,
    pub seed: Option<u64>,
}

impl From<WorldStats> for StatusDto {
    fn from(stats: WorldStats) -> Self {
        Self {
            tick: stats.tick,
            players: stats.players,
            buildings: stats.buildings,
            owned_buildings: stats.owned_buildings,
            obstacles: stats.obstacles,
            seed: stats.seed,
        }
    }
}
