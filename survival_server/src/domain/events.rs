// Things that happened in the world, addressed to an audience of players.

use crate::domain::state::{
    AmmoCrate, BlockType, Building, CapturePoint, Floor, Guard, Obstacle, Pickup, Player,
    PlayerId,
};
use crate::domain::terrain::TerrainTile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    All,
    Player(PlayerId),
    Others(PlayerId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMethod {
    Zone,
    Hack,
}

#[derive(Debug, Clone)]
pub enum WorldEvent {
    Init {
        player_id: PlayerId,
        player: Player,
        players: Vec<Player>,
    },
    PlayerJoined {
        player: Player,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    PlayerMoved {
        player_id: PlayerId,
        x: f32,
        y: f32,
        angle: f32,
    },
    PlayerShot {
        bullet_id: String,
        player_id: PlayerId,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    },
    PlayerArmorUpdate {
        player_id: PlayerId,
        armor: f32,
    },
    PlayerDamaged {
        player_id: PlayerId,
        health: f32,
        by_player: PlayerId,
    },
    PlayerDied {
        player_id: PlayerId,
        killed_by: PlayerId,
    },
    PlayerRespawned {
        player_id: PlayerId,
        x: f32,
        y: f32,
        health: f32,
        invulnerable: bool,
    },
    PlayerScrapUpdate {
        player_id: PlayerId,
        scrap: u32,
    },
    PlayerNameChanged {
        player_id: PlayerId,
        name: String,
    },

    ObstacleDamaged {
        obstacle_id: String,
        health: f32,
    },
    ObstacleDestroyed {
        obstacle: Obstacle,
    },
    ObstacleRebuilt {
        obstacle_id: String,
        block_type: BlockType,
        health: f32,
    },
    DoorToggled {
        door_id: String,
        is_open: bool,
    },

    ObstaclesUpdate(Vec<Obstacle>),
    FloorsUpdate(Vec<Floor>),
    TerrainUpdate(Vec<TerrainTile>),
    BuildingsUpdate(Vec<Building>),
    CapturePointsUpdate(Vec<CapturePoint>),
    PickupsUpdate(Vec<Pickup>),
    AmmoCratesUpdate(Vec<AmmoCrate>),
    GuardsUpdate(Vec<Guard>),

    PickupCollected {
        pickup_id: String,
        player_id: PlayerId,
        pickup_type: String,
    },
    AmmoCrateCollected {
        crate_id: String,
        player_id: PlayerId,
    },

    CaptureProgress {
        capture_point_id: String,
        player_id: PlayerId,
        progress: f32,
    },
    BaseCaptured {
        capture_point_id: String,
        owner: PlayerId,
    },
    BaseUpgraded {
        capture_point_id: String,
        level: u8,
        owner: PlayerId,
    },
    GuardSupplied {
        guard_id: String,
        ammo: u32,
    },

    BuildingCaptureProgress {
        building_id: String,
        player_id: PlayerId,
        progress: f32,
        owner_id: Option<PlayerId>,
    },
    BuildingCaptured {
        building_id: String,
        owner_id: PlayerId,
        owner_name: String,
        method: CaptureMethod,
    },
    BuildingNeutralized {
        building_id: String,
        contester_id: PlayerId,
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
        player_id: PlayerId,
        duration: u64,
    },
    HackProgress {
        building_id: String,
        player_id: PlayerId,
        progress: f32,
    },
    TerminalMessage {
        building_id: String,
        success: bool,
        message: String,
    },

    Pong,
}

#[derive(Debug, Clone)]
pub struct Emit {
    pub to: Audience,
    pub event: WorldEvent,
}

impl Emit {
    pub fn all(event: WorldEvent) -> Self {
        Self {
            to: Audience::All,
            event,
        }
    }

    pub fn player(player_id: &str, event: WorldEvent) -> Self {
        Self {
            to: Audience::Player(player_id.to_string()),
            event,
        }
    }

    pub fn others(player_id: &str, event: WorldEvent) -> Self {
        Self {
            to: Audience::Others(player_id.to_string()),
            event,
        }
    }
}
