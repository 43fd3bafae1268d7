// Use-case level inputs/outputs for the world task.

use crate::domain::WorldEvent;

pub type ConnId = u64;

/// What a connection task hands to the world task.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Message { conn_id: ConnId, command: Command },
    Disconnect { conn_id: ConnId },
}

/// A validated client request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Register {
        persistent_id: Option<String>,
        name: Option<String>,
        color: Option<String>,
    },
    Move {
        x: f32,
        y: f32,
        angle: f32,
    },
    Shoot {
        bullet_id: Option<String>,
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
        x: f32,
        y: f32,
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

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register { .. } => "register",
            Command::Move { .. } => "move",
            Command::Shoot { .. } => "shoot",
            Command::BulletHit { .. } => "bulletHit",
            Command::ObstacleHit { .. } => "obstacleHit",
            Command::HammerHit { .. } => "hammerHit",
            Command::RepairBlock { .. } => "repairBlock",
            Command::ToggleDoor { .. } => "toggleDoor",
            Command::StartHack { .. } => "startHack",
            Command::TerminalUpgrade { .. } => "terminalUpgrade",
            Command::CollectPickup { .. } => "collectPickup",
            Command::CollectAmmoCrate { .. } => "collectAmmoCrate",
            Command::DropAbility { .. } => "dropAbility",
            Command::UpgradeBase { .. } => "upgradeBase",
            Command::SupplyGuard { .. } => "supplyGuard",
            Command::UpdateName { .. } => "updateName",
            Command::Ping => "ping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipients {
    All,
    AllExcept(ConnId),
    Only(ConnId),
}

#[derive(Debug, Clone)]
pub struct Outbound {
    pub recipients: Recipients,
    pub event: WorldEvent,
}

/// Coarse counters published for the status endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldStats {
    pub tick: u64,
    pub players: usize,
    pub buildings: usize,
    pub owned_buildings: usize,
    pub obstacles: usize,
    pub seed: Option<u64>,
}
