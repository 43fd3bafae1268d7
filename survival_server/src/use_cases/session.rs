// Connection sessions: registration gate and per-message dispatch.

use super::types::{Command, ConnId};
use crate::domain::events::{Emit, WorldEvent};
use crate::domain::scheduler::{Scheduler, Task};
use crate::domain::state::PlayerId;
use crate::domain::systems::{blocks, buildings, combat, economy, players};
use crate::domain::{ActionError, WorldState};
use std::collections::HashMap;
use tracing::{debug, info};

/// Delay before a new connection receives the full map.
pub const SNAPSHOT_DELAY_MS: u64 = 100;

/// Which player each registered connection controls.
#[derive(Debug, Default)]
pub struct Sessions {
    players: HashMap<ConnId, PlayerId>,
    conns: HashMap<PlayerId, ConnId>,
}

impl Sessions {
    pub fn player_of(&self, conn_id: ConnId) -> Option<&PlayerId> {
        self.players.get(&conn_id)
    }

    pub fn conn_of(&self, player_id: &str) -> Option<ConnId> {
        self.conns.get(player_id).copied()
    }

    pub fn is_registered(&self, conn_id: ConnId) -> bool {
        self.players.contains_key(&conn_id)
    }

    /// Binds a player to a connection. A previous connection for the same
    /// player loses its binding.
    fn bind(&mut self, conn_id: ConnId, player_id: PlayerId) -> Option<ConnId> {
        let replaced = self.conns.insert(player_id.clone(), conn_id);
        if let Some(old) = replaced.filter(|old| *old != conn_id) {
            self.players.remove(&old);
        }
        self.players.insert(conn_id, player_id);
        replaced.filter(|old| *old != conn_id)
    }

    /// Returns the player the connection controlled, if it was still bound.
    pub fn unbind(&mut self, conn_id: ConnId) -> Option<PlayerId> {
        let player_id = self.players.remove(&conn_id)?;
        if self.conns.get(&player_id) == Some(&conn_id) {
            self.conns.remove(&player_id);
        }
        Some(player_id)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Register a connection. Returns `None` when the connection already registered.
pub fn register(
    world: &mut WorldState,
    sessions: &mut Sessions,
    scheduler: &mut Scheduler,
    conn_id: ConnId,
    persistent_id: Option<String>,
    name: Option<String>,
    color: Option<String>,
    now_ms: u64,
) -> Option<Vec<Emit>> {
    if sessions.is_registered(conn_id) {
        debug!(conn_id, "duplicate register ignored");
        return None;
    }

    let player_id = persistent_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(generate_player_id);
    if let Some(old) = sessions.bind(conn_id, player_id.clone()) {
        info!(%player_id, old_conn = old, "player id reclaimed by a new connection");
    }

    let player = players::spawn_player(world, player_id.clone(), name, color, now_ms);
    info!(conn_id, %player_id, name = %player.name, "player registered");

    scheduler.schedule(now_ms + SNAPSHOT_DELAY_MS, Task::SendWorldSnapshot { conn_id });

    Some(vec![
        Emit::player(
            &player_id,
            WorldEvent::Init {
                player_id: player_id.clone(),
                player: player.clone(),
                players: world.players.values().cloned().collect(),
            },
        ),
        Emit::others(&player_id, WorldEvent::PlayerJoined { player }),
    ])
}

fn generate_player_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("player_{}", &raw[..9])
}

/// Runs one gameplay command for a registered player.
pub fn handle_command(
    world: &mut WorldState,
    scheduler: &mut Scheduler,
    player_id: &str,
    command: Command,
    now_ms: u64,
) -> Result<Vec<Emit>, ActionError> {
    if !world.players.contains_key(player_id) {
        return Err(ActionError::PlayerNotFound);
    }

    match command {
        // Handled by `register`; a second one is a no-op.
        Command::Register { .. } => Ok(Vec::new()),
        Command::Move { x, y, angle } => players::move_player(world, player_id, x, y, angle),
        Command::Shoot {
            bullet_id,
            x,
            y,
            vx,
            vy,
        } => combat::shoot(
            world,
            player_id,
            combat::ShotInput {
                bullet_id,
                x,
                y,
                vx,
                vy,
            },
            now_ms,
        ),
        Command::BulletHit { target_id, damage } => {
            let hit = combat::bullet_hit(world, player_id, &target_id, damage, now_ms)?;
            if hit.killed {
                let delay = world.tuning.player.respawn_delay_ms;
                scheduler.schedule(now_ms + delay, Task::Respawn { player_id: target_id });
            }
            Ok(hit.emits)
        }
        Command::ObstacleHit {
            obstacle_id,
            damage,
        } => {
            let damage = damage.unwrap_or(world.tuning.economy.obstacle_hit_damage);
            blocks::hit_obstacle(world, player_id, &obstacle_id, damage)
        }
        Command::HammerHit {
            obstacle_id,
            damage,
        } => {
            let damage = damage.unwrap_or(world.tuning.economy.hammer_hit_damage);
            blocks::hit_obstacle(world, player_id, &obstacle_id, damage)
        }
        Command::RepairBlock { obstacle_id } => blocks::repair_block(world, player_id, &obstacle_id),
        Command::ToggleDoor { door_id } => blocks::toggle_door(world, &door_id),
        Command::StartHack { building_id } => {
            buildings::start_hack(world, player_id, &building_id, now_ms)
        }
        Command::TerminalUpgrade { building_id } => {
            match economy::terminal_upgrade(world, player_id, &building_id) {
                Ok(emits) => Ok(emits),
                Err(err) => terminal_refusal(player_id, &building_id, err),
            }
        }
        Command::CollectPickup { pickup_id } => {
            let result = economy::collect_pickup(world, player_id, &pickup_id)?;
            if let Some((spawn_index, delay)) = result.respawn {
                scheduler.schedule(now_ms + delay, Task::RespawnWeapon { spawn_index });
            }
            Ok(result.emits)
        }
        Command::CollectAmmoCrate { crate_id } => {
            economy::collect_ammo_crate(world, player_id, &crate_id)
        }
        Command::DropAbility { x, y } => economy::drop_ability(world, player_id, x, y),
        Command::UpgradeBase { capture_point_id } => {
            economy::upgrade_base(world, player_id, &capture_point_id)
        }
        Command::SupplyGuard { guard_id } => economy::supply_guard(world, player_id, &guard_id),
        Command::UpdateName { name } => players::rename(world, player_id, &name),
        Command::Ping => Ok(vec![Emit::player(player_id, WorldEvent::Pong)]),
    }
}

/// Terminal failures the player can act on are answered; the rest stay silent.
fn terminal_refusal(
    player_id: &str,
    building_id: &str,
    err: ActionError,
) -> Result<Vec<Emit>, ActionError> {
    let message = match &err {
        ActionError::NotOwner => "You must own this building to use its terminal".to_string(),
        ActionError::InsufficientScrap { needed, available } => {
            format!("Not enough scrap ({available}/{needed})")
        }
        _ => return Err(err),
    };
    Ok(vec![Emit::player(
        player_id,
        WorldEvent::TerminalMessage {
            building_id: building_id.to_string(),
            success: false,
            message,
        },
    )])
}

/// Drops the connection's player from the world.
pub fn disconnect(world: &mut WorldState, sessions: &mut Sessions, conn_id: ConnId) -> Vec<Emit> {
    let Some(player_id) = sessions.unbind(conn_id) else {
        return Vec::new();
    };
    info!(conn_id, %player_id, "player left");
    players::remove_player(world, &player_id)
}
