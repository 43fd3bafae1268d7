use crate::domain::errors::ActionError;
use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::{Player, WorldState};

/// Creates the avatar at a clear spawn point with a grace window, and inserts it.
pub fn spawn_player(
    world: &mut WorldState,
    id: String,
    name: Option<String>,
    color: Option<String>,
    now_ms: u64,
) -> Player {
    let (x, y) = world.find_spawn_point();
    let tuning = &world.tuning.player;
    let name = name
        .filter(|n| !n.trim().is_empty())
        .map(|n| clip_name(&n, tuning.max_name_len))
        .unwrap_or_else(|| format!("Player {}", world.players.len() + 1));

    let player = Player {
        id: id.clone(),
        name,
        x,
        y,
        angle: 0.0,
        health: tuning.max_health,
        max_health: tuning.max_health,
        armor: 0.0,
        max_armor: tuning.max_armor,
        color: color.unwrap_or_else(|| tuning.default_color.to_string()),
        weapon: tuning.default_weapon.to_string(),
        ability: None,
        scrap: 0,
        invulnerable: true,
        invulnerable_until: now_ms + tuning.invulnerability_ms,
        is_dead: false,
    };
    world.players.insert(id, player.clone());
    player
}

/// Positions are client-authoritative; only dead players are refused.
pub fn move_player(
    world: &mut WorldState,
    id: &str,
    x: f32,
    y: f32,
    angle: f32,
) -> Result<Vec<Emit>, ActionError> {
    let player = world.players.get_mut(id).ok_or(ActionError::PlayerNotFound)?;
    if player.is_dead {
        return Err(ActionError::PlayerDead);
    }
    player.x = x;
    player.y = y;
    player.angle = angle;
    Ok(vec![Emit::others(
        id,
        WorldEvent::PlayerMoved {
            player_id: id.to_string(),
            x,
            y,
            angle,
        },
    )])
}

pub fn rename(world: &mut WorldState, id: &str, name: &str) -> Result<Vec<Emit>, ActionError> {
    let max = world.tuning.player.max_name_len;
    let player = world.players.get_mut(id).ok_or(ActionError::PlayerNotFound)?;
    if name.trim().is_empty() {
        return Err(ActionError::BlankName);
    }
    player.name = clip_name(name, max);
    Ok(vec![Emit::all(WorldEvent::PlayerNameChanged {
        player_id: id.to_string(),
        name: player.name.clone(),
    })])
}

pub fn remove_player(world: &mut WorldState, id: &str) -> Vec<Emit> {
    if world.players.remove(id).is_none() {
        return Vec::new();
    }
    vec![Emit::all(WorldEvent::PlayerLeft {
        player_id: id.to_string(),
    })]
}

fn clip_name(name: &str, max: usize) -> String {
    name.trim().chars().take(max).collect()
}
