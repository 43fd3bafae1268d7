// Scrap spending and pickup effects.

use crate::domain::errors::ActionError;
use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::{Guard, Pickup, WorldState};
use std::f32::consts::PI;

const GUARD_RING: f32 = 80.0;
const MAX_BASE_LEVEL: u8 = 3;

pub struct PickupResult {
    pub emits: Vec<Emit>,
    /// Weapon spawn index and delay before it comes back.
    pub respawn: Option<(usize, u64)>,
}

pub fn collect_pickup(
    world: &mut WorldState,
    actor: &str,
    pickup_id: &str,
) -> Result<PickupResult, ActionError> {
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    let position = world
        .pickups
        .iter()
        .position(|p| p.id == pickup_id)
        .ok_or(ActionError::PickupNotFound)?;
    let pickup = world.pickups.remove(position);
    let economy = world.tuning.economy.clone();

    let mut emits = Vec::new();
    if let Some(player) = world.players.get_mut(actor) {
        match pickup.kind.as_str() {
            "health" => player.health = (player.health + economy.health_pickup).min(player.max_health),
            "armor" => player.armor = (player.armor + economy.armor_pickup).min(player.max_armor),
            "scrap" => {
                player.scrap += pickup.amount.unwrap_or(economy.scrap_pickup);
                emits.push(Emit::all(WorldEvent::PlayerScrapUpdate {
                    player_id: actor.to_string(),
                    scrap: player.scrap,
                }));
            }
            kind => {
                if let Some(weapon) = kind.strip_prefix("weapon_") {
                    player.weapon = weapon.to_string();
                } else if let Some(ability) = kind.strip_prefix("ability_") {
                    player.ability = Some(ability.to_string());
                }
            }
        }
    }

    emits.insert(
        0,
        Emit::all(WorldEvent::PickupCollected {
            pickup_id: pickup_id.to_string(),
            player_id: actor.to_string(),
            pickup_type: pickup.kind.clone(),
        }),
    );
    Ok(PickupResult {
        emits,
        respawn: pickup.spawn_point_index.zip(pickup.respawn_time_ms),
    })
}

pub fn collect_ammo_crate(
    world: &mut WorldState,
    actor: &str,
    crate_id: &str,
) -> Result<Vec<Emit>, ActionError> {
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    let position = world
        .ammo_crates
        .iter()
        .position(|c| c.id == crate_id)
        .ok_or(ActionError::CrateNotFound)?;
    world.ammo_crates.remove(position);

    let reward = world.tuning.economy.crate_scrap;
    let player = world.players.get_mut(actor).ok_or(ActionError::PlayerNotFound)?;
    player.scrap += reward;
    Ok(vec![
        Emit::all(WorldEvent::AmmoCrateCollected {
            crate_id: crate_id.to_string(),
            player_id: actor.to_string(),
        }),
        Emit::all(WorldEvent::PlayerScrapUpdate {
            player_id: actor.to_string(),
            scrap: player.scrap,
        }),
    ])
}

/// Puts the held ability back on the ground at the reported position.
pub fn drop_ability(
    world: &mut WorldState,
    actor: &str,
    x: f32,
    y: f32,
) -> Result<Vec<Emit>, ActionError> {
    let ability = world
        .players
        .get_mut(actor)
        .ok_or(ActionError::PlayerNotFound)?
        .ability
        .take()
        .ok_or(ActionError::NoAbility)?;
    let id = world.next_id("ability_drop");
    world
        .pickups
        .push(Pickup::new(id, format!("ability_{ability}"), x, y));
    Ok(vec![Emit::all(WorldEvent::PickupsUpdate(world.pickups.clone()))])
}

/// Buys the next level of a capture point the actor owns.
pub fn upgrade_base(
    world: &mut WorldState,
    actor: &str,
    capture_point_id: &str,
) -> Result<Vec<Emit>, ActionError> {
    let costs = world.tuning.economy.base_upgrade_costs;
    let available = world
        .players
        .get(actor)
        .ok_or(ActionError::PlayerNotFound)?
        .scrap;
    let cp = world
        .capture_points
        .iter_mut()
        .find(|cp| cp.id == capture_point_id)
        .ok_or(ActionError::CapturePointNotFound)?;
    if cp.owner.as_deref() != Some(actor) {
        return Err(ActionError::NotOwner);
    }
    if cp.level >= MAX_BASE_LEVEL {
        return Err(ActionError::MaxLevel);
    }
    let level = cp.level + 1;
    let cost = costs[level as usize];
    if available < cost {
        return Err(ActionError::InsufficientScrap {
            needed: cost,
            available,
        });
    }
    cp.level = level;

    let existing = cp.guards.len();
    let (weapon, ammo, slots) = match level {
        1 => ("pistol", 50, 2.0),
        2 => ("smg", 100, 4.0),
        // Level 3 is the turret tier; no extra guards.
        _ => ("", 0, 0.0),
    };
    let mut spawned = Vec::new();
    if slots > 0.0 {
        for i in existing..existing + 2 {
            let angle = 2.0 * PI / slots * i as f32;
            spawned.push(Guard {
                id: format!("guard_{}_{i}", cp.id),
                capture_point_id: cp.id.clone(),
                owner: actor.to_string(),
                x: cp.x + angle.cos() * GUARD_RING,
                y: cp.y + angle.sin() * GUARD_RING,
                angle: 0.0,
                health: 100.0,
                max_health: 100.0,
                ammo,
                max_ammo: ammo,
                weapon: weapon.to_string(),
            });
        }
    }
    cp.guards.extend(spawned.iter().map(|g| g.id.clone()));
    world.guards.extend(spawned);

    let player = world.players.get_mut(actor).ok_or(ActionError::PlayerNotFound)?;
    player.scrap -= cost;
    let scrap = player.scrap;

    Ok(vec![
        Emit::all(WorldEvent::BaseUpgraded {
            capture_point_id: capture_point_id.to_string(),
            level,
            owner: actor.to_string(),
        }),
        Emit::all(WorldEvent::GuardsUpdate(world.guards.clone())),
        Emit::all(WorldEvent::PlayerScrapUpdate {
            player_id: actor.to_string(),
            scrap,
        }),
    ])
}

pub fn supply_guard(
    world: &mut WorldState,
    actor: &str,
    guard_id: &str,
) -> Result<Vec<Emit>, ActionError> {
    let economy = world.tuning.economy.clone();
    let available = world
        .players
        .get(actor)
        .ok_or(ActionError::PlayerNotFound)?
        .scrap;
    let guard = world
        .guards
        .iter_mut()
        .find(|g| g.id == guard_id)
        .ok_or(ActionError::GuardNotFound)?;
    if guard.owner != actor {
        return Err(ActionError::NotOwner);
    }
    if available < economy.guard_supply_cost {
        return Err(ActionError::InsufficientScrap {
            needed: economy.guard_supply_cost,
            available,
        });
    }
    guard.ammo = (guard.ammo + economy.guard_supply_ammo).min(guard.max_ammo);
    let ammo = guard.ammo;

    let player = world.players.get_mut(actor).ok_or(ActionError::PlayerNotFound)?;
    player.scrap -= economy.guard_supply_cost;
    Ok(vec![
        Emit::all(WorldEvent::GuardSupplied {
            guard_id: guard_id.to_string(),
            ammo,
        }),
        Emit::all(WorldEvent::PlayerScrapUpdate {
            player_id: actor.to_string(),
            scrap: player.scrap,
        }),
    ])
}

/// Reinforces every standing block of an owned building through its terminal.
pub fn terminal_upgrade(
    world: &mut WorldState,
    actor: &str,
    building_id: &str,
) -> Result<Vec<Emit>, ActionError> {
    let economy = world.tuning.economy.clone();
    let available = world
        .players
        .get(actor)
        .ok_or(ActionError::PlayerNotFound)?
        .scrap;
    let building = world
        .building(building_id)
        .ok_or(ActionError::BuildingNotFound)?;
    if !building.is_owned_by(actor) {
        return Err(ActionError::NotOwner);
    }
    if available < economy.terminal_upgrade_cost {
        return Err(ActionError::InsufficientScrap {
            needed: economy.terminal_upgrade_cost,
            available,
        });
    }

    let mut max_health = 0.0f32;
    for index in world.building_blocks(building_id) {
        let Some(block) = world.obstacle_at_mut(index) else {
            continue;
        };
        if block.is_standing() {
            block.max_health *= economy.terminal_upgrade_multiplier;
            block.health = block.max_health;
            max_health = max_health.max(block.max_health);
        }
    }
    world.refresh_integrity(building_id);

    let building = world
        .building_mut(building_id)
        .ok_or(ActionError::BuildingNotFound)?;
    building.upgrade_level += 1;
    let (level, integrity, destroyed, total) = (
        building.upgrade_level,
        building.integrity,
        building.destroyed_blocks,
        building.total_blocks,
    );

    let player = world.players.get_mut(actor).ok_or(ActionError::PlayerNotFound)?;
    player.scrap -= economy.terminal_upgrade_cost;

    Ok(vec![
        Emit::all(WorldEvent::BuildingUpgraded {
            building_id: building_id.to_string(),
            level,
            max_health,
        }),
        Emit::all(WorldEvent::BuildingIntegrity {
            building_id: building_id.to_string(),
            integrity,
            destroyed_blocks: destroyed,
            total_blocks: total,
        }),
        Emit::all(WorldEvent::PlayerScrapUpdate {
            player_id: actor.to_string(),
            scrap: player.scrap,
        }),
        Emit::player(
            actor,
            WorldEvent::TerminalMessage {
                building_id: building_id.to_string(),
                success: true,
                message: format!("Building reinforced to level {level}"),
            },
        ),
    ])
}
