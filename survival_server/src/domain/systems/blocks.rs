use crate::domain::errors::ActionError;
use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::{DamageOutcome, RepairOutcome, WorldState};

/// Applies bullet or hammer damage to a standing block.
///
/// Blocks of a building owned by another player take a fraction of the damage.
/// Destroying a block turns it into debris and pays the attacker scrap.
pub fn hit_obstacle(
    world: &mut WorldState,
    actor: &str,
    obstacle_id: &str,
    damage: f32,
) -> Result<Vec<Emit>, ActionError> {
    if !damage.is_finite() || damage < 0.0 {
        return Err(ActionError::InvalidAmount);
    }
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    let obstacle = world
        .obstacle(obstacle_id)
        .ok_or(ActionError::ObstacleNotFound)?;
    if !obstacle.is_standing() {
        return Err(ActionError::ObstacleDestroyed);
    }
    let building_id = obstacle.building_id.clone();

    let fortified = building_id
        .as_deref()
        .and_then(|id| world.building(id))
        .and_then(|b| b.owner_id.as_deref())
        .is_some_and(|owner| owner != actor);
    let damage = if fortified {
        damage / world.tuning.economy.fortified_divisor
    } else {
        damage
    };

    let obstacle = world
        .obstacle_mut(obstacle_id)
        .ok_or(ActionError::ObstacleNotFound)?;
    let mut emits = Vec::new();
    match obstacle.apply_damage(damage) {
        DamageOutcome::Damaged { health } => {
            emits.push(Emit::all(WorldEvent::ObstacleDamaged {
                obstacle_id: obstacle_id.to_string(),
                health,
            }));
        }
        DamageOutcome::Destroyed => {
            emits.push(Emit::all(WorldEvent::ObstacleDestroyed {
                obstacle: obstacle.clone(),
            }));
            let reward = world.tuning.economy.scrap_per_block;
            if let Some(player) = world.players.get_mut(actor) {
                player.scrap += reward;
                emits.push(Emit::all(WorldEvent::PlayerScrapUpdate {
                    player_id: actor.to_string(),
                    scrap: player.scrap,
                }));
            }
        }
    }

    emits.extend(integrity_update(world, building_id.as_deref()));
    Ok(emits)
}

/// Spends scrap to rebuild debris or top up a damaged block.
pub fn repair_block(
    world: &mut WorldState,
    actor: &str,
    obstacle_id: &str,
) -> Result<Vec<Emit>, ActionError> {
    let economy = world.tuning.economy.clone();
    let available = world
        .players
        .get(actor)
        .ok_or(ActionError::PlayerNotFound)?
        .scrap;
    let obstacle = world
        .obstacle_mut(obstacle_id)
        .ok_or(ActionError::ObstacleNotFound)?;
    if available < economy.repair_cost {
        return Err(ActionError::InsufficientScrap {
            needed: economy.repair_cost,
            available,
        });
    }

    let mut emits = Vec::new();
    match obstacle.repair(economy.repair_amount, economy.rebuild_health) {
        RepairOutcome::Rebuilt { block_type, health } => {
            emits.push(Emit::all(WorldEvent::ObstacleRebuilt {
                obstacle_id: obstacle_id.to_string(),
                block_type,
                health,
            }))
        }
        RepairOutcome::Repaired { health } => emits.push(Emit::all(WorldEvent::ObstacleDamaged {
            obstacle_id: obstacle_id.to_string(),
            health,
        })),
    }
    let building_id = obstacle.building_id.clone();

    if let Some(player) = world.players.get_mut(actor) {
        player.scrap -= economy.repair_cost;
        emits.push(Emit::all(WorldEvent::PlayerScrapUpdate {
            player_id: actor.to_string(),
            scrap: player.scrap,
        }));
    }
    emits.extend(integrity_update(world, building_id.as_deref()));
    Ok(emits)
}

/// Flips a door together with every other standing door of its building.
pub fn toggle_door(world: &mut WorldState, door_id: &str) -> Result<Vec<Emit>, ActionError> {
    let door = world.obstacle(door_id).ok_or(ActionError::DoorNotFound)?;
    if !door.is_door || !door.is_standing() {
        return Err(ActionError::DoorNotFound);
    }
    let open = !door.is_open;

    let indices = match door.building_id.clone() {
        Some(building_id) => world.building_blocks(&building_id),
        None => world.obstacle_index(door_id).into_iter().collect(),
    };

    let mut emits = Vec::new();
    for index in indices {
        let Some(block) = world.obstacle_at_mut(index) else {
            continue;
        };
        if block.is_door && block.is_standing() {
            block.is_open = open;
            emits.push(Emit::all(WorldEvent::DoorToggled {
                door_id: block.id.clone(),
                is_open: open,
            }));
        }
    }
    Ok(emits)
}

fn integrity_update(world: &mut WorldState, building_id: Option<&str>) -> Option<Emit> {
    let building_id = building_id?;
    world.refresh_integrity(building_id)?;
    let building = world.building(building_id)?;
    Some(Emit::all(WorldEvent::BuildingIntegrity {
        building_id: building_id.to_string(),
        integrity: building.integrity,
        destroyed_blocks: building.destroyed_blocks,
        total_blocks: building.total_blocks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::BlockType;
    use crate::domain::systems::fixtures;

    fn setup() -> WorldState {
        let mut world = fixtures::world();
        fixtures::add_player(&mut world, "a", 0.0, 0.0);
        fixtures::add_building(&mut world, "building_0", 1000.0);
        world
    }

    #[test]
    fn five_heavy_hits_reduce_a_block_to_debris() {
        let mut world = setup();
        for _ in 0..4 {
            hit_obstacle(&mut world, "a", "building_0_0_0", 250.0).unwrap();
        }
        let block = world.obstacle("building_0_0_0").unwrap();
        assert_eq!(block.health, 0.0);
        assert!(block.is_destroyed);
        assert_eq!(block.block_type, BlockType::Debris);
        assert_eq!(block.original_type, Some(BlockType::Wood));
        assert_eq!(fixtures::player(&world, "a").scrap, 2);

        assert_eq!(
            hit_obstacle(&mut world, "a", "building_0_0_0", 250.0).err(),
            Some(ActionError::ObstacleDestroyed)
        );
        assert_eq!(fixtures::player(&world, "a").scrap, 2);
        assert_eq!(world.building("building_0").unwrap().destroyed_blocks, 1);
        assert_eq!(world.building("building_0").unwrap().integrity, 75.0);
    }

    #[test]
    fn foreign_owned_blocks_take_a_tenth() {
        let mut world = setup();
        fixtures::set_owner(&mut world, "building_0", "owner");
        hit_obstacle(&mut world, "a", "building_0_0_0", 100.0).unwrap();
        assert_eq!(world.obstacle("building_0_0_0").unwrap().health, 990.0);

        fixtures::add_player(&mut world, "owner", 0.0, 0.0);
        hit_obstacle(&mut world, "owner", "building_0_0_0", 100.0).unwrap();
        assert_eq!(world.obstacle("building_0_0_0").unwrap().health, 890.0);
    }

    #[test]
    fn debris_repair_costs_one_scrap() {
        let mut world = setup();
        hit_obstacle(&mut world, "a", "building_0_0_0", 1000.0).unwrap();
        fixtures::set_scrap(&mut world, "a", 1);

        let emits = repair_block(&mut world, "a", "building_0_0_0").unwrap();
        assert!(matches!(
            emits[0].event,
            WorldEvent::ObstacleRebuilt {
                block_type: BlockType::Wood,
                ..
            }
        ));
        let block = world.obstacle("building_0_0_0").unwrap();
        assert!(block.is_wall && !block.is_destroyed);
        assert_eq!(block.health, 100.0);
        assert_eq!(fixtures::player(&world, "a").scrap, 0);

        assert_eq!(
            repair_block(&mut world, "a", "building_0_0_0").err(),
            Some(ActionError::InsufficientScrap {
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn doors_of_a_building_open_together() {
        let mut world = setup();
        let emits = toggle_door(&mut world, "building_0_1_0").unwrap();
        assert_eq!(emits.len(), 2);
        assert!(world.obstacle("building_0_1_0").unwrap().is_open);
        assert!(world.obstacle("building_0_2_0").unwrap().is_open);
        assert!(!world.obstacle("building_0_0_0").unwrap().is_open);

        hit_obstacle(&mut world, "a", "building_0_2_0", 1000.0).unwrap();
        let emits = toggle_door(&mut world, "building_0_1_0").unwrap();
        assert_eq!(emits.len(), 1);
        assert!(!world.obstacle("building_0_1_0").unwrap().is_open);

        assert_eq!(
            toggle_door(&mut world, "building_0_0_0").err(),
            Some(ActionError::DoorNotFound)
        );
    }
}
