// Timed pickup spawning.

use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::{Pickup, WorldState};

pub const ROAMING_ABILITY: &str = "ability_bladeswirl";

/// Tops up roaming ability pickups, one per call, up to the configured cap.
pub fn spawn_ability(world: &mut WorldState) -> Option<Emit> {
    let present = world.pickups.iter().filter(|p| p.is_ability()).count();
    if present >= world.tuning.capture.max_ability_pickups {
        return None;
    }
    let (x, y) = world.find_spawn_point();
    let id = world.next_id("ability");
    world
        .pickups
        .push(Pickup::new(id, ROAMING_ABILITY.to_string(), x, y));
    tracing::debug!(x, y, "spawned ability pickup");
    Some(Emit::all(WorldEvent::PickupsUpdate(world.pickups.clone())))
}

/// Restores a weapon at its spawn point unless it is already there.
pub fn respawn_weapon(world: &mut WorldState, spawn_index: usize) -> Option<Emit> {
    if world
        .pickups
        .iter()
        .any(|p| p.spawn_point_index == Some(spawn_index))
    {
        return None;
    }
    let pickup = world.weapon_spawns.get(spawn_index)?.pickup(spawn_index);
    world.pickups.push(pickup);
    Some(Emit::all(WorldEvent::PickupsUpdate(world.pickups.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::WeaponSpawn;
    use crate::domain::systems::fixtures;

    #[test]
    fn ability_spawns_stop_at_the_cap() {
        let mut world = fixtures::world();
        for _ in 0..3 {
            assert!(spawn_ability(&mut world).is_some());
        }
        assert!(spawn_ability(&mut world).is_none());
        assert_eq!(world.pickups.iter().filter(|p| p.is_ability()).count(), 3);

        let ids: std::collections::HashSet<_> = world.pickups.iter().map(|p| &p.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn weapons_respawn_once() {
        let mut world = fixtures::world();
        world.weapon_spawns.push(WeaponSpawn {
            kind: "weapon_smg".into(),
            x: 10.0,
            y: 20.0,
            respawn_time_ms: 30_000,
        });
        assert!(respawn_weapon(&mut world, 0).is_some());
        assert!(respawn_weapon(&mut world, 0).is_none());
        assert!(respawn_weapon(&mut world, 5).is_none());
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.pickups[0].id, "weapon_spawn_0");
    }
}
