// Building ownership: zone capture, contest, hack, and integrity loss.

use crate::domain::errors::ActionError;
use crate::domain::events::{CaptureMethod, Emit, WorldEvent};
use crate::domain::state::{HackProgress, WorldState};

pub fn start_hack(
    world: &mut WorldState,
    actor: &str,
    building_id: &str,
    now_ms: u64,
) -> Result<Vec<Emit>, ActionError> {
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    let duration = world.tuning.capture.hack_duration_ms;
    let building = world
        .building_mut(building_id)
        .ok_or(ActionError::BuildingNotFound)?;
    if building.is_owned_by(actor) {
        return Err(ActionError::AlreadyOwner);
    }
    if building.hack_progress.contains_key(actor) {
        return Err(ActionError::HackInProgress);
    }
    building.hack_progress.insert(
        actor.to_string(),
        HackProgress {
            progress: 0.0,
            start_time: now_ms,
            duration,
        },
    );
    Ok(vec![Emit::player(
        actor,
        WorldEvent::HackStarted {
            building_id: building_id.to_string(),
            player_id: actor.to_string(),
            duration,
        },
    )])
}

pub fn tick_buildings(world: &mut WorldState, now_ms: u64) -> Vec<Emit> {
    let tuning = world.tuning.capture.clone();
    // (id, name, x, y) of every alive player, in id order.
    let alive: Vec<(String, String, f32, f32)> = world
        .alive_players()
        .map(|p| (p.id.clone(), p.name.clone(), p.x, p.y))
        .collect();
    // Hackers need only be connected, not alive.
    let names: Vec<(String, String)> = world
        .players
        .values()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();

    let mut emits = Vec::new();
    for building in world.buildings_mut() {
        if building.owner_id.is_some() && building.integrity < tuning.integrity_threshold {
            building.owner_id = None;
            building.owner_name = None;
            building.capture_progress.clear();
            emits.push(Emit::all(WorldEvent::BuildingLost {
                building_id: building.id.clone(),
                reason: "destroyed",
            }));
        }

        let zone = building.capture_zone;
        let occupants: Vec<&(String, String, f32, f32)> =
            alive.iter().filter(|(_, _, x, y)| zone.contains(*x, *y)).collect();

        if occupants.is_empty() {
            let owner = building.owner_id.clone();
            building.capture_progress.retain(|id, progress| {
                if owner.as_deref() == Some(id.as_str()) {
                    return true;
                }
                *progress = (*progress - tuning.building_decay).max(0.0);
                *progress > 0.0
            });
        }

        for (player_id, name, _, _) in occupants {
            match building.owner_id.clone() {
                Some(owner) if owner != *player_id => {
                    let mine = building.capture_progress.entry(player_id.clone()).or_insert(0.0);
                    *mine = (*mine + tuning.building_contest_step).min(100.0);

                    // A hacked-in owner has no progress entry and cannot be drained.
                    if let Some(theirs) = building.capture_progress.get_mut(&owner) {
                        *theirs = (*theirs - tuning.owner_drain).max(0.0);
                        if *theirs <= 0.0 {
                            building.owner_id = None;
                            building.owner_name = None;
                            emits.push(Emit::all(WorldEvent::BuildingNeutralized {
                                building_id: building.id.clone(),
                                contester_id: player_id.clone(),
                            }));
                        }
                    }
                }
                _ => {
                    let mine = building.capture_progress.entry(player_id.clone()).or_insert(0.0);
                    *mine = (*mine + tuning.building_step).min(100.0);
                    if *mine >= 100.0 && !building.is_owned_by(player_id) {
                        building.owner_id = Some(player_id.clone());
                        building.owner_name = Some(name.clone());
                        building.capture_progress.clear();
                        building.capture_progress.insert(player_id.clone(), 100.0);
                        building.hack_progress.remove(player_id);
                        emits.push(Emit::all(WorldEvent::BuildingCaptured {
                            building_id: building.id.clone(),
                            owner_id: player_id.clone(),
                            owner_name: name.clone(),
                            method: CaptureMethod::Zone,
                        }));
                    }
                }
            }

            emits.push(Emit::all(WorldEvent::BuildingCaptureProgress {
                building_id: building.id.clone(),
                player_id: player_id.clone(),
                progress: building
                    .capture_progress
                    .get(player_id)
                    .copied()
                    .unwrap_or(0.0),
                owner_id: building.owner_id.clone(),
            }));
        }

        // Hacks advance on wall-clock time regardless of who stands where.
        let owner = building.owner_id.clone();
        building.hack_progress.retain(|id, _| {
            names.iter().any(|(present, _)| present == id) && owner.as_deref() != Some(id.as_str())
        });
        let mut hacked_by = None;
        for (player_id, hack) in building.hack_progress.iter_mut() {
            let elapsed = now_ms.saturating_sub(hack.start_time) as f32;
            hack.progress = (elapsed / hack.duration.max(1) as f32 * 100.0).min(100.0);
            if hack.progress >= 100.0 {
                hacked_by = Some(player_id.clone());
                break;
            }
            emits.push(Emit::player(
                player_id,
                WorldEvent::HackProgress {
                    building_id: building.id.clone(),
                    player_id: player_id.clone(),
                    progress: hack.progress,
                },
            ));
        }

        if let Some(player_id) = hacked_by {
            let name = names
                .iter()
                .find(|(id, _)| *id == player_id)
                .map(|(_, n)| n.clone())
                .unwrap_or_else(|| player_id.clone());
            building.owner_id = Some(player_id.clone());
            building.owner_name = Some(name.clone());
            building.capture_progress.clear();
            building.hack_progress.clear();
            emits.push(Emit::all(WorldEvent::BuildingCaptured {
                building_id: building.id.clone(),
                owner_id: player_id,
                owner_name: name,
                method: CaptureMethod::Hack,
            }));
        }
    }
    emits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::systems::fixtures;

    // Capture zone of the fixture building is centred at (240, 210), radius 80.
    fn setup() -> WorldState {
        let mut world = fixtures::world();
        fixtures::add_building(&mut world, "building_0", 1000.0);
        world
    }

    fn building(world: &WorldState) -> &crate::domain::state::Building {
        world.building("building_0").unwrap()
    }

    #[test]
    fn neutral_building_is_captured_with_monotone_progress() {
        let mut world = setup();
        fixtures::add_player(&mut world, "a", 240.0, 210.0);

        let mut last = 0.0;
        for _ in 0..49 {
            tick_buildings(&mut world, 0);
            let progress = building(&world).capture_progress["a"];
            assert!(progress > last);
            last = progress;
            assert!(building(&world).owner_id.is_none());
        }
        let emits = tick_buildings(&mut world, 0);
        assert!(emits.iter().any(|e| matches!(
            e.event,
            WorldEvent::BuildingCaptured {
                method: CaptureMethod::Zone,
                ..
            }
        )));
        assert_eq!(building(&world).owner_id.as_deref(), Some("a"));
        assert_eq!(building(&world).owner_name.as_deref(), Some("name-a"));
        assert_eq!(building(&world).capture_progress.len(), 1);
    }

    #[test]
    fn contested_building_is_neutralized_before_it_changes_hands() {
        let mut world = setup();
        fixtures::set_owner(&mut world, "building_0", "owner");
        fixtures::add_player(&mut world, "b", 250.0, 210.0);

        for _ in 0..49 {
            tick_buildings(&mut world, 0);
            assert_eq!(building(&world).owner_id.as_deref(), Some("owner"));
        }
        let emits = tick_buildings(&mut world, 0);
        assert!(emits
            .iter()
            .any(|e| matches!(e.event, WorldEvent::BuildingNeutralized { .. })));
        assert!(building(&world).owner_id.is_none());
        assert_eq!(building(&world).capture_progress["b"], 50.0);

        for _ in 0..25 {
            tick_buildings(&mut world, 0);
        }
        assert_eq!(building(&world).owner_id.as_deref(), Some("b"));
    }

    #[test]
    fn at_most_one_owner_when_several_players_compete() {
        let mut world = setup();
        fixtures::add_player(&mut world, "a", 240.0, 210.0);
        fixtures::add_player(&mut world, "b", 241.0, 210.0);
        fixtures::add_player(&mut world, "c", 239.0, 210.0);

        let mut captures = 0;
        for _ in 0..200 {
            let emits = tick_buildings(&mut world, 0);
            let this_tick = emits
                .iter()
                .filter(|e| matches!(e.event, WorldEvent::BuildingCaptured { .. }))
                .count();
            assert!(this_tick <= 1);
            captures += this_tick;
        }
        // The first to finish holds it; the others can only drain, never co-own.
        assert_eq!(captures, 1);
        assert_eq!(building(&world).owner_id.as_deref(), Some("a"));
    }

    #[test]
    fn owner_progress_survives_an_empty_zone() {
        let mut world = setup();
        fixtures::set_owner(&mut world, "building_0", "owner");
        world
            .building_mut("building_0")
            .unwrap()
            .capture_progress
            .insert("x".into(), 1.0);
        tick_buildings(&mut world, 0);
        assert_eq!(building(&world).capture_progress["x"], 0.5);
        tick_buildings(&mut world, 0);
        assert!(!building(&world).capture_progress.contains_key("x"));
        assert_eq!(building(&world).capture_progress["owner"], 100.0);
    }

    #[test]
    fn low_integrity_drops_ownership() {
        let mut world = setup();
        fixtures::set_owner(&mut world, "building_0", "owner");
        for i in 0..3 {
            if let Some(o) = world.obstacle_mut(&format!("building_0_{i}_0")) {
                o.apply_damage(1000.0);
            }
        }
        world.refresh_integrity("building_0");
        let emits = tick_buildings(&mut world, 0);
        assert!(matches!(
            emits[0].event,
            WorldEvent::BuildingLost {
                reason: "destroyed",
                ..
            }
        ));
        assert!(building(&world).owner_id.is_none());
        assert!(building(&world).capture_progress.is_empty());
    }

    #[test]
    fn hack_completes_on_wall_clock_time() {
        let mut world = setup();
        fixtures::add_player(&mut world, "h", 900.0, 900.0);
        fixtures::set_owner(&mut world, "building_0", "owner");

        let emits = start_hack(&mut world, "h", "building_0", 1_000).unwrap();
        assert_eq!(emits[0].to, crate::domain::events::Audience::Player("h".into()));
        assert_eq!(
            start_hack(&mut world, "h", "building_0", 1_000).err(),
            Some(ActionError::HackInProgress)
        );

        tick_buildings(&mut world, 6_000);
        assert_eq!(building(&world).hack_progress["h"].progress, 50.0);
        assert_eq!(building(&world).owner_id.as_deref(), Some("owner"));

        let emits = tick_buildings(&mut world, 11_000);
        assert!(emits.iter().any(|e| matches!(
            e.event,
            WorldEvent::BuildingCaptured {
                method: CaptureMethod::Hack,
                ..
            }
        )));
        let b = building(&world);
        assert_eq!(b.owner_id.as_deref(), Some("h"));
        assert!(b.capture_progress.is_empty() && b.hack_progress.is_empty());
        assert_eq!(
            start_hack(&mut world, "h", "building_0", 12_000).err(),
            Some(ActionError::AlreadyOwner)
        );
    }

    #[test]
    fn hacks_of_departed_players_are_dropped() {
        let mut world = setup();
        fixtures::add_player(&mut world, "h", 900.0, 900.0);
        start_hack(&mut world, "h", "building_0", 0).unwrap();
        world.players.remove("h");
        tick_buildings(&mut world, 20_000);
        assert!(building(&world).hack_progress.is_empty());
        assert!(building(&world).owner_id.is_none());
    }
}
