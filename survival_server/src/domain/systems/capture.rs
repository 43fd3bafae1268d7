// Capture point occupancy, one step per simulation tick.

use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::WorldState;

pub fn tick_capture_points(world: &mut WorldState) -> Vec<Emit> {
    let step = world.tuning.capture.point_step;
    let decay = world.tuning.capture.point_decay;
    let mut emits = Vec::new();

    for index in 0..world.capture_points.len() {
        let occupants: Vec<String> = {
            let cp = &world.capture_points[index];
            world
                .alive_players()
                .filter(|p| cp.contains(p.x, p.y))
                .map(|p| p.id.clone())
                .collect()
        };

        if occupants.is_empty() {
            let cp = &mut world.capture_points[index];
            cp.capture_progress.retain(|_, progress| {
                *progress = (*progress - decay).max(0.0);
                *progress > 0.0
            });
            continue;
        }

        for player_id in occupants {
            let cp = &mut world.capture_points[index];
            if cp.owner.as_deref() == Some(player_id.as_str()) {
                continue;
            }
            let progress = cp.capture_progress.entry(player_id.clone()).or_insert(0.0);
            *progress = (*progress + step).min(100.0);
            let progress = *progress;

            if progress < 100.0 {
                emits.push(Emit::all(WorldEvent::CaptureProgress {
                    capture_point_id: cp.id.clone(),
                    player_id,
                    progress,
                }));
                continue;
            }

            cp.owner = Some(player_id.clone());
            cp.capture_progress.clear();
            cp.level = 0;
            cp.guards.clear();
            let cp_id = cp.id.clone();
            world.guards.retain(|g| g.capture_point_id != cp_id);

            emits.push(Emit::all(WorldEvent::BaseCaptured {
                capture_point_id: cp_id,
                owner: player_id,
            }));
            emits.push(Emit::all(WorldEvent::GuardsUpdate(world.guards.clone())));
        }
    }
    emits
}
