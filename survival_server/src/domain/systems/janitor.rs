use crate::domain::state::WorldState;

/// Drops bullets older than the configured TTL. Returns how many were removed.
pub fn prune_bullets(world: &mut WorldState, now_ms: u64) -> usize {
    let ttl = world.tuning.capture.bullet_ttl_ms;
    let before = world.bullets.len();
    world
        .bullets
        .retain(|b| now_ms.saturating_sub(b.created_at) < ttl);
    before - world.bullets.len()
}
