use crate::domain::errors::ActionError;
use crate::domain::events::{Emit, WorldEvent};
use crate::domain::state::{Bullet, WorldState};

pub struct HitResult {
    pub emits: Vec<Emit>,
    /// Set when the hit killed the target; the caller schedules the respawn.
    pub killed: bool,
}

pub struct ShotInput {
    pub bullet_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Records a client-simulated bullet. Hits are reported separately by clients.
pub fn shoot(
    world: &mut WorldState,
    actor: &str,
    shot: ShotInput,
    now_ms: u64,
) -> Result<Vec<Emit>, ActionError> {
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    let id = shot.bullet_id.unwrap_or_else(|| now_ms.to_string());
    world.bullets.push(Bullet {
        id: id.clone(),
        x: shot.x,
        y: shot.y,
        vx: shot.vx,
        vy: shot.vy,
        owner: actor.to_string(),
        created_at: now_ms,
    });
    Ok(vec![Emit::all(WorldEvent::PlayerShot {
        bullet_id: id,
        player_id: actor.to_string(),
        x: shot.x,
        y: shot.y,
        vx: shot.vx,
        vy: shot.vy,
    })])
}

pub fn bullet_hit(
    world: &mut WorldState,
    actor: &str,
    target_id: &str,
    damage: Option<f32>,
    now_ms: u64,
) -> Result<HitResult, ActionError> {
    let damage = damage.unwrap_or(world.tuning.player.default_bullet_damage);
    if !damage.is_finite() || damage < 0.0 {
        return Err(ActionError::InvalidAmount);
    }
    if !world.players.contains_key(actor) {
        return Err(ActionError::PlayerNotFound);
    }
    if actor == target_id {
        return Err(ActionError::SelfTarget);
    }
    let target = world
        .players
        .get_mut(target_id)
        .ok_or(ActionError::TargetNotFound)?;
    if target.is_dead {
        return Err(ActionError::TargetDead);
    }
    if target.is_invulnerable(now_ms) {
        return Err(ActionError::TargetInvulnerable);
    }

    target.absorb_damage(damage);
    let mut emits = vec![
        Emit::all(WorldEvent::PlayerArmorUpdate {
            player_id: target_id.to_string(),
            armor: target.armor,
        }),
        Emit::all(WorldEvent::PlayerDamaged {
            player_id: target_id.to_string(),
            health: target.health,
            by_player: actor.to_string(),
        }),
    ];

    let killed = target.health <= 0.0;
    if killed {
        target.is_dead = true;
        emits.push(Emit::all(WorldEvent::PlayerDied {
            player_id: target_id.to_string(),
            killed_by: actor.to_string(),
        }));
    }
    Ok(HitResult { emits, killed })
}

/// Brings a dead player back. No-op if they left or were already revived.
pub fn respawn(world: &mut WorldState, player_id: &str, now_ms: u64) -> Option<Emit> {
    if !world.players.get(player_id)?.is_dead {
        return None;
    }
    let (x, y) = world.find_spawn_point();
    let tuning = world.tuning.player.clone();
    let player = world.players.get_mut(player_id)?;

    player.x = x;
    player.y = y;
    player.health = player.max_health;
    player.armor = 0.0;
    player.weapon = tuning.default_weapon.to_string();
    player.is_dead = false;
    player.invulnerable = true;
    player.invulnerable_until = now_ms + tuning.invulnerability_ms;

    Some(Emit::all(WorldEvent::PlayerRespawned {
        player_id: player_id.to_string(),
        x,
        y,
        health: player.health,
        invulnerable: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::systems::fixtures;

    fn duel() -> WorldState {
        let mut world = fixtures::world();
        fixtures::add_player(&mut world, "a", 0.0, 0.0);
        fixtures::add_player(&mut world, "b", 10.0, 0.0);
        world
    }

    #[test]
    fn damage_is_conserved_across_armor_and_health() {
        for (armor, damage) in [(0.0, 20.0), (15.0, 20.0), (50.0, 20.0), (30.0, 500.0), (0.0, 0.0)] {
            let mut world = duel();
            world.players.get_mut("b").unwrap().armor = armor;
            let before = armor + 100.0;

            bullet_hit(&mut world, "a", "b", Some(damage), 0).unwrap();
            let b = fixtures::player(&world, "b");
            assert!(b.armor >= 0.0 && b.health >= 0.0);
            assert_eq!(before - (b.armor + b.health), damage.min(before));
        }
    }

    #[test]
    fn hits_default_to_twenty() {
        let mut world = duel();
        let result = bullet_hit(&mut world, "a", "b", None, 0).unwrap();
        assert_eq!(fixtures::player(&world, "b").health, 80.0);
        assert_eq!(result.emits.len(), 2);
        assert!(!result.killed);
    }

    #[test]
    fn preconditions_reject_without_side_effects() {
        let mut world = duel();
        assert_eq!(
            bullet_hit(&mut world, "a", "a", None, 0).err(),
            Some(ActionError::SelfTarget)
        );
        assert_eq!(
            bullet_hit(&mut world, "a", "nobody", None, 0).err(),
            Some(ActionError::TargetNotFound)
        );
        assert_eq!(
            bullet_hit(&mut world, "a", "b", Some(f32::NAN), 0).err(),
            Some(ActionError::InvalidAmount)
        );
        assert_eq!(
            bullet_hit(&mut world, "a", "b", Some(-5.0), 0).err(),
            Some(ActionError::InvalidAmount)
        );

        {
            let b = world.players.get_mut("b").unwrap();
            b.invulnerable = true;
            b.invulnerable_until = 1_500;
        }
        assert_eq!(
            bullet_hit(&mut world, "a", "b", None, 1_000).err(),
            Some(ActionError::TargetInvulnerable)
        );
        assert_eq!(fixtures::player(&world, "b").health, 100.0);
        assert!(bullet_hit(&mut world, "a", "b", None, 1_500).is_ok());
    }

    #[test]
    fn lethal_hit_kills_once_and_respawn_restores() {
        let mut world = duel();
        world.players.get_mut("b").unwrap().weapon = "rifle".into();
        let result = bullet_hit(&mut world, "a", "b", Some(150.0), 0).unwrap();
        assert!(result.killed);
        assert_eq!(result.emits.len(), 3);
        assert_eq!(
            bullet_hit(&mut world, "a", "b", Some(10.0), 0).err(),
            Some(ActionError::TargetDead)
        );

        let emit = respawn(&mut world, "b", 2_000).unwrap();
        assert!(matches!(emit.event, WorldEvent::PlayerRespawned { invulnerable: true, .. }));
        let b = fixtures::player(&world, "b");
        assert!(!b.is_dead);
        assert_eq!((b.health, b.armor), (100.0, 0.0));
        assert_eq!(b.weapon, "pistol");
        assert_eq!(b.invulnerable_until, 3_500);

        assert!(respawn(&mut world, "b", 3_000).is_none());
        assert!(respawn(&mut world, "gone", 3_000).is_none());
    }

    #[test]
    fn shots_fall_back_to_server_time_ids() {
        let mut world = duel();
        let shot = ShotInput {
            bullet_id: None,
            x: 1.0,
            y: 2.0,
            vx: 3.0,
            vy: 4.0,
        };
        shoot(&mut world, "a", shot, 777).unwrap();
        assert_eq!(world.bullets[0].id, "777");
        assert_eq!(world.bullets[0].created_at, 777);
    }
}
