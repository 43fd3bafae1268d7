// The authoritative world: sessions, timers, and periodic passes over one WorldState.

use super::session::{self, Sessions};
use super::types::{Command, ConnId, GameEvent, Outbound, Recipients, WorldStats};
use crate::domain::events::{Audience, Emit, WorldEvent};
use crate::domain::scheduler::{Scheduler, Task};
use crate::domain::systems::{buildings, capture, combat, janitor, pickups};
use crate::domain::WorldState;
use tracing::{debug, trace};

pub struct GameWorld {
    world: WorldState,
    sessions: Sessions,
    scheduler: Scheduler,
    tick: u64,
}

impl GameWorld {
    pub fn new(world: WorldState) -> Self {
        Self {
            world,
            sessions: Sessions::default(),
            scheduler: Scheduler::new(),
            tick: 0,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Earliest pending timer, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    pub fn handle_event(&mut self, ev: GameEvent, now_ms: u64) -> Vec<Outbound> {
        match ev {
            GameEvent::Message {
                conn_id,
                command:
                    Command::Register {
                        persistent_id,
                        name,
                        color,
                    },
            } => {
                let emits = session::register(
                    &mut self.world,
                    &mut self.sessions,
                    &mut self.scheduler,
                    conn_id,
                    persistent_id,
                    name,
                    color,
                    now_ms,
                );
                emits.map(|e| self.route(e)).unwrap_or_default()
            }
            GameEvent::Message { conn_id, command } => {
                let Some(player_id) = self.sessions.player_of(conn_id).cloned() else {
                    debug!(conn_id, command = command.name(), "message before register ignored");
                    return Vec::new();
                };
                let name = command.name();
                match session::handle_command(
                    &mut self.world,
                    &mut self.scheduler,
                    &player_id,
                    command,
                    now_ms,
                ) {
                    Ok(emits) => self.route(emits),
                    Err(err) => {
                        debug!(conn_id, %player_id, command = name, error = ?err, "action rejected");
                        Vec::new()
                    }
                }
            }
            GameEvent::Disconnect { conn_id } => {
                let emits = session::disconnect(&mut self.world, &mut self.sessions, conn_id);
                self.route(emits)
            }
        }
    }

    /// One simulation step: capture points, then buildings.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Outbound> {
        self.tick += 1;
        let mut emits = capture::tick_capture_points(&mut self.world);
        emits.extend(buildings::tick_buildings(&mut self.world, now_ms));
        self.route(emits)
    }

    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let pruned = janitor::prune_bullets(&mut self.world, now_ms);
        if pruned > 0 {
            trace!(pruned, remaining = self.world.bullets.len(), "pruned bullets");
        }
        pruned
    }

    pub fn spawn_ability(&mut self) -> Vec<Outbound> {
        let emits = pickups::spawn_ability(&mut self.world).into_iter().collect();
        self.route(emits)
    }

    /// Runs every timer due at `now_ms`.
    pub fn run_due(&mut self, now_ms: u64) -> Vec<Outbound> {
        let mut out = Vec::new();
        for task in self.scheduler.pop_due(now_ms) {
            match task {
                Task::SendWorldSnapshot { conn_id } => {
                    if self.sessions.is_registered(conn_id) {
                        out.extend(self.snapshot_for(conn_id));
                    }
                }
                Task::Respawn { player_id } => {
                    if let Some(emit) = combat::respawn(&mut self.world, &player_id, now_ms) {
                        out.extend(self.route(vec![emit]));
                    }
                }
                Task::RespawnWeapon { spawn_index } => {
                    if let Some(emit) = pickups::respawn_weapon(&mut self.world, spawn_index) {
                        out.extend(self.route(vec![emit]));
                    }
                }
            }
        }
        out
    }

    pub fn stats(&self) -> WorldStats {
        let buildings = self.world.buildings();
        WorldStats {
            tick: self.tick,
            players: self.world.players.len(),
            buildings: buildings.len(),
            owned_buildings: buildings.iter().filter(|b| b.owner_id.is_some()).count(),
            obstacles: self.world.obstacles().len(),
            seed: self.world.seed,
        }
    }

    fn snapshot_for(&self, conn_id: ConnId) -> Vec<Outbound> {
        let world = &self.world;
        [
            WorldEvent::PickupsUpdate(world.pickups.clone()),
            WorldEvent::ObstaclesUpdate(world.obstacles().to_vec()),
            WorldEvent::TerrainUpdate(world.terrain.tiles().to_vec()),
            WorldEvent::CapturePointsUpdate(world.capture_points.clone()),
            WorldEvent::AmmoCratesUpdate(world.ammo_crates.clone()),
            WorldEvent::GuardsUpdate(world.guards.clone()),
            WorldEvent::FloorsUpdate(world.floors.clone()),
            WorldEvent::BuildingsUpdate(world.buildings().to_vec()),
        ]
        .into_iter()
        .map(|event| Outbound {
            recipients: Recipients::Only(conn_id),
            event,
        })
        .collect()
    }

    /// Maps player audiences onto connections. Events for players without a
    /// live connection are dropped.
    fn route(&self, emits: Vec<Emit>) -> Vec<Outbound> {
        emits
            .into_iter()
            .filter_map(|Emit { to, event }| {
                let recipients = match to {
                    Audience::All => Recipients::All,
                    Audience::Player(id) => Recipients::Only(self.sessions.conn_of(&id)?),
                    Audience::Others(id) => match self.sessions.conn_of(&id) {
                        Some(conn_id) => Recipients::AllExcept(conn_id),
                        None => Recipients::All,
                    },
                };
                Some(Outbound { recipients, event })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::BlockType;
    use crate::domain::systems::fixtures;
    use crate::domain::tuning::Tuning;
    use crate::domain::worldgen::{generate_world, WorldGenConfig};

    fn send(game: &mut GameWorld, conn_id: ConnId, command: Command, now_ms: u64) -> Vec<Outbound> {
        game.handle_event(GameEvent::Message { conn_id, command }, now_ms)
    }

    fn register(game: &mut GameWorld, conn_id: ConnId, id: &str) -> Vec<Outbound> {
        send(
            game,
            conn_id,
            Command::Register {
                persistent_id: Some(id.into()),
                name: Some(id.into()),
                color: None,
            },
            0,
        )
    }

    fn move_to(game: &mut GameWorld, conn_id: ConnId, x: f32, y: f32) -> Vec<Outbound> {
        send(game, conn_id, Command::Move { x, y, angle: 0.0 }, 0)
    }

    #[test]
    fn standing_on_the_military_point_captures_it_in_fifty_ticks() {
        let world = generate_world(Some(123_456_789), Tuning::default(), &WorldGenConfig::default());
        let mut game = GameWorld::new(world);
        register(&mut game, 1, "a");
        register(&mut game, 2, "b");
        move_to(&mut game, 2, 4900.0, 100.0);
        move_to(&mut game, 1, 2600.0, 2600.0);

        let point_id = game
            .world()
            .capture_points
            .iter()
            .find(|cp| cp.contains(2600.0, 2600.0))
            .map(|cp| cp.id.clone())
            .unwrap();

        let mut captured = None;
        for tick in 1..=50 {
            for out in game.tick(tick * 100) {
                if let WorldEvent::BaseCaptured {
                    capture_point_id,
                    owner,
                } = out.event
                {
                    assert_eq!(out.recipients, Recipients::All);
                    if capture_point_id == point_id {
                        captured = Some((tick, owner));
                    }
                }
            }
        }
        assert_eq!(captured, Some((50, "a".to_string())));
        let cp = game
            .world()
            .capture_points
            .iter()
            .find(|cp| cp.id == point_id)
            .unwrap();
        assert_eq!(cp.owner.as_deref(), Some("a"));
        assert_eq!(game.stats().tick, 50);
    }

    #[test]
    fn five_heavy_hits_turn_a_block_into_debris_once() {
        let mut world = fixtures::world();
        fixtures::add_building(&mut world, "building_0", 1000.0);
        let mut game = GameWorld::new(world);
        register(&mut game, 1, "a");

        let hit = || Command::ObstacleHit {
            obstacle_id: "building_0_0_0".into(),
            damage: Some(250.0),
        };
        for n in 1..=3 {
            let out = send(&mut game, 1, hit(), 0);
            assert!(matches!(
                out[0].event,
                WorldEvent::ObstacleDamaged { health, .. } if health == 1000.0 - 250.0 * n as f32
            ));
        }
        let out = send(&mut game, 1, hit(), 0);
        assert!(out.iter().any(|o| matches!(
            &o.event,
            WorldEvent::ObstacleDestroyed { obstacle } if obstacle.is_destroyed && obstacle.health == 0.0
        )));

        assert!(send(&mut game, 1, hit(), 0).is_empty());
        let block = game.world().obstacle("building_0_0_0").unwrap();
        assert_eq!(block.health, 0.0);
        assert!(!block.blocks_movement());
        assert_eq!(game.world().players["a"].scrap, 2);
    }

    #[test]
    fn debris_is_rebuilt_from_its_original_material() {
        let mut world = fixtures::world();
        fixtures::add_building(&mut world, "building_0", 1000.0);
        let mut game = GameWorld::new(world);
        register(&mut game, 1, "a");
        send(
            &mut game,
            1,
            Command::ObstacleHit {
                obstacle_id: "building_0_0_0".into(),
                damage: Some(5000.0),
            },
            0,
        );
        assert_eq!(game.world().players["a"].scrap, 2);
        game.world.players.get_mut("a").unwrap().scrap = 1;

        let original = game.world().obstacle("building_0_0_0").unwrap().original_type;
        let out = send(
            &mut game,
            1,
            Command::RepairBlock {
                obstacle_id: "building_0_0_0".into(),
            },
            0,
        );
        assert!(out.iter().any(|o| matches!(
            o.event,
            WorldEvent::ObstacleRebuilt { health, .. } if health == 100.0
        )));
        let block = game.world().obstacle("building_0_0_0").unwrap();
        assert!(!block.is_destroyed);
        assert_eq!(block.health, 100.0);
        assert_eq!(Some(block.block_type), original);
        assert_ne!(block.block_type, BlockType::Debris);
        assert_eq!(game.world().players["a"].scrap, 0);
    }

    #[test]
    fn move_before_register_is_a_no_op() {
        let mut game = GameWorld::new(fixtures::world());
        register(&mut game, 1, "a");
        let before = game.world().players["a"].clone();

        assert!(move_to(&mut game, 2, 10.0, 10.0).is_empty());
        assert_eq!(game.world().players.len(), 1);
        let after = &game.world().players["a"];
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert!(!game.sessions().is_registered(2));
    }

    #[test]
    fn registration_routes_init_to_self_and_join_to_others() {
        let mut game = GameWorld::new(fixtures::world());
        register(&mut game, 1, "a");
        let out = register(&mut game, 2, "b");
        assert!(matches!(out[0].event, WorldEvent::Init { .. }));
        assert_eq!(out[0].recipients, Recipients::Only(2));
        assert!(matches!(out[1].event, WorldEvent::PlayerJoined { .. }));
        assert_eq!(out[1].recipients, Recipients::AllExcept(2));
    }

    #[test]
    fn snapshot_goes_only_to_connections_still_open() {
        let mut game = GameWorld::new(fixtures::world());
        register(&mut game, 1, "a");
        register(&mut game, 2, "b");
        game.handle_event(GameEvent::Disconnect { conn_id: 2 }, 50);

        let out = game.run_due(100);
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|o| o.recipients == Recipients::Only(1)));
        assert!(matches!(out[0].event, WorldEvent::PickupsUpdate(_)));
        assert!(matches!(out[7].event, WorldEvent::BuildingsUpdate(_)));
        assert!(game.run_due(1_000).is_empty());
    }

    #[test]
    fn respawn_fires_only_for_players_still_dead() {
        let mut game = GameWorld::new(fixtures::world());
        register(&mut game, 1, "a");
        register(&mut game, 2, "b");
        game.run_due(100);
        game.world.players.get_mut("b").unwrap().invulnerable_until = 0;

        send(
            &mut game,
            1,
            Command::BulletHit {
                target_id: "b".into(),
                damage: Some(500.0),
            },
            1_000,
        );
        assert!(game.world().players["b"].is_dead);
        assert_eq!(game.next_due(), Some(3_000));

        let out = game.run_due(3_000);
        assert!(matches!(out[0].event, WorldEvent::PlayerRespawned { .. }));
        let b = &game.world().players["b"];
        assert!(!b.is_dead && b.is_invulnerable(3_000));

        // A player who left before the timer fired is simply skipped.
        send(
            &mut game,
            1,
            Command::BulletHit {
                target_id: "b".into(),
                damage: Some(500.0),
            },
            10_000,
        );
        game.handle_event(GameEvent::Disconnect { conn_id: 2 }, 10_500);
        assert!(game.run_due(12_000).is_empty());
    }

    #[test]
    fn ping_answers_only_the_sender() {
        let mut game = GameWorld::new(fixtures::world());
        register(&mut game, 1, "a");
        let out = send(&mut game, 1, Command::Ping, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipients, Recipients::Only(1));
        assert!(matches!(out[0].event, WorldEvent::Pong));
    }
}
