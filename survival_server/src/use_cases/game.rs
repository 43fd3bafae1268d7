use super::simulation::GameWorld;
use super::types::{GameEvent, Outbound, WorldStats};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct LoopTiming {
    pub tick: Duration,
    pub janitor: Duration,
    pub ability: Duration,
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Owns the world. Runs until every input sender is dropped.
pub async fn world_task(
    mut game: GameWorld,
    mut input_rx: mpsc::Receiver<GameEvent>,
    outbound_tx: mpsc::UnboundedSender<Outbound>,
    stats_tx: watch::Sender<WorldStats>,
    timing: LoopTiming,
) {
    let mut tick = tokio::time::interval(timing.tick);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut janitor = tokio::time::interval_at(Instant::now() + timing.janitor, timing.janitor);
    let mut ability = tokio::time::interval_at(Instant::now() + timing.ability, timing.ability);

    let _ = stats_tx.send(game.stats());
    info!(
        obstacles = game.world().obstacles().len(),
        buildings = game.world().buildings().len(),
        "world task started"
    );

    loop {
        let timer = wait_for(game.next_due());

        let out = tokio::select! {
            ev = input_rx.recv() => match ev {
                Some(ev) => game.handle_event(ev, now_ms()),
                None => break,
            },
            _ = tick.tick() => {
                let out = game.tick(now_ms());
                stats_tx.send_replace(game.stats());
                out
            }
            _ = janitor.tick() => {
                game.sweep(now_ms());
                Vec::new()
            }
            _ = ability.tick() => game.spawn_ability(),
            _ = timer => game.run_due(now_ms()),
        };

        for msg in out {
            if outbound_tx.send(msg).is_err() {
                debug!("outbound dispatcher gone; stopping world task");
                return;
            }
        }
    }

    info!(tick = game.tick_count(), "world task stopped");
}

async fn wait_for(due_ms: Option<u64>) {
    match due_ms {
        Some(due) => {
            let delay = due.saturating_sub(now_ms());
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        None => std::future::pending::<()>().await,
    }
}
