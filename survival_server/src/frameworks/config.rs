use std::{env, net::IpAddr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("SURVIVAL_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn http_host() -> IpAddr {
    env::var("SURVIVAL_SERVER_HOST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]))
}

pub const DEFAULT_WORLD_SEED: u64 = 123_456_789;

/// `WORLD_SEED=random` selects an unseeded world; anything unparsable falls back
/// to the default seed.
pub fn world_seed() -> Option<u64> {
    parse_world_seed(env::var("WORLD_SEED").ok().as_deref())
}

fn parse_world_seed(raw: Option<&str>) -> Option<u64> {
    match raw.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("random") => None,
        Some(v) => Some(v.parse().unwrap_or(DEFAULT_WORLD_SEED)),
        None => Some(DEFAULT_WORLD_SEED),
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const JANITOR_INTERVAL: Duration = Duration::from_secs(1);
pub const ABILITY_SPAWN_INTERVAL: Duration = Duration::from_secs(60);
