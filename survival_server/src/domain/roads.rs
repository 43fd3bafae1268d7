// Road carving: building perimeters plus corridors within and between zones.

use crate::domain::state::{Building, Rect};
use crate::domain::terrain::TerrainGrid;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RoadTuning {
    pub speed_modifier: f32,
    pub perimeter_padding: f32,
    pub corridor_width: f32,
    pub max_zone_link: f32,
}

impl Default for RoadTuning {
    fn default() -> Self {
        Self {
            speed_modifier: 1.3,
            perimeter_padding: 30.0,
            corridor_width: 50.0,
            max_zone_link: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoadStats {
    pub paved_tiles: usize,
    pub corridors: usize,
}

pub fn generate_roads(terrain: &mut TerrainGrid, buildings: &[Building], tuning: &RoadTuning) -> RoadStats {
    let mut stats = RoadStats::default();

    for building in buildings {
        let ring = building.footprint.inflate(tuning.perimeter_padding);
        stats.paved_tiles += pave_ring(terrain, ring, tuning.speed_modifier);
    }

    // Zones in first-seen order.
    let mut zones: Vec<(&str, Vec<&Building>)> = Vec::new();
    for building in buildings {
        match zones.iter_mut().find(|(name, _)| *name == building.zone) {
            Some((_, members)) => members.push(building),
            None => zones.push((building.zone.as_str(), vec![building])),
        }
    }

    for (name, members) in &zones {
        let centers: Vec<(f32, f32)> = members.iter().map(|b| b.footprint.center()).collect();
        let links = connect_nearest(centers.len(), f32::INFINITY, |a, b| {
            distance(centers[a], centers[b])
        });
        for (from, to) in links {
            stats.paved_tiles += corridor(terrain, centers[from], centers[to], tuning);
            stats.corridors += 1;
        }
        debug!(zone = name, buildings = members.len(), "zone roads carved");
    }

    let closest = |a: usize, b: usize| -> (f32, (f32, f32), (f32, f32)) {
        let mut best = (f32::INFINITY, (0.0, 0.0), (0.0, 0.0));
        for x in &zones[a].1 {
            for y in &zones[b].1 {
                let (p, q) = (x.footprint.center(), y.footprint.center());
                let d = distance(p, q);
                if d < best.0 {
                    best = (d, p, q);
                }
            }
        }
        best
    };

    let links = connect_nearest(zones.len(), tuning.max_zone_link, |a, b| closest(a, b).0);
    if zones.len() > 1 && links.len() + 1 < zones.len() {
        debug!(
            zones = zones.len(),
            linked = links.len() + 1,
            "some zones are too far apart to link"
        );
    }
    for (from, to) in links {
        let (_, p, q) = closest(from, to);
        stats.paved_tiles += corridor(terrain, p, q, tuning);
        stats.corridors += 1;
    }

    info!(paved = stats.paved_tiles, corridors = stats.corridors, "generated roads");
    stats
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Grows a tree from node 0, each step linking the closest (connected, unconnected)
/// pair. Pairs at or beyond `max_link` are never candidates; growth stops when none remain.
fn connect_nearest(
    count: usize,
    max_link: f32,
    dist: impl Fn(usize, usize) -> f32,
) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    if count == 0 {
        return edges;
    }
    let mut connected = vec![false; count];
    connected[0] = true;

    for _ in 1..count {
        let mut best: Option<(f32, usize, usize)> = None;
        for from in (0..count).filter(|&i| connected[i]) {
            for to in (0..count).filter(|&i| !connected[i]) {
                let d = dist(from, to);
                if d < max_link && best.is_none_or(|(b, _, _)| d < b) {
                    best = Some((d, from, to));
                }
            }
        }
        let Some((_, from, to)) = best else { break };
        connected[to] = true;
        edges.push((from, to));
    }
    edges
}

/// Horizontal leg at the source's y, then vertical leg at the target's x.
fn corridor(terrain: &mut TerrainGrid, from: (f32, f32), to: (f32, f32), tuning: &RoadTuning) -> usize {
    let half = tuning.corridor_width / 2.0;
    let horizontal = Rect::new(
        from.0.min(to.0) - half,
        from.1 - half,
        (to.0 - from.0).abs() + tuning.corridor_width,
        tuning.corridor_width,
    );
    let vertical = Rect::new(
        to.0 - half,
        from.1.min(to.1) - half,
        tuning.corridor_width,
        (to.1 - from.1).abs() + tuning.corridor_width,
    );
    pave_rect(terrain, horizontal, tuning.speed_modifier)
        + pave_rect(terrain, vertical, tuning.speed_modifier)
}

fn pave_ring(terrain: &mut TerrainGrid, ring: Rect, speed: f32) -> usize {
    let edge = 1.0;
    [
        Rect::new(ring.x, ring.y, ring.width, edge),
        Rect::new(ring.x, ring.y + ring.height - edge, ring.width, edge),
        Rect::new(ring.x, ring.y, edge, ring.height),
        Rect::new(ring.x + ring.width - edge, ring.y, edge, ring.height),
    ]
    .into_iter()
    .map(|side| pave_rect(terrain, side, speed))
    .sum()
}

/// Paves every tile the rectangle overlaps; returns tiles newly turned into road.
fn pave_rect(terrain: &mut TerrainGrid, area: Rect, speed: f32) -> usize {
    let size = terrain.tile_size;
    let max_col = terrain.cols as i64 - 1;
    let max_row = terrain.rows as i64 - 1;
    let first_col = ((area.x / size).floor() as i64).max(0);
    let last_col = (((area.x + area.width) / size).ceil() as i64 - 1).min(max_col);
    let first_row = ((area.y / size).floor() as i64).max(0);
    let last_row = (((area.y + area.height) / size).ceil() as i64 - 1).min(max_row);

    let mut paved = 0;
    for col in first_col..=last_col {
        for row in first_row..=last_row {
            let (x, y) = (col as f32 * size + size / 2.0, row as f32 * size + size / 2.0);
            let was_road = terrain
                .tile_at(x, y)
                .is_some_and(|t| t.biome == crate::domain::terrain::Biome::Road);
            if terrain.pave(x, y, speed) && !was_road {
                paved += 1;
            }
        }
    }
    paved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bsp::Room;
    use crate::domain::noise::NoiseField;
    use crate::domain::state::{BlockType, MaterialTier};
    use crate::domain::terrain::{Biome, MAP_SIZE, TILE_SIZE};

    fn building(id: &str, zone: &str, x: f32, y: f32) -> Building {
        Building::new(
            id.into(),
            Rect::new(x, y, 200.0, 200.0),
            vec![Room {
                x: 10,
                y: 10,
                width: 180,
                height: 180,
            }],
            zone.into(),
            BlockType::Wood,
            MaterialTier::Low,
        )
    }

    #[test]
    fn nearest_links_visit_everything_once() {
        let points = [(0.0, 0.0), (100.0, 0.0), (50.0, 0.0), (1000.0, 0.0)];
        let edges = connect_nearest(points.len(), f32::INFINITY, |a, b| {
            distance(points[a], points[b])
        });
        assert_eq!(edges, vec![(0, 2), (2, 1), (1, 3)]);
        assert!(connect_nearest(0, f32::INFINITY, |_, _| 0.0).is_empty());
        assert!(connect_nearest(1, f32::INFINITY, |_, _| 0.0).is_empty());
    }

    #[test]
    fn links_grow_from_the_whole_connected_set() {
        // -60 is closer to the origin than to 100, so both attach to the origin.
        let points = [(0.0, 0.0), (100.0, 0.0), (-60.0, 0.0)];
        let edges = connect_nearest(points.len(), f32::INFINITY, |a, b| {
            distance(points[a], points[b])
        });
        assert_eq!(edges, vec![(0, 2), (0, 1)]);

        let spread = [(0.0, 0.0), (300.0, 400.0), (-300.0, 400.0), (0.0, 900.0)];
        let edges = connect_nearest(spread.len(), f32::INFINITY, |a, b| {
            distance(spread[a], spread[b])
        });
        assert_eq!(edges.len(), spread.len() - 1);
        let mut reached = vec![false; spread.len()];
        reached[0] = true;
        for (from, to) in edges {
            assert!(reached[from] && !reached[to]);
            reached[to] = true;
        }
        assert!(reached.iter().all(|&r| r));
    }

    #[test]
    fn zone_links_skip_only_pairs_beyond_the_limit() {
        let noise = NoiseField::seeded(6);
        let mut terrain = TerrainGrid::generate(&noise, MAP_SIZE, TILE_SIZE);
        // c is 2900 from a but 5400 from b; it must still hang off a.
        let buildings = vec![
            building("a", "za", 3000.0, 2000.0),
            building("b", "zb", 5500.0, 2000.0),
            building("c", "zc", 100.0, 2000.0),
        ];
        let stats = generate_roads(&mut terrain, &buildings, &RoadTuning::default());
        assert_eq!(stats.corridors, 2);

        let edges = connect_nearest(3, 3000.0, |a, b| {
            let xs = [3000.0f32, 5500.0, 100.0];
            (xs[a] - xs[b]).abs()
        });
        assert_eq!(edges, vec![(0, 1), (0, 2)]);
        assert!(connect_nearest(2, 3000.0, |_, _| 3000.0).is_empty());
    }

    #[test]
    fn roads_never_pave_water_and_use_road_speed() {
        let noise = NoiseField::seeded(5);
        let mut terrain = TerrainGrid::generate(&noise, MAP_SIZE, TILE_SIZE);
        let water_before: Vec<(f32, f32)> = terrain
            .tiles()
            .iter()
            .filter(|t| t.biome == Biome::Water)
            .map(|t| (t.x, t.y))
            .collect();

        let buildings = vec![
            building("a", "z1", 500.0, 500.0),
            building("b", "z1", 1200.0, 700.0),
            building("c", "z2", 3000.0, 3000.0),
        ];
        let stats = generate_roads(&mut terrain, &buildings, &RoadTuning::default());
        assert_eq!(stats.corridors, 2);

        for (x, y) in water_before {
            assert_eq!(terrain.tile_at(x, y).map(|t| t.biome), Some(Biome::Water));
        }
        for tile in terrain.tiles().iter().filter(|t| t.biome == Biome::Road) {
            assert_eq!(tile.speed_modifier, 1.3);
        }
    }

    #[test]
    fn corridor_is_one_tile_wide_on_aligned_centres() {
        let noise = NoiseField::seeded(8);
        let mut terrain = TerrainGrid::generate(&noise, 1000.0, TILE_SIZE);
        let tuning = RoadTuning::default();
        corridor(&mut terrain, (125.0, 125.0), (525.0, 125.0), &tuning);

        for col in 0..terrain.cols {
            let x = col as f32 * TILE_SIZE + 1.0;
            let on_path = (100.0..550.0).contains(&x);
            let above = terrain.tile_at(x, 60.0).map(|t| t.biome);
            assert_ne!(above, Some(Biome::Road));
            let tile = terrain.tile_at(x, 110.0).map(|t| t.biome);
            if on_path && tile != Some(Biome::Water) {
                assert_eq!(tile, Some(Biome::Road));
            }
        }
    }

    #[test]
    fn far_zones_are_not_linked() {
        let noise = NoiseField::seeded(6);
        let mut terrain = TerrainGrid::generate(&noise, MAP_SIZE, TILE_SIZE);
        let buildings = vec![
            building("a", "near", 200.0, 200.0),
            building("b", "far", 4500.0, 4500.0),
        ];
        let stats = generate_roads(&mut terrain, &buildings, &RoadTuning::default());
        assert_eq!(stats.corridors, 0);
    }
}
