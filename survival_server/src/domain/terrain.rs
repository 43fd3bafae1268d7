// Biome grid generated from layered noise octaves.

use crate::domain::noise::NoiseField;
use crate::domain::state::Rect;

pub const TILE_SIZE: f32 = 50.0;
pub const MAP_SIZE: f32 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Biome {
    Grass,
    Water,
    Mud,
    Forest,
    Road,
}

impl Biome {
    pub fn as_str(self) -> &'static str {
        match self {
            Biome::Grass => "grass",
            Biome::Water => "water",
            Biome::Mud => "mud",
            Biome::Forest => "forest",
            Biome::Road => "road",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTile {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub biome: Biome,
    pub speed_modifier: f32,
}

/// Weights and thresholds for biome classification.
#[derive(Debug, Clone, Copy)]
pub struct TerrainTuning {
    /// (scale, weight) per octave, largest features first.
    pub octaves: [(f64, f64); 3],
    pub moisture_scale: f64,
    pub moisture_offset: f64,
    pub forest_moisture: f64,
    pub water_below: f64,
    pub shore_below: f64,
    pub land_below: f64,
    pub highland_below: f64,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            octaves: [(0.003, 0.75), (0.008, 0.20), (0.02, 0.05)],
            moisture_scale: 0.004,
            moisture_offset: 1000.0,
            forest_moisture: 0.6,
            water_below: 0.30,
            shore_below: 0.35,
            land_below: 0.70,
            highland_below: 0.75,
        }
    }
}

/// Complete tiling of the square world, stored column-major (x outer, y inner).
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    pub tile_size: f32,
    pub cols: usize,
    pub rows: usize,
    tiles: Vec<TerrainTile>,
}

impl TerrainGrid {
    pub fn generate(noise: &NoiseField, map_size: f32, tile_size: f32) -> Self {
        Self::generate_with(noise, map_size, tile_size, TerrainTuning::default())
    }

    pub fn generate_with(
        noise: &NoiseField,
        map_size: f32,
        tile_size: f32,
        tuning: TerrainTuning,
    ) -> Self {
        let cols = (map_size / tile_size).ceil() as usize;
        let rows = cols;
        let mut tiles = Vec::with_capacity(cols * rows);

        for col in 0..cols {
            for row in 0..rows {
                let x = col as f32 * tile_size;
                let y = row as f32 * tile_size;
                let (biome, speed_modifier) = classify(noise, x as f64, y as f64, &tuning);
                tiles.push(TerrainTile {
                    x,
                    y,
                    size: tile_size,
                    biome,
                    speed_modifier,
                });
            }
        }

        Self {
            tile_size,
            cols,
            rows,
            tiles,
        }
    }

    pub fn tiles(&self) -> &[TerrainTile] {
        &self.tiles
    }

    fn index_of(&self, x: f32, y: f32) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.tile_size).floor() as usize;
        let row = (y / self.tile_size).floor() as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(col * self.rows + row)
    }

    pub fn tile_at(&self, x: f32, y: f32) -> Option<&TerrainTile> {
        self.index_of(x, y).map(|i| &self.tiles[i])
    }

    pub fn tile_at_mut(&mut self, x: f32, y: f32) -> Option<&mut TerrainTile> {
        self.index_of(x, y).map(|i| &mut self.tiles[i])
    }

    /// Fraction of grass samples over the rectangle, sampled on the tile lattice.
    pub fn grass_ratio(&self, area: Rect) -> f32 {
        let mut total = 0u32;
        let mut grass = 0u32;

        let mut x = area.x;
        while x < area.x + area.width {
            let mut y = area.y;
            while y < area.y + area.height {
                if let Some(tile) = self.tile_at(x, y) {
                    total += 1;
                    if tile.biome == Biome::Grass {
                        grass += 1;
                    }
                }
                y += self.tile_size;
            }
            x += self.tile_size;
        }

        if total == 0 {
            0.0
        } else {
            grass as f32 / total as f32
        }
    }

    /// Turns the tile under the point into road unless it is water.
    pub fn pave(&mut self, x: f32, y: f32, speed_modifier: f32) -> bool {
        match self.tile_at_mut(x, y) {
            Some(tile) if tile.biome != Biome::Water => {
                tile.biome = Biome::Road;
                tile.speed_modifier = speed_modifier;
                true
            }
            _ => false,
        }
    }
}

fn classify(noise: &NoiseField, x: f64, y: f64, tuning: &TerrainTuning) -> (Biome, f32) {
    let base: f64 = tuning
        .octaves
        .iter()
        .map(|(scale, weight)| noise.unit(x * scale, y * scale) * weight)
        .sum();

    let moisture = noise.unit(
        x * tuning.moisture_scale + tuning.moisture_offset,
        y * tuning.moisture_scale + tuning.moisture_offset,
    );

    if base < tuning.water_below {
        (Biome::Water, 0.4)
    } else if base < tuning.shore_below {
        (Biome::Mud, 0.6)
    } else if base < tuning.land_below {
        if moisture > tuning.forest_moisture {
            (Biome::Forest, 0.8)
        } else {
            (Biome::Grass, 1.0)
        }
    } else if base < tuning.highland_below {
        (Biome::Mud, 0.7)
    } else {
        (Biome::Forest, 0.8)
    }
}
