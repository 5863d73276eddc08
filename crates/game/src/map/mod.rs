mod data;
mod store;

pub use data::{MapData, TileData};
pub use store::MapStore;

use glam::Vec2;
use rkyv::rancor;

use crate::session::SessionError;

/// World-unit edge length of one tile.
pub const TILE_SIZE: f32 = 64.0;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map io: {0}")]
    Io(#[from] std::io::Error),
    #[error("map encode failed: {0}")]
    Encode(rancor::Error),
    #[error("map decode failed: {0}")]
    Decode(rancor::Error),
    #[error("no map is currently being played")]
    NoActiveMap,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Axis-aligned bounds of a single tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl TileBounds {
    pub fn of_tile(x: u32, y: u32) -> Self {
        let min = Vec2::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);
        Self {
            min,
            max: min + Vec2::splat(TILE_SIZE),
        }
    }

    /// Circle-vs-box test via the closest point on the box.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        center.distance_squared(closest) <= radius * radius
    }
}

/// A parsed, queryable map. Wraps the wire payload with grid lookups used by
/// collision detection and projectile culling.
#[derive(Debug, Clone)]
pub struct Map {
    data: MapData,
}

impl Map {
    pub fn new(data: MapData) -> Self {
        Self { data }
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn filename(&self) -> &str {
        &self.data.filename
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    pub fn game_modes(&self) -> &[u8] {
        &self.data.game_modes
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<&TileData> {
        if x >= self.data.width || y >= self.data.height {
            return None;
        }
        self.data.tiles.get((y * self.data.width + x) as usize)
    }

    /// Out-of-bounds coordinates count as impassable.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.tile(x as u32, y as u32)
            .map(|tile| tile.passable)
            .unwrap_or(false)
    }

    /// World-space center of the map, used as the fallback spawn point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.data.width as f32 * TILE_SIZE / 2.0,
            self.data.height as f32 * TILE_SIZE / 2.0,
        )
    }

    pub fn tile_at_world(&self, position: Vec2) -> Option<(u32, u32)> {
        let x = (position.x / TILE_SIZE).floor();
        let y = (position.y / TILE_SIZE).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        (x < self.data.width && y < self.data.height).then_some((x, y))
    }
}
