use glam::Vec2;

use crate::input::TankInput;
use crate::map::{Map, TILE_SIZE, TileBounds};
use crate::player::{MoveDirection, PlayerTank};

/// Tiles beyond the viewport extent still scanned, so a fast tank cannot
/// clip a wall that just scrolled out of view.
const NEIGHBORHOOD_PAD: i32 = 3;

/// The local tank only collides in the direction actually being pressed:
/// the front circle blocks while the forward key is down, the back circle
/// while reverse is down. Releasing the key clears the collision.
pub(super) fn local_collision(
    map: &Map,
    tank: &PlayerTank,
    held: TankInput,
    viewport_tiles: (i32, i32),
) -> bool {
    let forward = held.contains(TankInput::FORWARD);
    let reverse = held.contains(TankInput::REVERSE);
    if !forward && !reverse {
        return false;
    }
    hits_impassable(map, tank, viewport_tiles, forward, reverse)
}

/// Remote tanks collide according to their predicted direction. Purely
/// cosmetic smoothing; the caller halts local prediction and sends nothing.
pub(super) fn remote_collision(
    map: &Map,
    tank: &PlayerTank,
    viewport_tiles: (i32, i32),
) -> bool {
    match tank.move_direction {
        MoveDirection::Forward => hits_impassable(map, tank, viewport_tiles, true, false),
        MoveDirection::Reverse => hits_impassable(map, tank, viewport_tiles, false, true),
        MoveDirection::None => false,
    }
}

fn hits_impassable(
    map: &Map,
    tank: &PlayerTank,
    viewport_tiles: (i32, i32),
    check_front: bool,
    check_back: bool,
) -> bool {
    let (min_x, min_y, max_x, max_y) = tile_range(map, tank.position, viewport_tiles);
    let front = tank.front_circle();
    let back = tank.back_circle();

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let Some(tile) = map.tile(x as u32, y as u32) else {
                continue;
            };
            if tile.passable {
                continue;
            }
            let bounds = TileBounds::of_tile(x as u32, y as u32);
            if check_front && bounds.intersects_circle(front.center, front.radius) {
                return true;
            }
            if check_back && bounds.intersects_circle(back.center, back.radius) {
                return true;
            }
        }
    }
    false
}

/// Clamped scan window around the tank's tile.
fn tile_range(map: &Map, position: Vec2, viewport_tiles: (i32, i32)) -> (i32, i32, i32, i32) {
    let reach_x = viewport_tiles.0 + NEIGHBORHOOD_PAD;
    let reach_y = viewport_tiles.1 + NEIGHBORHOOD_PAD;
    let tile_x = (position.x / TILE_SIZE) as i32;
    let tile_y = (position.y / TILE_SIZE) as i32;

    (
        (tile_x - reach_x).max(0),
        (tile_y - reach_y).max(0),
        (tile_x + reach_x).min(map.width() as i32 - 1),
        (tile_y + reach_y).min(map.height() as i32 - 1),
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::map::{MapData, TileData};
    use crate::player::WeaponSpec;
    use crate::session::Team;

    use super::*;

    /// 5x5 open arena with one wall tile at (3, 2).
    fn arena() -> Map {
        let mut tiles = vec![TileData::floor(1); 25];
        tiles[2 * 5 + 3] = TileData::wall(9, 1);
        Map::new(MapData {
            title: String::from("arena"),
            filename: String::from("arena.map"),
            width: 5,
            height: 5,
            game_modes: vec![0],
            tiles,
        })
    }

    fn tank_facing_wall() -> PlayerTank {
        // Tile (2, 2) center, facing +x toward the wall at (3, 2).
        PlayerTank::new(
            1,
            String::from("local"),
            Team::None,
            Vec2::new(2.0 * TILE_SIZE + 32.0, 2.0 * TILE_SIZE + 32.0),
            0.0,
            WeaponSpec::by_name("cannon"),
        )
    }

    #[test]
    fn front_collision_requires_forward_key() {
        let map = arena();
        let tank = tank_facing_wall();

        assert!(local_collision(&map, &tank, TankInput::FORWARD, (0, 0)));
        assert!(!local_collision(&map, &tank, TankInput::REVERSE, (0, 0)));
        assert!(!local_collision(&map, &tank, TankInput::empty(), (0, 0)));
    }

    #[test]
    fn remote_collision_follows_predicted_direction() {
        let map = arena();
        let mut tank = tank_facing_wall();

        tank.move_direction = MoveDirection::Forward;
        assert!(remote_collision(&map, &tank, (0, 0)));

        tank.move_direction = MoveDirection::Reverse;
        assert!(!remote_collision(&map, &tank, (0, 0)));

        tank.move_direction = MoveDirection::None;
        assert!(!remote_collision(&map, &tank, (0, 0)));
    }

    #[test]
    fn open_floor_never_collides() {
        let map = arena();
        let mut tank = tank_facing_wall();
        // Face away from the wall.
        tank.angle = std::f32::consts::PI;
        assert!(!local_collision(&map, &tank, TankInput::FORWARD, (0, 0)));
    }
}
