use glam::Vec2;

use crate::service::EntityHandle;
use crate::session::{TankProfile, Team};

use super::{PlayerId, WeaponSpec, WeaponState};

pub const TANK_VELOCITY: f32 = 275.0;
pub const TANK_ANGULAR_VELOCITY: f32 = 2.666_666_7;
pub const TANK_MAX_HEALTH: i32 = 100;

const FRONT_CIRCLE_OFFSET: f32 = 20.0;
const FRONT_CIRCLE_RADIUS: f32 = 26.0;
const BACK_CIRCLE_OFFSET: f32 = 18.0;
const BACK_CIRCLE_RADIUS: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    #[default]
    None,
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinDirection {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundingCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// A tank in the current round: profile-derived stats plus the locally
/// predicted pose and trigger state. Remote tanks advance on the same
/// prediction code; the server corrects them through move/rotate events.
#[derive(Debug, Clone)]
pub struct PlayerTank {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub position: Vec2,
    pub angle: f32,
    pub move_direction: MoveDirection,
    pub spin_direction: SpinDirection,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub speed_factor: f32,
    pub armor_factor: f32,
    /// Rate-of-fire buff fraction in [0, 1).
    pub rate_of_fire: f32,
    pub previously_collided: bool,
    pub entity: Option<EntityHandle>,
    pub weapon: WeaponSpec,
    pub weapon_state: WeaponState,
}

impl PlayerTank {
    pub fn new(
        id: PlayerId,
        name: String,
        team: Team,
        position: Vec2,
        angle: f32,
        weapon: WeaponSpec,
    ) -> Self {
        Self {
            id,
            name,
            team,
            position,
            angle,
            move_direction: MoveDirection::None,
            spin_direction: SpinDirection::None,
            health: TANK_MAX_HEALTH,
            max_health: TANK_MAX_HEALTH,
            alive: true,
            speed_factor: 1.0,
            armor_factor: 1.0,
            rate_of_fire: 0.0,
            previously_collided: false,
            entity: None,
            weapon,
            weapon_state: WeaponState::new(),
        }
    }

    pub fn from_profile(
        id: PlayerId,
        profile: &TankProfile,
        team: Team,
        position: Vec2,
    ) -> Self {
        let weapon = WeaponSpec::by_name(&profile.weapon);
        let max_health = (TANK_MAX_HEALTH as f32 * profile.armor_factor) as i32;
        Self {
            name: profile.name.clone(),
            speed_factor: profile.speed_factor,
            armor_factor: profile.armor_factor,
            health: max_health,
            max_health,
            ..Self::new(id, String::new(), team, position, 0.0, weapon)
        }
    }

    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    pub fn front_circle(&self) -> BoundingCircle {
        BoundingCircle {
            center: self.position + self.heading() * FRONT_CIRCLE_OFFSET,
            radius: FRONT_CIRCLE_RADIUS,
        }
    }

    pub fn back_circle(&self) -> BoundingCircle {
        BoundingCircle {
            center: self.position - self.heading() * BACK_CIRCLE_OFFSET,
            radius: BACK_CIRCLE_RADIUS,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.move_direction != MoveDirection::None
    }

    /// One prediction step: rotation first, then translation along the new
    /// heading. Dead tanks stay put.
    pub fn advance(&mut self, dt: f32) {
        if !self.alive {
            return;
        }

        let spin = match self.spin_direction {
            SpinDirection::None => 0.0,
            SpinDirection::Left => 1.0,
            SpinDirection::Right => -1.0,
        };
        self.angle += spin * TANK_ANGULAR_VELOCITY * dt;

        let step = match self.move_direction {
            MoveDirection::None => 0.0,
            MoveDirection::Forward => 1.0,
            MoveDirection::Reverse => -1.0,
        };
        if step != 0.0 {
            self.position += self.heading() * (step * TANK_VELOCITY * self.speed_factor * dt);
        }
    }

    pub fn can_fire(&self) -> bool {
        self.alive && self.weapon_state.can_fire(&self.weapon, self.rate_of_fire)
    }

    pub fn record_shot(&mut self) {
        self.weapon_state.on_fired(&self.weapon);
    }

    pub fn update_weapon(&mut self, dt: f32) {
        self.weapon_state.update(&self.weapon, dt);
    }

    /// Returns true when this damage killed the tank.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.health = 0;
            self.alive = false;
            self.move_direction = MoveDirection::None;
            self.spin_direction = SpinDirection::None;
            return true;
        }
        false
    }

    pub fn respawn(&mut self, position: Vec2) {
        self.health = self.max_health;
        self.alive = true;
        self.position = position;
        self.move_direction = MoveDirection::None;
        self.spin_direction = SpinDirection::None;
        self.weapon_state = WeaponState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> PlayerTank {
        PlayerTank::new(
            1,
            String::from("t"),
            Team::Red,
            Vec2::new(100.0, 100.0),
            0.0,
            WeaponSpec::by_name("cannon"),
        )
    }

    #[test]
    fn advance_moves_along_heading() {
        let mut tank = tank();
        tank.move_direction = MoveDirection::Forward;
        tank.advance(1.0);
        assert!((tank.position.x - (100.0 + TANK_VELOCITY)).abs() < 0.01);
        assert!((tank.position.y - 100.0).abs() < 0.01);

        tank.move_direction = MoveDirection::Reverse;
        tank.advance(1.0);
        assert!((tank.position.x - 100.0).abs() < 0.01);
    }

    #[test]
    fn dead_tanks_do_not_move() {
        let mut tank = tank();
        tank.move_direction = MoveDirection::Forward;
        assert!(tank.apply_damage(tank.max_health));
        assert!(!tank.alive);
        assert_eq!(tank.move_direction, MoveDirection::None);

        let before = tank.position;
        tank.move_direction = MoveDirection::Forward;
        tank.advance(1.0);
        assert_eq!(tank.position, before);

        tank.respawn(Vec2::ZERO);
        assert!(tank.alive);
        assert_eq!(tank.health, tank.max_health);
    }

    #[test]
    fn collision_circles_straddle_the_hull() {
        let tank = tank();
        let front = tank.front_circle();
        let back = tank.back_circle();
        assert!(front.center.x > tank.position.x);
        assert!(back.center.x < tank.position.x);
    }

    #[test]
    fn profile_scales_health_and_speed() {
        let profile = TankProfile {
            name: String::from("brick"),
            armor_factor: 1.5,
            speed_factor: 0.5,
            ..TankProfile::default()
        };
        let tank = PlayerTank::from_profile(7, &profile, Team::Blue, Vec2::ZERO);
        assert_eq!(tank.max_health, 150);
        assert_eq!(tank.speed_factor, 0.5);
        assert_eq!(tank.name, "brick");
    }
}
