mod roster;
mod tank;
mod weapon;

pub use roster::PlayerRoster;
pub use tank::{
    BoundingCircle, MoveDirection, PlayerTank, SpinDirection, TANK_ANGULAR_VELOCITY, TANK_VELOCITY,
};
pub use weapon::{FireMode, OverheatSpec, WeaponSpec, WeaponState};

pub type PlayerId = u32;
