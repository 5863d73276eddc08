use glam::Vec2;

use crate::player::{MoveDirection, SpinDirection};

bitflags::bitflags! {
    /// Abstract game actions. The host driver maps its real key bindings
    /// onto these before each frame; the core never sees raw key codes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TankInput: u16 {
        const FORWARD = 1 << 0;
        const REVERSE = 1 << 1;
        const ROTATE_LEFT = 1 << 2;
        const ROTATE_RIGHT = 1 << 3;
        const FIRE = 1 << 4;
        const SCORE = 1 << 5;
        const MINIMAP = 1 << 6;
        const HELP = 1 << 7;
        const CAMERA = 1 << 8;
        const MENU = 1 << 9;
        const CHAT = 1 << 10;
    }
}

/// One frame's worth of sampled input. `held` is level state, `pressed` is
/// the rising edge for this frame only. `chat_line` carries a committed chat
/// entry, already collected by the host's text input.
#[derive(Debug, Clone, Default)]
pub struct InputSample {
    pub held: TankInput,
    pub pressed: TankInput,
    pub aim: Vec2,
    pub chat_line: Option<String>,
}

impl InputSample {
    /// Forward wins over reverse when both are held.
    pub fn move_intent(&self) -> MoveDirection {
        if self.held.contains(TankInput::FORWARD) {
            MoveDirection::Forward
        } else if self.held.contains(TankInput::REVERSE) {
            MoveDirection::Reverse
        } else {
            MoveDirection::None
        }
    }

    /// Right wins over left when both are held.
    pub fn spin_intent(&self) -> SpinDirection {
        if self.held.contains(TankInput::ROTATE_RIGHT) {
            SpinDirection::Right
        } else if self.held.contains(TankInput::ROTATE_LEFT) {
            SpinDirection::Left
        } else {
            SpinDirection::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_precedence() {
        let mut sample = InputSample::default();
        assert_eq!(sample.move_intent(), MoveDirection::None);

        sample.held = TankInput::FORWARD | TankInput::REVERSE;
        assert_eq!(sample.move_intent(), MoveDirection::Forward);

        sample.held = TankInput::ROTATE_LEFT | TankInput::ROTATE_RIGHT;
        assert_eq!(sample.spin_intent(), SpinDirection::Right);
    }
}
