use glam::Vec2;

use crate::player::{MoveDirection, PlayerId, SpinDirection};
use crate::session::Team;

/// One variant per kind of server-pushed notification. Events are built on
/// whatever thread the transport delivers callbacks on, buffered, and
/// applied exactly once on the logical thread.
#[derive(Debug, Clone)]
pub enum GameEvent {
    ChatMessage {
        from: String,
        text: String,
    },
    PlayerJoined {
        id: PlayerId,
        name: String,
        team: Team,
        position: Vec2,
        angle: f32,
    },
    PlayerLeft {
        id: PlayerId,
    },
    PlayerMoved {
        id: PlayerId,
        position: Vec2,
        direction: MoveDirection,
    },
    PlayerRotated {
        id: PlayerId,
        angle: f32,
        direction: SpinDirection,
    },
    PlayerDamaged {
        target: PlayerId,
        attacker: PlayerId,
        damage: i32,
        killed: bool,
    },
    PlayerRespawned {
        id: PlayerId,
        position: Vec2,
    },
    ProjectileFired {
        id: u32,
        owner: PlayerId,
        origin: Vec2,
        target: Vec2,
    },
    ResetPosition {
        position: Vec2,
    },
    RotateMap,
    RoundTimeSync {
        seconds_left: f64,
    },
}

impl GameEvent {
    /// Chat is the only event kind still delivered while the end-of-round
    /// rotation window narrows gameplay updates.
    pub fn is_chat(&self) -> bool {
        matches!(self, Self::ChatMessage { .. })
    }
}

/// Why applying a single event failed. A failed event is logged and dropped;
/// it never aborts the rest of the frame's batch.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event references unknown player {0}")]
    UnknownPlayer(PlayerId),
}
