mod relay;
mod types;

pub use relay::EventRelay;
pub use types::{
    GameMode, InvalidProfile, MAX_TANK_NAME_LEN, ScoreRow, ServerInfo, TankProfile, Team,
};

use glam::Vec2;
use std::sync::Arc;

use crate::event::GameEvent;
use crate::player::{MoveDirection, PlayerId, SpinDirection};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot reach server: {0}")]
    Connect(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Completion callback for an asynchronous login attempt. Invoked on
/// whatever thread the transport uses; relay the result through the
/// invocation buffer before touching game state.
pub type LoginCallback = Box<dyn FnOnce(Result<(), SessionError>) + Send>;

/// Receives decoded server notifications. Implementations must tolerate
/// delivery from arbitrary transport threads.
pub trait SessionSink: Send + Sync {
    fn deliver(&self, event: GameEvent);
}

/// The session/transport layer. Blocking methods are called only from the
/// background loading thread or in direct response to user action; the
/// `send_*` family is fire-and-forget (transport failures are reported
/// through the sink, not the return path).
pub trait Session: Send + Sync {
    fn connect(&self, server: &ServerInfo) -> Result<(), SessionError>;
    fn disconnect(&self);
    fn is_connected(&self) -> bool;

    /// Entity id assigned to the local player for the current session.
    fn local_id(&self) -> PlayerId;

    fn login(&self, username: &str, password: &str, done: LoginCallback);

    fn register_sink(&self, sink: Arc<dyn SessionSink>);
    fn clear_sinks(&self);
    /// Tell the server the client finished loading and wants events.
    fn signal_ready(&self);

    fn send_chat(&self, message: &str);
    fn send_move(&self, position: Vec2, direction: MoveDirection);
    fn send_rotate(&self, angle: f32, direction: SpinDirection);
    fn start_charging(&self);
    fn fire(&self, target: Vec2);

    fn current_map_name(&self) -> Result<String, SessionError>;
    fn map_hash_valid(&self, map_name: &str, crc: u32) -> Result<bool, SessionError>;
    fn download_map(&self, map_name: &str) -> Result<Vec<u8>, SessionError>;

    fn time_left_secs(&self) -> f64;
    fn game_mode(&self) -> GameMode;
    fn scoreboard(&self) -> Vec<ScoreRow>;

    fn server_list(&self) -> Result<Vec<ServerInfo>, SessionError>;
    fn tank_list(&self) -> Result<Vec<TankProfile>, SessionError>;
    fn create_tank(&self, profile: &TankProfile) -> Result<(), SessionError>;
    fn update_tank(&self, original_name: &str, profile: &TankProfile) -> Result<(), SessionError>;
}
