pub mod event;
pub mod input;
pub mod map;
pub mod options;
pub mod player;
pub mod service;
pub mod session;
pub mod state;
pub mod timestep;

pub use event::{EventBuffer, EventError, GameEvent, Invocation, InvocationBuffer};
pub use input::{InputSample, TankInput};
pub use map::{Map, MapData, MapError, MapStore, TILE_SIZE, TileBounds, TileData};
pub use options::Options;
pub use player::{
    BoundingCircle, FireMode, MoveDirection, OverheatSpec, PlayerId, PlayerRoster, PlayerTank,
    SpinDirection, WeaponSpec, WeaponState,
};
pub use service::{
    AssetError, CameraMode, EntityHandle, EntityKind, PurgeStats, ResourceCache, SceneService,
};
pub use session::{
    EventRelay, GameMode, InvalidProfile, LoginCallback, ScoreRow, ServerInfo, Session,
    SessionError, SessionSink, TankProfile, Team,
};
pub use state::{
    CancelToken, ChatEntry, EditTankState, GamePlayState, LoadPhase, LoadProgress, LoadingState,
    LoginState, ServerListState, State, StateContext, StateManager, TankCreationState,
    TankListState, Transition, UiCommand,
};
pub use timestep::FixedTimestep;
