#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glam::Vec2;

use salvo::{
    AssetError, CameraMode, EntityHandle, EntityKind, GameMode, LoginCallback, MapData,
    MoveDirection, Options, PlayerId, PurgeStats, ResourceCache, SceneService, ScoreRow,
    ServerInfo, Session, SessionError, SessionSink, SpinDirection, StateContext, TankProfile,
    Team, TileData,
};

/// Session double. Serves a configurable map payload and records every
/// outbound call so tests can count sends.
pub struct MockSession {
    pub connected: AtomicBool,
    pub fail_connect: bool,
    pub map_name: String,
    /// Payload served by `download_map`.
    pub map_bytes: Vec<u8>,
    /// The authoritative content hash reported as valid.
    pub server_crc: u32,
    pub sinks: Mutex<Vec<Arc<dyn SessionSink>>>,
    pub moves: Mutex<Vec<(Vec2, MoveDirection)>>,
    pub rotates: Mutex<Vec<(f32, SpinDirection)>>,
    pub chats: Mutex<Vec<String>>,
    pub shots: AtomicUsize,
    pub charges: AtomicUsize,
    pub downloads: AtomicUsize,
    pub ready_signals: AtomicUsize,
    pub tanks: Vec<TankProfile>,
    pub servers: Vec<ServerInfo>,
}

impl MockSession {
    pub fn new(map: &MapData) -> Self {
        let bytes = map.encode().unwrap();
        let crc = crc32fast::hash(&bytes);
        Self {
            connected: AtomicBool::new(false),
            fail_connect: false,
            map_name: map.filename.clone(),
            map_bytes: bytes,
            server_crc: crc,
            sinks: Mutex::new(Vec::new()),
            moves: Mutex::new(Vec::new()),
            rotates: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
            shots: AtomicUsize::new(0),
            charges: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            ready_signals: AtomicUsize::new(0),
            tanks: vec![profile()],
            servers: vec![server_info()],
        }
    }

    pub fn refusing_connections(map: &MapData) -> Self {
        Self {
            fail_connect: true,
            ..Self::new(map)
        }
    }

    pub fn move_count(&self) -> usize {
        self.moves.lock().unwrap().len()
    }

    pub fn rotate_count(&self) -> usize {
        self.rotates.lock().unwrap().len()
    }

    pub fn clear_traffic(&self) {
        self.moves.lock().unwrap().clear();
        self.rotates.lock().unwrap().clear();
        self.chats.lock().unwrap().clear();
        self.shots.store(0, Ordering::SeqCst);
        self.charges.store(0, Ordering::SeqCst);
    }
}

impl Session for MockSession {
    fn connect(&self, _server: &ServerInfo) -> Result<(), SessionError> {
        if self.fail_connect {
            return Err(SessionError::Connect(String::from("refused")));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn local_id(&self) -> PlayerId {
        1
    }

    fn login(&self, _username: &str, _password: &str, done: LoginCallback) {
        std::thread::spawn(move || done(Ok(())));
    }

    fn register_sink(&self, sink: Arc<dyn SessionSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    fn clear_sinks(&self) {
        self.sinks.lock().unwrap().clear();
    }

    fn signal_ready(&self) {
        self.ready_signals.fetch_add(1, Ordering::SeqCst);
    }

    fn send_chat(&self, message: &str) {
        self.chats.lock().unwrap().push(message.to_string());
    }

    fn send_move(&self, position: Vec2, direction: MoveDirection) {
        self.moves.lock().unwrap().push((position, direction));
    }

    fn send_rotate(&self, angle: f32, direction: SpinDirection) {
        self.rotates.lock().unwrap().push((angle, direction));
    }

    fn start_charging(&self) {
        self.charges.fetch_add(1, Ordering::SeqCst);
    }

    fn fire(&self, _target: Vec2) {
        self.shots.fetch_add(1, Ordering::SeqCst);
    }

    fn current_map_name(&self) -> Result<String, SessionError> {
        Ok(self.map_name.clone())
    }

    fn map_hash_valid(&self, _map_name: &str, crc: u32) -> Result<bool, SessionError> {
        Ok(crc == self.server_crc)
    }

    fn download_map(&self, _map_name: &str) -> Result<Vec<u8>, SessionError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.map_bytes.clone())
    }

    fn time_left_secs(&self) -> f64 {
        90.0
    }

    fn game_mode(&self) -> GameMode {
        GameMode::Deathmatch
    }

    fn scoreboard(&self) -> Vec<ScoreRow> {
        vec![ScoreRow {
            name: String::from("gunner"),
            team: Team::None,
            kills: 0,
            deaths: 0,
            score: 0,
        }]
    }

    fn server_list(&self) -> Result<Vec<ServerInfo>, SessionError> {
        Ok(self.servers.clone())
    }

    fn tank_list(&self) -> Result<Vec<TankProfile>, SessionError> {
        Ok(self.tanks.clone())
    }

    fn create_tank(&self, _profile: &TankProfile) -> Result<(), SessionError> {
        Ok(())
    }

    fn update_tank(&self, _original_name: &str, _profile: &TankProfile) -> Result<(), SessionError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MockScene {
    next_handle: AtomicU32,
    pub live_entities: Mutex<Vec<EntityHandle>>,
    pub clears: AtomicUsize,
}

impl SceneService for MockScene {
    fn add_entity(&self, _kind: EntityKind, _position: Vec2) -> EntityHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live_entities.lock().unwrap().push(handle);
        handle
    }

    fn remove_entity(&self, handle: EntityHandle) {
        self.live_entities.lock().unwrap().retain(|&h| h != handle);
    }

    fn clear(&self) {
        self.live_entities.lock().unwrap().clear();
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn switch_camera(&self, _mode: CameraMode) {}

    fn set_camera_locked(&self, _locked: bool) {}
}

#[derive(Default)]
pub struct MockResources {
    pub preloads: Mutex<Vec<String>>,
    pub purges: AtomicUsize,
}

impl ResourceCache for MockResources {
    fn preload_model(&self, path: &str) -> Result<(), AssetError> {
        self.preloads.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn preload_texture(&self, path: &str) -> Result<(), AssetError> {
        self.preloads.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn purge(&self) -> PurgeStats {
        self.purges.fetch_add(1, Ordering::SeqCst);
        PurgeStats::default()
    }

    fn count(&self) -> usize {
        self.preloads.lock().unwrap().len()
    }
}

/// Open arena of the given size with a solid border and extra wall tiles at
/// the listed coordinates.
pub fn arena(width: u32, height: u32, walls: &[(u32, u32)]) -> MapData {
    let mut tiles = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if border || walls.contains(&(x, y)) {
                tiles.push(TileData::wall(9, 1));
            } else {
                tiles.push(TileData::floor(1));
            }
        }
    }
    MapData {
        title: String::from("test arena"),
        filename: String::from("test_arena.map"),
        width,
        height,
        game_modes: vec![0],
        tiles,
    }
}

pub fn profile() -> TankProfile {
    TankProfile {
        name: String::from("gunner"),
        ..TankProfile::default()
    }
}

pub fn server_info() -> ServerInfo {
    ServerInfo {
        name: String::from("test server"),
        host: String::from("127.0.0.1"),
        port: 0,
        players: 0,
        capacity: 16,
        map_name: String::from("test_arena.map"),
    }
}

/// Fresh per-test scratch directory under the system temp dir.
pub fn temp_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let dir = std::env::temp_dir().join(format!(
        "salvo-test-{}-{}-{}",
        tag,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A context wired to the given session with scratch map directories.
pub fn test_ctx(session: Arc<MockSession>, tag: &str) -> StateContext {
    let mut options = Options::default();
    options.maps_dir = temp_dir(tag);
    options.fallback_maps_dir = temp_dir(&format!("{}-fallback", tag));
    StateContext::new(
        session,
        Arc::new(MockScene::default()),
        Arc::new(MockResources::default()),
        options,
    )
}
