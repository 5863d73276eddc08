use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use glam::Vec2;

use salvo::{
    AssetError, CameraMode, EntityHandle, EntityKind, GameEvent, GameMode, LoginCallback, MapData,
    MoveDirection, PlayerId, PurgeStats, ResourceCache, SceneService, ScoreRow, ServerInfo,
    Session, SessionError, SessionSink, SpinDirection, TILE_SIZE, TankProfile, Team, TileData,
};

const ARENA_WIDTH: u32 = 24;
const ARENA_HEIGHT: u32 = 18;
const DRONE_ID: PlayerId = 2;

/// In-process stand-in for the real transport: serves a built-in arena map,
/// accepts every request, and echoes chat back through the registered sinks.
/// Lets the whole screen flow run without a server.
pub struct LoopbackSession {
    connected: AtomicBool,
    sinks: Mutex<Vec<Arc<dyn SessionSink>>>,
    map_name: String,
    map_bytes: Vec<u8>,
    map_crc: u32,
    moves: AtomicU32,
    rotates: AtomicU32,
    shots: AtomicU32,
}

impl LoopbackSession {
    pub fn new() -> anyhow::Result<Self> {
        let data = arena_map();
        let bytes = data.encode()?;
        let crc = crc32fast::hash(&bytes);
        Ok(Self {
            connected: AtomicBool::new(false),
            sinks: Mutex::new(Vec::new()),
            map_name: data.filename,
            map_bytes: bytes,
            map_crc: crc,
            moves: AtomicU32::new(0),
            rotates: AtomicU32::new(0),
            shots: AtomicU32::new(0),
        })
    }

    pub fn traffic_report(&self) -> String {
        format!(
            "{} moves, {} rotates, {} shots",
            self.moves.load(Ordering::Relaxed),
            self.rotates.load(Ordering::Relaxed),
            self.shots.load(Ordering::Relaxed)
        )
    }

    fn deliver(&self, event: GameEvent) {
        for sink in self.sinks.lock().unwrap().iter() {
            sink.deliver(event.clone());
        }
    }
}

impl Session for LoopbackSession {
    fn connect(&self, server: &ServerInfo) -> Result<(), SessionError> {
        log::info!("loopback connect to {}", server.name);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.sinks.lock().unwrap().clear();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn local_id(&self) -> PlayerId {
        1
    }

    fn login(&self, username: &str, _password: &str, done: LoginCallback) {
        // Complete on a separate thread like a real auth round-trip would.
        let username = username.to_string();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            log::debug!("loopback login for {}", username);
            done(Ok(()));
        });
    }

    fn register_sink(&self, sink: Arc<dyn SessionSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    fn clear_sinks(&self) {
        self.sinks.lock().unwrap().clear();
    }

    fn signal_ready(&self) {
        // Give the fresh round something to shoot at.
        self.deliver(GameEvent::PlayerJoined {
            id: DRONE_ID,
            name: String::from("target-drone"),
            team: Team::None,
            position: Vec2::new(
                ARENA_WIDTH as f32 * TILE_SIZE * 0.25,
                ARENA_HEIGHT as f32 * TILE_SIZE * 0.25,
            ),
            angle: 0.0,
        });
    }

    fn send_chat(&self, message: &str) {
        self.deliver(GameEvent::ChatMessage {
            from: String::from("echo"),
            text: message.to_string(),
        });
    }

    fn send_move(&self, _position: Vec2, _direction: MoveDirection) {
        self.moves.fetch_add(1, Ordering::Relaxed);
    }

    fn send_rotate(&self, _angle: f32, _direction: SpinDirection) {
        self.rotates.fetch_add(1, Ordering::Relaxed);
    }

    fn start_charging(&self) {}

    fn fire(&self, target: Vec2) {
        self.shots.fetch_add(1, Ordering::Relaxed);
        self.deliver(GameEvent::ProjectileFired {
            id: self.shots.load(Ordering::Relaxed),
            owner: 1,
            origin: target - Vec2::splat(TILE_SIZE),
            target,
        });
    }

    fn current_map_name(&self) -> Result<String, SessionError> {
        Ok(self.map_name.clone())
    }

    fn map_hash_valid(&self, _map_name: &str, crc: u32) -> Result<bool, SessionError> {
        Ok(crc == self.map_crc)
    }

    fn download_map(&self, _map_name: &str) -> Result<Vec<u8>, SessionError> {
        Ok(self.map_bytes.clone())
    }

    fn time_left_secs(&self) -> f64 {
        90.0
    }

    fn game_mode(&self) -> GameMode {
        GameMode::Deathmatch
    }

    fn scoreboard(&self) -> Vec<ScoreRow> {
        vec![
            ScoreRow {
                name: String::from("gunner"),
                team: Team::None,
                kills: 3,
                deaths: 1,
                score: 25,
            },
            ScoreRow {
                name: String::from("target-drone"),
                team: Team::None,
                kills: 1,
                deaths: 3,
                score: 5,
            },
        ]
    }

    fn server_list(&self) -> Result<Vec<ServerInfo>, SessionError> {
        Ok(vec![ServerInfo {
            name: String::from("loopback"),
            host: String::from("127.0.0.1"),
            port: 0,
            players: 1,
            capacity: 16,
            map_name: self.map_name.clone(),
        }])
    }

    fn tank_list(&self) -> Result<Vec<TankProfile>, SessionError> {
        Ok(vec![TankProfile {
            name: String::from("vanguard"),
            ..TankProfile::default()
        }])
    }

    fn create_tank(&self, profile: &TankProfile) -> Result<(), SessionError> {
        log::info!("loopback created tank {:?}", profile.name);
        Ok(())
    }

    fn update_tank(&self, original_name: &str, _profile: &TankProfile) -> Result<(), SessionError> {
        log::info!("loopback updated tank {:?}", original_name);
        Ok(())
    }
}

/// Bordered arena with a pillar block near the middle.
fn arena_map() -> MapData {
    let mut tiles = Vec::with_capacity((ARENA_WIDTH * ARENA_HEIGHT) as usize);
    for y in 0..ARENA_HEIGHT {
        for x in 0..ARENA_WIDTH {
            let border = x == 0 || y == 0 || x == ARENA_WIDTH - 1 || y == ARENA_HEIGHT - 1;
            let pillar = (8..=9).contains(&x) && (8..=9).contains(&y);
            if border || pillar {
                tiles.push(TileData::wall(7, 1));
            } else {
                tiles.push(TileData::floor(1));
            }
        }
    }
    MapData {
        title: String::from("Loopback Arena"),
        filename: String::from("loopback_arena.map"),
        width: ARENA_WIDTH,
        height: ARENA_HEIGHT,
        game_modes: vec![0],
        tiles,
    }
}

#[derive(Default)]
pub struct LoopbackScene {
    next_handle: AtomicU32,
    entities: Mutex<HashSet<EntityHandle>>,
}

impl SceneService for LoopbackScene {
    fn add_entity(&self, kind: EntityKind, position: Vec2) -> EntityHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.entities.lock().unwrap().insert(handle);
        log::debug!("scene add {:?} #{} at {:.0?}", kind, handle, position);
        handle
    }

    fn remove_entity(&self, handle: EntityHandle) {
        self.entities.lock().unwrap().remove(&handle);
    }

    fn clear(&self) {
        self.entities.lock().unwrap().clear();
    }

    fn switch_camera(&self, mode: CameraMode) {
        log::debug!("camera -> {:?}", mode);
    }

    fn set_camera_locked(&self, _locked: bool) {}
}

#[derive(Default)]
pub struct LoopbackResources {
    loaded: Mutex<HashSet<String>>,
}

impl ResourceCache for LoopbackResources {
    fn preload_model(&self, path: &str) -> Result<(), AssetError> {
        self.loaded.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    fn preload_texture(&self, path: &str) -> Result<(), AssetError> {
        self.loaded.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    fn purge(&self) -> PurgeStats {
        let mut loaded = self.loaded.lock().unwrap();
        let before = loaded.len();
        loaded.clear();
        PurgeStats {
            objects_before: before,
            objects_after: 0,
            bytes_freed: (before * 1024) as u64,
        }
    }

    fn count(&self) -> usize {
        self.loaded.lock().unwrap().len()
    }
}
