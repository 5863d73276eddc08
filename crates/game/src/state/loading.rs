use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::event::EventBuffer;
use crate::map::{Map, MapError, MapStore};
use crate::player::WeaponSpec;
use crate::service::{ResourceCache, SceneService};
use crate::session::{EventRelay, ServerInfo, Session, SessionError, TankProfile};

use super::{GamePlayState, ServerListState, State, StateContext, Transition, UiCommand};

const SKIN_DIR: &str = "tanks/skins";
const UTILITY_MODELS: [&str; 4] = [
    "powerups/health",
    "powerups/shield",
    "powerups/speed",
    "powerups/rapid_fire",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Error,
}

/// The loader's progress record. One struct behind one lock, swapped as a
/// unit, so the logical thread always reads a consistent
/// (phase, value, message) triple.
#[derive(Debug, Clone)]
pub struct LoadProgress {
    pub phase: LoadPhase,
    pub value: u8,
    pub message: String,
    pub error: Option<String>,
}

impl Default for LoadProgress {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Loading,
            value: 0,
            message: String::new(),
            error: None,
        }
    }
}

/// Cooperative cancellation flag, checked at every blocking-step boundary of
/// the loader. Cancelling makes the worker unwind silently; it never reports
/// an error.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct LoaderShared {
    progress: Mutex<LoadProgress>,
    game: Mutex<Option<GamePlayState>>,
}

impl LoaderShared {
    fn new() -> Self {
        Self {
            progress: Mutex::new(LoadProgress::default()),
            game: Mutex::new(None),
        }
    }

    fn publish(&self, value: u8, message: &str) {
        let mut progress = self.progress.lock().unwrap();
        progress.value = value;
        progress.message = String::from(message);
    }

    fn ready(&self) {
        self.progress.lock().unwrap().phase = LoadPhase::Ready;
    }

    fn fail(&self, message: String) {
        let mut progress = self.progress.lock().unwrap();
        progress.phase = LoadPhase::Error;
        progress.error = Some(message);
    }

    fn snapshot(&self) -> LoadProgress {
        self.progress.lock().unwrap().clone()
    }
}

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Map(#[from] MapError),
}

impl LoadError {
    fn user_message(&self) -> String {
        match self {
            LoadError::Session(e) => format!("Cannot connect:\n{}", e),
            LoadError::Map(e) => format!("Cannot load map:\n{}", e),
        }
    }
}

/// The screen between server select and gameplay. A worker thread runs the
/// load protocol (cleanup → connect → map resolution → asset preload) and
/// publishes progress; this state polls it every frame and transitions on
/// the outcome.
pub struct LoadingState {
    profile: TankProfile,
    server: ServerInfo,
    shared: Arc<LoaderShared>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
    shown_message: String,
}

impl LoadingState {
    pub fn new(profile: TankProfile, server: ServerInfo) -> Self {
        Self {
            profile,
            server,
            shared: Arc::new(LoaderShared::new()),
            cancel: CancelToken::new(),
            worker: None,
            shown_message: String::new(),
        }
    }

    pub fn progress(&self) -> LoadProgress {
        self.shared.snapshot()
    }
}

impl State for LoadingState {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn load_content(&mut self, ctx: &mut StateContext) {
        let deps = LoaderDeps {
            session: Arc::clone(&ctx.session),
            scene: Arc::clone(&ctx.scene),
            resources: Arc::clone(&ctx.resources),
            store: MapStore::from_options(&ctx.options),
            profile: self.profile.clone(),
            server: self.server.clone(),
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
        };

        let spawned = thread::Builder::new()
            .name(String::from("loader"))
            .spawn(move || run_loader(deps));
        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => self.shared.fail(format!("cannot start loader: {}", e)),
        }
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Transition {
        while let Some(command) = ctx.ui.pop_front() {
            match command {
                UiCommand::CancelLoading | UiCommand::Back => {
                    log::info!("loading cancelled");
                    self.cancel.cancel();
                    return Some(Box::new(ServerListState::new(self.profile.clone())));
                }
                UiCommand::Quit => ctx.exit = true,
                _ => {}
            }
        }

        let progress = self.shared.snapshot();
        match progress.phase {
            LoadPhase::Error => {
                let message = progress
                    .error
                    .unwrap_or_else(|| String::from("loading failed"));
                Some(Box::new(ServerListState::with_error(
                    self.profile.clone(),
                    message,
                )))
            }
            LoadPhase::Ready => match self.shared.game.lock().unwrap().take() {
                Some(game) => Some(Box::new(game)),
                None => {
                    // Ready without a game means the slot was consumed once
                    // already; treat as a failed load.
                    Some(Box::new(ServerListState::with_error(
                        self.profile.clone(),
                        String::from("loader produced no game"),
                    )))
                }
            },
            LoadPhase::Loading => {
                if progress.message != self.shown_message {
                    log::info!("loading {}%: {}", progress.value, progress.message);
                    self.shown_message = progress.message;
                }
                None
            }
        }
    }

    fn unload_content(&mut self, _ctx: &mut StateContext) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            // Bounded by the next cancellation checkpoint in the worker.
            if worker.join().is_err() {
                log::error!("loader thread panicked");
            }
        }
    }
}

struct LoaderDeps {
    session: Arc<dyn Session>,
    scene: Arc<dyn SceneService>,
    resources: Arc<dyn ResourceCache>,
    store: MapStore,
    profile: TankProfile,
    server: ServerInfo,
    shared: Arc<LoaderShared>,
    cancel: CancelToken,
}

fn run_loader(deps: LoaderDeps) {
    match load(&deps) {
        Ok(Some(game)) => {
            *deps.shared.game.lock().unwrap() = Some(game);
            deps.shared.ready();
        }
        Ok(None) => log::debug!("loader cancelled"),
        Err(e) => {
            log::error!("loading failed: {}", e);
            deps.shared.fail(e.user_message());
        }
    }
}

/// The ordered load protocol. `Ok(None)` means cancelled: unwind silently
/// without publishing a terminal phase.
fn load(deps: &LoaderDeps) -> Result<Option<GamePlayState>, LoadError> {
    deps.shared.publish(0, "Cleaning up unused resources...");
    let stats = deps.resources.purge();
    log::debug!(
        "resource purge: {} -> {} objects, {} KiB freed",
        stats.objects_before,
        stats.objects_after,
        stats.bytes_freed / 1024
    );
    if deps.cancel.is_cancelled() {
        return Ok(None);
    }

    deps.shared.publish(10, "Establishing connection...");
    let buffer = Arc::new(EventBuffer::new());
    let relay = Arc::new(EventRelay::new(Arc::clone(&buffer)));
    if !deps.session.is_connected() {
        deps.session.connect(&deps.server)?;
    }
    // The socket survives map rotation; only the callback set is refreshed.
    deps.session.clear_sinks();
    deps.session.register_sink(relay.clone());

    let map_name = deps.session.current_map_name()?;
    if deps.cancel.is_cancelled() {
        return Ok(None);
    }

    deps.shared
        .publish(20, &format!("Loading map {}...", map_name));
    let map = deps.store.resolve(deps.session.as_ref(), &map_name)?;
    if deps.cancel.is_cancelled() {
        return Ok(None);
    }

    deps.shared.publish(30, "Loading game resources...");
    deps.scene.clear();
    if !preload_assets(deps, &map) {
        return Ok(None);
    }

    deps.shared.publish(100, "Starting game...");
    let game = GamePlayState::new(
        Arc::new(map),
        buffer,
        relay,
        deps.profile.clone(),
        deps.server.clone(),
        deps.session.local_id(),
        deps.session.game_mode(),
        deps.session.time_left_secs(),
    );
    Ok(Some(game))
}

/// Preload everything gameplay touches. A missing asset is logged and
/// skipped (the cache substitutes a placeholder); only cancellation stops
/// the pass. Returns false when cancelled.
fn preload_assets(deps: &LoaderDeps, map: &Map) -> bool {
    deps.shared.publish(40, "Loading tile textures...");
    let mut tile_ids: Vec<u16> = (0..map.height())
        .flat_map(|y| (0..map.width()).map(move |x| (x, y)))
        .filter_map(|(x, y)| map.tile(x, y).map(|tile| tile.id))
        .collect();
    tile_ids.sort_unstable();
    tile_ids.dedup();
    for id in tile_ids {
        preload_texture(deps, &format!("textures/tiles/{:03}", id));
    }
    if deps.cancel.is_cancelled() {
        return false;
    }

    deps.shared.publish(50, "Loading tank models...");
    preload_model(deps, &format!("tanks/{}", deps.profile.model));

    deps.shared.publish(60, "Loading weapon models...");
    let weapons = WeaponSpec::standard_set();
    for spec in &weapons {
        preload_model(deps, &spec.model);
    }

    deps.shared.publish(70, "Loading projectile models...");
    for spec in &weapons {
        preload_model(deps, &spec.projectile_model);
    }
    if deps.cancel.is_cancelled() {
        return false;
    }

    deps.shared.publish(80, "Loading utility models...");
    for model in UTILITY_MODELS {
        preload_model(deps, model);
    }

    deps.shared.publish(95, "Loading tank skins...");
    preload_texture(deps, &format!("{}/{}", SKIN_DIR, deps.profile.skin));

    !deps.cancel.is_cancelled()
}

fn preload_model(deps: &LoaderDeps, path: &str) {
    if let Err(e) = deps.resources.preload_model(path) {
        log::warn!("{}, using placeholder", e);
    }
}

fn preload_texture(deps: &LoaderDeps, path: &str) {
    if let Err(e) = deps.resources.preload_texture(path) {
        log::warn!("{}, using placeholder", e);
    }
}
