mod edit_tank;
mod gameplay;
mod loading;
mod login;
mod server_list;
mod tank_creation;
mod tank_list;

pub use edit_tank::EditTankState;
pub use gameplay::{ChatEntry, GamePlayState};
pub use loading::{CancelToken, LoadPhase, LoadProgress, LoadingState};
pub use login::LoginState;
pub use server_list::ServerListState;
pub use tank_creation::TankCreationState;
pub use tank_list::TankListState;

use std::collections::VecDeque;
use std::sync::Arc;

use crate::event::InvocationBuffer;
use crate::input::InputSample;
use crate::options::Options;
use crate::service::{ResourceCache, SceneService};
use crate::session::{Session, TankProfile};

/// Screen-level commands the host UI feeds into the active state each frame.
#[derive(Debug, Clone)]
pub enum UiCommand {
    SubmitLogin { username: String, password: String },
    SelectServer(usize),
    SelectTank(usize),
    CreateTank,
    EditTank(usize),
    SubmitTank(TankProfile),
    CancelLoading,
    Back,
    Quit,
}

/// Everything a state needs from the host, passed explicitly instead of
/// through a global service registry. The driver refills `input` and `ui`
/// before each frame and drains the invocation buffer before updating.
pub struct StateContext {
    pub session: Arc<dyn Session>,
    pub scene: Arc<dyn SceneService>,
    pub resources: Arc<dyn ResourceCache>,
    pub invocations: Arc<InvocationBuffer>,
    pub options: Options,
    pub input: InputSample,
    pub ui: VecDeque<UiCommand>,
    pub exit: bool,
}

impl StateContext {
    pub fn new(
        session: Arc<dyn Session>,
        scene: Arc<dyn SceneService>,
        resources: Arc<dyn ResourceCache>,
        options: Options,
    ) -> Self {
        Self {
            session,
            scene,
            resources,
            invocations: Arc::new(InvocationBuffer::new()),
            options,
            input: InputSample::default(),
            ui: VecDeque::new(),
            exit: false,
        }
    }
}

/// A requested state transition, applied by the manager right after the
/// returning state's `update` finishes.
pub type Transition = Option<Box<dyn State>>;

/// One screen of the client. Lifecycle:
/// `initialize` → `load_content` → (`update` | `draw`)* → `unload_content`.
pub trait State {
    fn name(&self) -> &'static str;

    /// Hosts occasionally need the concrete screen (progress readout,
    /// roster display); this is the downcast hook for that.
    fn as_any(&self) -> &dyn std::any::Any;

    fn initialize(&mut self, _ctx: &mut StateContext) {}

    /// Kick off any deferred loading. For most screens everything already
    /// happened in `initialize`; the loading screen starts its worker here.
    fn load_content(&mut self, _ctx: &mut StateContext) {}

    fn update(&mut self, ctx: &mut StateContext, dt: f32) -> Transition;

    fn draw(&self, _ctx: &StateContext) {}

    /// Must tolerate partially-initialized states and never panic.
    fn unload_content(&mut self, _ctx: &mut StateContext) {}
}

/// Holds exactly one live state and performs transitions. Owned by the
/// logical thread; transitions triggered from background work arrive as a
/// `Transition` out of `update`, never concurrently.
pub struct StateManager {
    current: Box<dyn State>,
}

impl StateManager {
    pub fn new(mut initial: Box<dyn State>, ctx: &mut StateContext) -> Self {
        log::info!("entering state {}", initial.name());
        initial.initialize(ctx);
        initial.load_content(ctx);
        Self { current: initial }
    }

    pub fn current(&self) -> &dyn State {
        self.current.as_ref()
    }

    /// Unconditional: any state may transition to any other. Order is
    /// unload old → initialize new → load new; nothing touches the old
    /// state once the new one starts initializing.
    pub fn change_state(&mut self, mut next: Box<dyn State>, ctx: &mut StateContext) {
        log::info!("state transition: {} -> {}", self.current.name(), next.name());
        self.current.unload_content(ctx);
        next.initialize(ctx);
        next.load_content(ctx);
        self.current = next;
    }

    pub fn change_to<T>(&mut self, ctx: &mut StateContext)
    where
        T: State + Default + 'static,
    {
        self.change_state(Box::new(T::default()), ctx);
    }

    pub fn update_current(&mut self, ctx: &mut StateContext, dt: f32) {
        if let Some(next) = self.current.update(ctx, dt) {
            self.change_state(next, ctx);
        }
    }

    pub fn draw_current(&self, ctx: &StateContext) {
        self.current.draw(ctx);
    }

    /// Final teardown when the host loop exits.
    pub fn shutdown(&mut self, ctx: &mut StateContext) {
        self.current.unload_content(ctx);
    }
}
