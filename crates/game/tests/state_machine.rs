mod common;

use std::sync::{Arc, Mutex};

use salvo::{State, StateContext, StateManager, Transition};

use common::{MockSession, arena, test_ctx};

/// Records every lifecycle call into a shared journal.
struct Recorder {
    tag: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
    next: Option<&'static str>,
}

impl Recorder {
    fn new(tag: &'static str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            tag,
            journal,
            next: None,
        }
    }

    fn log(&self, phase: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}.{}", self.tag, phase));
    }
}

impl State for Recorder {
    fn name(&self) -> &'static str {
        self.tag
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn initialize(&mut self, _ctx: &mut StateContext) {
        self.log("initialize");
    }

    fn load_content(&mut self, _ctx: &mut StateContext) {
        self.log("load_content");
    }

    fn update(&mut self, _ctx: &mut StateContext, _dt: f32) -> Transition {
        self.log("update");
        self.next
            .take()
            .map(|tag| Box::new(Recorder::new(tag, Arc::clone(&self.journal))) as Box<dyn State>)
    }

    fn unload_content(&mut self, _ctx: &mut StateContext) {
        self.log("unload_content");
    }
}

fn recorder_ctx() -> StateContext {
    test_ctx(
        Arc::new(MockSession::new(&arena(8, 8, &[]))),
        "state-machine",
    )
}

#[test]
fn change_state_runs_the_full_lifecycle_in_order() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = recorder_ctx();

    let a = Box::new(Recorder::new("a", Arc::clone(&journal)));
    let mut manager = StateManager::new(a, &mut ctx);
    assert_eq!(manager.current().name(), "a");

    let b = Box::new(Recorder::new("b", Arc::clone(&journal)));
    manager.change_state(b, &mut ctx);
    assert_eq!(manager.current().name(), "b");

    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "a.initialize",
            "a.load_content",
            "a.unload_content",
            "b.initialize",
            "b.load_content",
        ]
    );
}

#[test]
fn transition_requested_from_update_is_applied_same_frame() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = recorder_ctx();

    let mut a = Box::new(Recorder::new("a", Arc::clone(&journal)));
    a.next = Some("b");
    let mut manager = StateManager::new(a, &mut ctx);

    manager.update_current(&mut ctx, 1.0 / 60.0);
    assert_eq!(manager.current().name(), "b");

    // Nothing ran on `a` after `b` began initializing.
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "a.initialize",
            "a.load_content",
            "a.update",
            "a.unload_content",
            "b.initialize",
            "b.load_content",
        ]
    );

    manager.update_current(&mut ctx, 1.0 / 60.0);
    assert_eq!(manager.current().name(), "b");
    assert_eq!(journal.lock().unwrap().last().unwrap(), "b.update");
}

#[test]
fn shutdown_unloads_the_current_state() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = recorder_ctx();

    let a = Box::new(Recorder::new("a", Arc::clone(&journal)));
    let mut manager = StateManager::new(a, &mut ctx);
    manager.shutdown(&mut ctx);

    assert_eq!(journal.lock().unwrap().last().unwrap(), "a.unload_content");
}
