use std::sync::{Arc, Mutex};

use crate::session::SessionError;

use super::{State, StateContext, TankListState, Transition, UiCommand};

/// The title screen. Login runs asynchronously on the session's thread; the
/// completion callback hops through the invocation buffer so the result is
/// consumed on the logical thread like every other callback.
#[derive(Default)]
pub struct LoginState {
    pending: Arc<Mutex<Option<Result<(), SessionError>>>>,
    busy: bool,
    error: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn begin_login(&mut self, ctx: &mut StateContext, username: &str, password: &str) {
        if self.busy {
            return;
        }
        if username.trim().is_empty() || password.trim().is_empty() {
            self.error = Some(String::from("username and password are required"));
            return;
        }

        self.busy = true;
        self.error = None;

        let pending = Arc::clone(&self.pending);
        let invocations = Arc::clone(&ctx.invocations);
        ctx.session.login(
            username,
            password,
            Box::new(move |result| {
                // Runs on the session's callback thread; marshal the result
                // onto the logical thread before anything reads it.
                invocations.enqueue(move || {
                    *pending.lock().unwrap() = Some(result);
                });
            }),
        );
    }
}

impl State for LoginState {
    fn name(&self) -> &'static str {
        "login"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Transition {
        if let Some(result) = self.pending.lock().unwrap().take() {
            self.busy = false;
            match result {
                Ok(()) => {
                    log::info!("login successful");
                    return Some(Box::new(TankListState::new()));
                }
                Err(e) => {
                    log::warn!("login failed: {}", e);
                    self.error = Some(e.to_string());
                }
            }
        }

        while let Some(command) = ctx.ui.pop_front() {
            match command {
                UiCommand::SubmitLogin { username, password } => {
                    self.begin_login(ctx, &username, &password);
                }
                UiCommand::Quit => ctx.exit = true,
                _ => {}
            }
        }

        None
    }
}
