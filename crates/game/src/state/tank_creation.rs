use super::{State, StateContext, TankListState, Transition, UiCommand};

/// Build a new account tank. The host UI submits a filled-in profile; this
/// state validates it and pushes it through the session.
#[derive(Default)]
pub struct TankCreationState {
    error: Option<String>,
}

impl TankCreationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl State for TankCreationState {
    fn name(&self) -> &'static str {
        "tank-creation"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Transition {
        while let Some(command) = ctx.ui.pop_front() {
            match command {
                UiCommand::SubmitTank(profile) => {
                    if let Err(e) = profile.validate() {
                        self.error = Some(e.to_string());
                        continue;
                    }
                    match ctx.session.create_tank(&profile) {
                        Ok(()) => {
                            log::info!("created tank {:?}", profile.name);
                            return Some(Box::new(TankListState::new()));
                        }
                        Err(e) => {
                            log::warn!("tank creation failed: {}", e);
                            self.error = Some(e.to_string());
                        }
                    }
                }
                UiCommand::Back => return Some(Box::new(TankListState::new())),
                UiCommand::Quit => ctx.exit = true,
                _ => {}
            }
        }
        None
    }
}
