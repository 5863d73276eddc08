use crate::session::TankProfile;

use super::{State, StateContext, TankListState, Transition, UiCommand};

/// Edit an existing account tank. Keeps the original name so a rename still
/// targets the right server-side record.
pub struct EditTankState {
    original: TankProfile,
    error: Option<String>,
}

impl EditTankState {
    pub fn new(original: TankProfile) -> Self {
        Self {
            original,
            error: None,
        }
    }

    pub fn original(&self) -> &TankProfile {
        &self.original
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl State for EditTankState {
    fn name(&self) -> &'static str {
        "edit-tank"
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
                    match ctx.session.update_tank(&self.original.name, &profile) {
                        Ok(()) => {
                            log::info!("updated tank {:?}", self.original.name);
                            return Some(Box::new(TankListState::new()));
                        }
                        Err(e) => {
                            log::warn!("tank update failed: {}", e);
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
