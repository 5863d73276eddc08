use crate::session::TankProfile;

use super::{
    EditTankState, LoginState, ServerListState, State, StateContext, TankCreationState, Transition,
    UiCommand,
};

/// The account's tank roster: pick one to play, or branch into the
/// creation/edit screens.
#[derive(Default)]
pub struct TankListState {
    tanks: Vec<TankProfile>,
    error: Option<String>,
}

impl TankListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tanks(&self) -> &[TankProfile] {
        &self.tanks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl State for TankListState {
    fn name(&self) -> &'static str {
        "tank-list"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn load_content(&mut self, ctx: &mut StateContext) {
        match ctx.session.tank_list() {
            Ok(tanks) => {
                log::debug!("fetched {} tanks", tanks.len());
                self.tanks = tanks;
            }
            Err(e) => {
                log::warn!("cannot fetch tank list: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Transition {
        while let Some(command) = ctx.ui.pop_front() {
            match command {
                UiCommand::SelectTank(index) => {
                    if let Some(profile) = self.tanks.get(index) {
                        return Some(Box::new(ServerListState::new(profile.clone())));
                    }
                    log::warn!("tank selection {} out of range", index);
                }
                UiCommand::CreateTank => {
                    return Some(Box::new(TankCreationState::new()));
                }
                UiCommand::EditTank(index) => {
                    if let Some(profile) = self.tanks.get(index) {
                        return Some(Box::new(EditTankState::new(profile.clone())));
                    }
                    log::warn!("tank selection {} out of range", index);
                }
                UiCommand::Back => {
                    return Some(Box::new(LoginState::new()));
                }
                UiCommand::Quit => ctx.exit = true,
                _ => {}
            }
        }
        None
    }
}
