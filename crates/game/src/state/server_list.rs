use crate::session::{ServerInfo, TankProfile};

use super::{LoadingState, State, StateContext, TankListState, Transition, UiCommand};

/// The server browser. Carries the tank chosen on the previous screen and,
/// when arriving from a failed load, the error to display.
pub struct ServerListState {
    profile: TankProfile,
    servers: Vec<ServerInfo>,
    error: Option<String>,
}

impl ServerListState {
    pub fn new(profile: TankProfile) -> Self {
        Self {
            profile,
            servers: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(profile: TankProfile, message: String) -> Self {
        Self {
            profile,
            servers: Vec::new(),
            error: Some(message),
        }
    }

    pub fn servers(&self) -> &[ServerInfo] {
        &self.servers
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl State for ServerListState {
    fn name(&self) -> &'static str {
        "server-list"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn load_content(&mut self, ctx: &mut StateContext) {
        match ctx.session.server_list() {
            Ok(servers) => {
                log::debug!("fetched {} servers", servers.len());
                self.servers = servers;
            }
            Err(e) => {
                log::warn!("cannot fetch server list: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    fn update(&mut self, ctx: &mut StateContext, _dt: f32) -> Transition {
        while let Some(command) = ctx.ui.pop_front() {
            match command {
                UiCommand::SelectServer(index) => {
                    if let Some(server) = self.servers.get(index) {
                        return Some(Box::new(LoadingState::new(
                            self.profile.clone(),
                            server.clone(),
                        )));
                    }
                    log::warn!("server selection {} out of range", index);
                }
                UiCommand::Back => return Some(Box::new(TankListState::new())),
                UiCommand::Quit => ctx.exit = true,
                _ => {}
            }
        }
        None
    }
}
