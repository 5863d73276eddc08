mod collision;
mod countdown;

use std::collections::VecDeque;
use std::sync::Arc;

use glam::Vec2;

use crate::event::{EventBuffer, EventError, GameEvent};
use crate::input::{InputSample, TankInput};
use crate::map::Map;
use crate::player::{
    FireMode, MoveDirection, PlayerId, PlayerRoster, PlayerTank, SpinDirection, WeaponSpec,
};
use crate::service::{CameraMode, EntityHandle, EntityKind};
use crate::session::{EventRelay, GameMode, ScoreRow, ServerInfo, TankProfile, Team};

use countdown::{Countdown, CountdownKind};

use super::{LoadingState, State, StateContext, TankListState, Transition};

const MAP_CHANGE_COUNTDOWN_SECS: f64 = 10.0;
const RESPAWN_COUNTDOWN_SECS: f64 = 3.0;
const CHAT_LOG_CAP: usize = 64;
const PROJECTILE_VELOCITY: f32 = 700.0;
const PROJECTILE_TTL_SECS: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub from: String,
    pub text: String,
}

#[derive(Debug)]
struct Projectile {
    id: u32,
    position: Vec2,
    velocity: Vec2,
    ttl: f32,
    entity: Option<EntityHandle>,
}

/// The in-round state. One fixed cycle per frame: buffered server events
/// are applied first, then local prediction runs on the updated picture.
pub struct GamePlayState {
    map: Arc<Map>,
    buffer: Arc<EventBuffer>,
    relay: Arc<EventRelay>,
    profile: TankProfile,
    server: ServerInfo,
    game_mode: GameMode,

    roster: PlayerRoster,
    projectiles: Vec<Projectile>,
    chat: VecDeque<ChatEntry>,
    scores: Vec<ScoreRow>,

    camera: CameraMode,
    camera_locked: bool,
    chat_open: bool,
    scores_visible: bool,
    minimap_visible: bool,
    help_visible: bool,

    stuck: bool,
    previously_collided: bool,
    needs_sync: bool,
    sync_timer: f64,
    time_left: f64,
    rotating: bool,
    countdown: Countdown,
}

impl GamePlayState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        map: Arc<Map>,
        buffer: Arc<EventBuffer>,
        relay: Arc<EventRelay>,
        profile: TankProfile,
        server: ServerInfo,
        local_id: PlayerId,
        game_mode: GameMode,
        time_left: f64,
    ) -> Self {
        let spawn = map.center();
        let mut roster = PlayerRoster::new(local_id);
        roster.insert(PlayerTank::from_profile(local_id, &profile, Team::None, spawn));

        Self {
            map,
            buffer,
            relay,
            profile,
            server,
            game_mode,
            roster,
            projectiles: Vec::new(),
            chat: VecDeque::new(),
            scores: Vec::new(),
            camera: CameraMode::Chase,
            camera_locked: true,
            chat_open: false,
            scores_visible: false,
            minimap_visible: false,
            help_visible: false,
            stuck: false,
            previously_collided: false,
            needs_sync: false,
            sync_timer: 0.0,
            time_left,
            rotating: false,
            countdown: Countdown::new(),
        }
    }

    pub fn current_map(&self) -> &Map {
        &self.map
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn time_left(&self) -> f64 {
        self.time_left
    }

    pub fn chat_log(&self) -> impl Iterator<Item = &ChatEntry> {
        self.chat.iter()
    }

    pub fn scores(&self) -> &[ScoreRow] {
        &self.scores
    }

    pub fn scores_visible(&self) -> bool {
        self.scores_visible
    }

    pub fn minimap_visible(&self) -> bool {
        self.minimap_visible
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Apply one server event to the live game. A failure here is isolated
    /// by the caller: log, drop the event, keep the batch going.
    fn apply_event(&mut self, ctx: &mut StateContext, event: GameEvent) -> Result<(), EventError> {
        match event {
            GameEvent::ChatMessage { from, text } => {
                log::debug!("[chat] {}: {}", from, text);
                self.chat.push_back(ChatEntry { from, text });
                while self.chat.len() > CHAT_LOG_CAP {
                    self.chat.pop_front();
                }
                Ok(())
            }
            GameEvent::PlayerJoined {
                id,
                name,
                team,
                position,
                angle,
            } => {
                let mut tank = PlayerTank::new(
                    id,
                    name,
                    team,
                    position,
                    angle,
                    WeaponSpec::by_name("cannon"),
                );
                tank.entity = Some(ctx.scene.add_entity(EntityKind::Tank, position));
                log::info!("{} joined", tank.name);
                self.roster.insert(tank);
                Ok(())
            }
            GameEvent::PlayerLeft { id } => {
                let tank = self
                    .roster
                    .remove(id)
                    .ok_or(EventError::UnknownPlayer(id))?;
                if let Some(entity) = tank.entity {
                    ctx.scene.remove_entity(entity);
                }
                log::info!("{} left", tank.name);
                Ok(())
            }
            GameEvent::PlayerMoved {
                id,
                position,
                direction,
            } => {
                let tank = self
                    .roster
                    .get_mut(id)
                    .ok_or(EventError::UnknownPlayer(id))?;
                tank.position = position;
                tank.move_direction = direction;
                tank.previously_collided = false;
                Ok(())
            }
            GameEvent::PlayerRotated {
                id,
                angle,
                direction,
            } => {
                let tank = self
                    .roster
                    .get_mut(id)
                    .ok_or(EventError::UnknownPlayer(id))?;
                tank.angle = angle;
                tank.spin_direction = direction;
                Ok(())
            }
            GameEvent::PlayerDamaged {
                target,
                attacker,
                damage,
                killed,
            } => {
                let local_id = self.roster.local_id();
                let tank = self
                    .roster
                    .get_mut(target)
                    .ok_or(EventError::UnknownPlayer(target))?;
                let died = tank.apply_damage(damage);
                if killed && !died {
                    // Trust the server's verdict over local bookkeeping.
                    tank.health = 0;
                    tank.alive = false;
                }
                if killed {
                    log::debug!("player {} killed by {}", target, attacker);
                    if target == local_id {
                        self.countdown
                            .start(CountdownKind::Respawn, RESPAWN_COUNTDOWN_SECS);
                    }
                }
                Ok(())
            }
            GameEvent::PlayerRespawned { id, position } => {
                let tank = self
                    .roster
                    .get_mut(id)
                    .ok_or(EventError::UnknownPlayer(id))?;
                tank.respawn(position);
                Ok(())
            }
            GameEvent::ProjectileFired {
                id,
                owner,
                origin,
                target,
            } => {
                if !self.roster.contains(owner) {
                    return Err(EventError::UnknownPlayer(owner));
                }
                let direction = (target - origin).normalize_or_zero();
                self.projectiles.push(Projectile {
                    id,
                    position: origin,
                    velocity: direction * PROJECTILE_VELOCITY,
                    ttl: PROJECTILE_TTL_SECS,
                    entity: Some(ctx.scene.add_entity(EntityKind::Projectile, origin)),
                });
                Ok(())
            }
            GameEvent::ResetPosition { position } => {
                self.roster.local_mut().position = position;
                self.needs_sync = true;
                Ok(())
            }
            GameEvent::RotateMap => {
                self.begin_rotation(ctx);
                Ok(())
            }
            GameEvent::RoundTimeSync { seconds_left } => {
                self.time_left = seconds_left;
                Ok(())
            }
        }
    }

    fn drain_events(&mut self, ctx: &mut StateContext, chat_only: bool) {
        for event in self.buffer.pop_all() {
            if chat_only && !event.is_chat() {
                continue;
            }
            if let Err(e) = self.apply_event(ctx, event) {
                log::warn!("event dropped: {}", e);
            }
        }
    }

    fn handle_chat_line(&mut self, ctx: &mut StateContext, line: &str) {
        let message = line.trim();
        if message.is_empty() {
            return;
        }
        if message == "/unstuck" {
            // Local escape hatch when collision prediction wedges the tank.
            self.stuck = true;
            return;
        }
        ctx.session.send_chat(message);
    }

    /// Send a movement change to the server only when the intent actually
    /// changed; the change always applies locally first.
    fn change_movement(&mut self, ctx: &mut StateContext, direction: MoveDirection, force: bool) {
        let local = self.roster.local_mut();
        if local.move_direction != direction || force {
            local.move_direction = direction;
            let position = local.position;
            ctx.session.send_move(position, direction);
        }
    }

    fn change_rotation(&mut self, ctx: &mut StateContext, direction: SpinDirection, force: bool) {
        let local = self.roster.local_mut();
        if local.spin_direction != direction || force {
            local.spin_direction = direction;
            let angle = local.angle;
            ctx.session.send_rotate(angle, direction);
        }
    }

    /// Push the authoritative local pose to the server, correcting drift.
    fn resync(&mut self, ctx: &mut StateContext) {
        let local = self.roster.local();
        ctx.session.send_move(local.position, local.move_direction);
        ctx.session.send_rotate(local.angle, local.spin_direction);
    }

    fn perform_collision_checks(&mut self, ctx: &StateContext, input: &InputSample) -> bool {
        let viewport = ctx.options.viewport_tiles;
        let local_id = self.roster.local_id();

        let collide = {
            let local = self.roster.local();
            collision::local_collision(&self.map, local, input.held, viewport)
        };
        if !collide && self.stuck && self.roster.local().is_moving() {
            self.stuck = false;
        }

        if ctx.options.remote_collision {
            let map = Arc::clone(&self.map);
            for tank in self.roster.iter_mut() {
                if tank.id == local_id {
                    continue;
                }
                if collision::remote_collision(&map, tank, viewport) {
                    // Halt the prediction only; no correction is sent.
                    tank.move_direction = MoveDirection::None;
                    tank.previously_collided = true;
                }
            }
        }

        collide
    }

    fn apply_input(&mut self, ctx: &mut StateContext, input: &InputSample) {
        if self.chat_open {
            self.change_movement(ctx, MoveDirection::None, false);
            self.change_rotation(ctx, SpinDirection::None, false);
            return;
        }

        let local_collision = self.perform_collision_checks(ctx, input);

        if local_collision && !self.stuck {
            self.change_movement(ctx, MoveDirection::None, false);
            self.previously_collided = true;
        } else {
            self.change_movement(ctx, input.move_intent(), false);
            if self.previously_collided {
                self.previously_collided = false;
                // Edge-triggered: one resync the moment the collision clears.
                self.resync(ctx);
            }
        }
        self.change_rotation(ctx, input.spin_intent(), false);

        if input.pressed.contains(TankInput::MINIMAP) {
            self.minimap_visible = !self.minimap_visible;
        }
        if input.pressed.contains(TankInput::HELP) {
            self.help_visible = !self.help_visible;
        }
        self.scores_visible = input.held.contains(TankInput::SCORE);
    }

    fn update_fire_control(&mut self, ctx: &mut StateContext, input: &InputSample) {
        if self.chat_open {
            return;
        }
        let fire_held = input.held.contains(TankInput::FIRE);
        let mode = self.roster.local().weapon.fire_mode();

        match mode {
            FireMode::Charge => {
                let charging = self.roster.local().weapon_state.charging;
                if fire_held {
                    if !charging && self.roster.local().can_fire() {
                        self.roster.local_mut().weapon_state.charging = true;
                        ctx.session.start_charging();
                    }
                } else if charging {
                    if self.roster.local().can_fire() {
                        self.try_fire(ctx, input.aim);
                    }
                    self.roster.local_mut().weapon_state.charging = false;
                }
            }
            FireMode::Overheat | FireMode::Cooldown => {
                if fire_held {
                    self.try_fire(ctx, input.aim);
                }
            }
        }
    }

    fn try_fire(&mut self, ctx: &mut StateContext, aim: Vec2) {
        if self.roster.local().can_fire() {
            ctx.session.fire(aim);
            self.roster.local_mut().record_shot();
        }
    }

    fn update_projectiles(&mut self, ctx: &mut StateContext, dt: f32) {
        let map = Arc::clone(&self.map);
        let scene = Arc::clone(&ctx.scene);
        self.projectiles.retain_mut(|projectile| {
            projectile.position += projectile.velocity * dt;
            projectile.ttl -= dt;

            let blocked = map
                .tile_at_world(projectile.position)
                .map(|(x, y)| !map.is_passable(x as i32, y as i32))
                .unwrap_or(true);
            let keep = projectile.ttl > 0.0 && !blocked;
            if !keep {
                log::trace!("projectile {} culled", projectile.id);
                if let Some(entity) = projectile.entity {
                    scene.remove_entity(entity);
                }
            }
            keep
        });
    }

    fn begin_rotation(&mut self, ctx: &mut StateContext) {
        if self.rotating {
            return;
        }
        log::info!("round over on {}, rotating", self.map.title());

        for projectile in self.projectiles.drain(..) {
            if let Some(entity) = projectile.entity {
                ctx.scene.remove_entity(entity);
            }
        }
        self.scores = ctx.session.scoreboard();
        self.scores_visible = true;
        self.countdown
            .start(CountdownKind::MapChange, MAP_CHANGE_COUNTDOWN_SECS);
        self.rotating = true;
    }
}

impl State for GamePlayState {
    fn name(&self) -> &'static str {
        "gameplay"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn initialize(&mut self, ctx: &mut StateContext) {
        ctx.scene.switch_camera(self.camera);
        ctx.scene.set_camera_locked(true);

        let local = self.roster.local_mut();
        if local.entity.is_none() {
            let position = local.position;
            local.entity = Some(ctx.scene.add_entity(EntityKind::Tank, position));
        }
    }

    fn load_content(&mut self, ctx: &mut StateContext) {
        // From here on the transport may deliver events into the buffer.
        self.relay.set_ready(true);
        ctx.session.signal_ready();
    }

    fn update(&mut self, ctx: &mut StateContext, dt: f32) -> Transition {
        let input = ctx.input.clone();

        if input.pressed.contains(TankInput::CHAT) {
            self.chat_open = !self.chat_open;
            if self.chat_open {
                self.change_movement(ctx, MoveDirection::None, false);
                self.change_rotation(ctx, SpinDirection::None, false);
            }
        }
        if let Some(line) = &input.chat_line {
            self.handle_chat_line(ctx, line);
            self.chat_open = false;
        }

        if input.pressed.contains(TankInput::MENU) {
            log::info!("leaving the game");
            ctx.session.disconnect();
            ctx.scene.clear();
            return Some(Box::new(TankListState::new()));
        }

        if self.rotating {
            // Only chat reaches the game during the end-of-round window.
            self.drain_events(ctx, true);
            self.scores_visible = true;
            if let Some(CountdownKind::MapChange) = self.countdown.update(dt as f64) {
                return Some(Box::new(LoadingState::new(
                    self.profile.clone(),
                    self.server.clone(),
                )));
            }
            return None;
        }

        self.time_left -= dt as f64;
        if self.time_left <= 0.0 {
            self.begin_rotation(ctx);
        }

        // Server-confirmed state always lands before this frame's
        // prediction step.
        self.drain_events(ctx, false);

        if input.pressed.contains(TankInput::CAMERA) && !self.chat_open {
            self.camera = match self.camera {
                CameraMode::Chase => CameraMode::Overhead,
                CameraMode::Overhead => CameraMode::Chase,
            };
            ctx.scene.switch_camera(self.camera);
        }
        if self.camera_locked {
            ctx.scene.set_camera_locked(self.camera == CameraMode::Chase);
        }

        self.apply_input(ctx, &input);
        self.update_fire_control(ctx, &input);

        self.roster.local_mut().update_weapon(dt);
        for tank in self.roster.iter_mut() {
            tank.advance(dt);
        }
        self.update_projectiles(ctx, dt);

        self.sync_timer += dt as f64;
        if self.sync_timer >= ctx.options.sync_interval_secs {
            if self.roster.local().is_moving() {
                self.needs_sync = true;
            }
            self.sync_timer = 0.0;
        }
        if self.needs_sync {
            self.needs_sync = false;
            self.resync(ctx);
        }

        if let Some(CountdownKind::Respawn) = self.countdown.update(dt as f64) {
            log::debug!("respawn countdown finished");
        }

        None
    }

    fn unload_content(&mut self, ctx: &mut StateContext) {
        self.relay.set_ready(false);
        self.buffer.clear();
        for projectile in self.projectiles.drain(..) {
            if let Some(entity) = projectile.entity {
                ctx.scene.remove_entity(entity);
            }
        }
        ctx.scene.clear();
    }
}
