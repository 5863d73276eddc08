mod loopback;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use salvo::{
    FixedTimestep, InputSample, LoginState, Options, StateContext, StateManager, TankInput,
    UiCommand,
};

use loopback::{LoopbackResources, LoopbackScene, LoopbackSession};

#[derive(Parser)]
#[command(name = "salvo")]
#[command(about = "Salvo client driver (headless, loopback session)")]
struct Args {
    #[arg(short, long, default_value = "gunner", help = "Account name")]
    username: String,

    #[arg(short, long, default_value = "hunter2", help = "Account password")]
    password: String,

    #[arg(long, help = "Primary maps directory (defaults to ./maps)")]
    maps_dir: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 1800,
        help = "Logical frames to run before exiting"
    )]
    frames: u64,

    #[arg(long, help = "Run frames back-to-back instead of real time")]
    turbo: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    run_soak(args)
}

/// Drive the full screen flow against the loopback session: login, pick the
/// only tank and server, sit through loading, then play a scripted round.
fn run_soak(args: Args) -> anyhow::Result<()> {
    let session = Arc::new(LoopbackSession::new()?);
    let scene = Arc::new(LoopbackScene::default());
    let resources = Arc::new(LoopbackResources::default());

    let mut options = Options::default();
    if let Some(maps_dir) = args.maps_dir {
        options.maps_dir = maps_dir;
    }

    let session_dyn: Arc<dyn salvo::Session> = session.clone();
    let mut ctx = StateContext::new(session_dyn, scene, resources, options);
    let mut manager = StateManager::new(Box::new(LoginState::new()), &mut ctx);

    let mut script = Script::new(args.username, args.password);
    let mut timestep = FixedTimestep::new(60);
    let mut last = Instant::now();
    let mut frame: u64 = 0;

    while frame < args.frames && !ctx.exit {
        if args.turbo {
            timestep.accumulate(timestep.dt());
        } else {
            let now = Instant::now();
            timestep.accumulate(now.duration_since(last).as_secs_f32());
            last = now;
        }

        while timestep.consume_tick() && frame < args.frames && !ctx.exit {
            frame += 1;

            ctx.invocations.drain();

            let state_name = manager.current().name();
            ctx.input = script.input_for(state_name);
            if let Some(command) = script.command_for(state_name) {
                ctx.ui.push_back(command);
            }

            manager.update_current(&mut ctx, timestep.dt());
            manager.draw_current(&ctx);
        }

        if !args.turbo {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }

    manager.shutdown(&mut ctx);
    log::info!(
        "soak finished after {} frames: {}",
        frame,
        session.traffic_report()
    );
    Ok(())
}

/// Canned pilot: issues each screen command once and plays a fixed input
/// pattern once gameplay starts.
struct Script {
    username: String,
    password: String,
    login_sent: bool,
    tank_picked: bool,
    server_picked: bool,
    gameplay_frames: u64,
}

impl Script {
    fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            login_sent: false,
            tank_picked: false,
            server_picked: false,
            gameplay_frames: 0,
        }
    }

    fn command_for(&mut self, state_name: &str) -> Option<UiCommand> {
        match state_name {
            "login" if !self.login_sent => {
                self.login_sent = true;
                Some(UiCommand::SubmitLogin {
                    username: self.username.clone(),
                    password: self.password.clone(),
                })
            }
            "tank-list" if !self.tank_picked => {
                self.tank_picked = true;
                Some(UiCommand::SelectTank(0))
            }
            "server-list" if !self.server_picked => {
                self.server_picked = true;
                Some(UiCommand::SelectServer(0))
            }
            _ => None,
        }
    }

    fn input_for(&mut self, state_name: &str) -> InputSample {
        if state_name != "gameplay" {
            return InputSample::default();
        }
        self.gameplay_frames += 1;

        let mut sample = InputSample::default();
        match self.gameplay_frames {
            // Drive forward long enough to trip the periodic resync.
            1..=400 => sample.held = TankInput::FORWARD,
            401..=460 => sample.held = TankInput::FORWARD | TankInput::ROTATE_LEFT,
            461..=520 => sample.held = TankInput::FIRE,
            521 => sample.chat_line = Some(String::from("gg")),
            _ => {}
        }
        sample
    }
}
