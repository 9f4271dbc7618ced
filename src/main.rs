//! Starfall headless runner
//!
//! Runs the simulation without a window: loads an optional world config,
//! drives the player with a simple autopilot and prints the final snapshot.
//!
//! Usage: `starfall [CONFIG] [--ticks N] [--seed S]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use starfall::WorldConfig;
    use starfall::audio::{LogAudio, dispatch};
    use starfall::consts::SIM_DT;
    use starfall::sim::{GameEvent, GamePhase, GameSession, InputState};

    /// One minute at 60 Hz
    const DEFAULT_TICKS: u64 = 3600;

    /// Pickups this far above the player are worth a jump
    const JUMP_REACH_Y: f32 = 40.0;
    /// Horizontal window in which the autopilot commits to a jump
    const JUMP_WINDOW_X: f32 = 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "starfall")]
    #[command(about = "Run the Starfall simulation headless and print the final snapshot")]
    pub struct Args {
        /// World config JSON; the built-in layout is used when omitted
        pub config: Option<PathBuf>,

        /// Number of 60 Hz ticks to simulate
        #[arg(long, default_value_t = DEFAULT_TICKS)]
        pub ticks: u64,

        /// RNG seed; defaults to the current time
        #[arg(long)]
        pub seed: Option<u64>,
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Walk toward the nearest active pickup, jump when it sits above us
    fn autopilot(session: &GameSession) -> InputState {
        let player = &session.player().body;
        let target = session
            .entities
            .pickups
            .iter()
            .filter(|p| p.active)
            .min_by(|a, b| {
                let da = a.body.pos.distance_squared(player.pos);
                let db = b.body.pos.distance_squared(player.pos);
                da.total_cmp(&db)
            });

        let mut input = InputState::default();
        if let Some(pickup) = target {
            let dx = pickup.body.pos.x - player.pos.x;
            input.set_direction(dx < -4.0, dx > 4.0);
            let above = player.pos.y - pickup.body.pos.y > JUMP_REACH_Y;
            input.set_jump_requested(above && dx.abs() < JUMP_WINDOW_X);
        }
        input
    }

    pub fn run(args: Args) -> ExitCode {
        env_logger::init();

        let config = match WorldConfig::load_or_default(args.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load world config: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let seed = args.seed.unwrap_or_else(clock_seed);
        let mut session = match GameSession::new(config, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid world config: {}", e);
                return ExitCode::FAILURE;
            }
        };
        log::info!(
            "Starfall (headless) running {} ticks, seed {}",
            args.ticks,
            seed
        );

        let mut audio = LogAudio::new();
        dispatch(&session.drain_events(), &mut audio);

        let mut defeats = 0u32;
        for _ in 0..args.ticks {
            // Manual policy: press the restart button ourselves
            if session.phase() == GamePhase::GameOver && !session.machine.restart_pending() {
                session.request_restart();
            }

            let input = autopilot(&session);
            let events = session.tick(&input, SIM_DT);
            defeats += events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerDefeated { .. }))
                .count() as u32;
            dispatch(&events, &mut audio);
        }

        log::info!(
            "Finished: score {}, {} defeats, {} sound cues",
            session.score(),
            defeats,
            audio.played()
        );

        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize snapshot: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser shell drives the library directly
}
