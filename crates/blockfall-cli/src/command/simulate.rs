use std::time::Duration;

use blockfall_engine::{EngineConfig, GameSession, PieceSeed, Snapshot};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::SessionArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Frames after which an unfinished game is cut off
    #[arg(long, default_value_t = 100_000)]
    max_frames: usize,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    config: EngineConfig,
    games: Vec<GameSummary>,
    total_score: u64,
    total_lines: usize,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    seed: PieceSeed,
    frames: usize,
    game_over: bool,
    last_state: Snapshot,
}

/// Controller command issued on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Idle,
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
}

impl Action {
    /// Picks a command with weights biased toward letting gravity work.
    fn sample<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match rng.random_range(0..100) {
            0..70 => Action::Idle,
            70..78 => Action::MoveLeft,
            78..86 => Action::MoveRight,
            86..93 => Action::Rotate,
            93..98 => Action::SoftDrop,
            _ => Action::HardDrop,
        }
    }

    fn apply(self, session: &mut GameSession) {
        match self {
            Action::Idle => {}
            Action::MoveLeft => _ = session.move_left(),
            Action::MoveRight => _ = session.move_right(),
            Action::Rotate => _ = session.rotate(),
            Action::SoftDrop => _ = session.soft_drop(),
            Action::HardDrop => _ = session.hard_drop(),
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        games,
        max_frames,
        fps,
        pretty,
    } = arg;

    anyhow::ensure!(*fps > 0, "--fps must be positive");
    let config = session.load_config()?;
    let seed = session.seed();
    let frame = Duration::from_secs(1) / *fps;

    let mut rng = Pcg32::from_seed(seed.to_bytes());
    let games = (0..*games)
        .map(|_| {
            let game_seed: PieceSeed = rng.random();
            let mut controller = Pcg32::from_seed(rng.random());
            simulate_game(&config, game_seed, &mut controller, *max_frames, frame)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = SimulationReport {
        seed,
        total_score: games.iter().map(|g| g.last_state.stats.score).sum(),
        total_lines: games.iter().map(|g| g.last_state.stats.lines).sum(),
        config,
        games,
    };
    util::print_json(&report, *pretty)
}

fn simulate_game<R>(
    config: &EngineConfig,
    seed: PieceSeed,
    controller: &mut R,
    max_frames: usize,
    frame: Duration,
) -> anyhow::Result<GameSummary>
where
    R: Rng + ?Sized,
{
    let mut session = GameSession::with_seed(config.clone(), seed)?;
    session.start();

    let mut frames = 0;
    while frames < max_frames && !session.session_state().is_over() {
        Action::sample(controller).apply(&mut session);
        session.tick(frame);
        frames += 1;
    }

    Ok(GameSummary {
        seed,
        frames,
        game_over: session.session_state().is_over(),
        last_state: session.snapshot(),
    })
}
