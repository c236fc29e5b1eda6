use blockfall_engine::GameSession;
use blockfall_tui::Runtime;

use crate::command::{SessionArg, play::app::PlayApp};

mod app;

const FPS: f64 = 60.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Hide the landing preview of the falling piece
    #[arg(long)]
    no_ghost: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { session, no_ghost } = arg;

    let config = session.load_config()?;
    let session = GameSession::with_seed(config, session.seed())?;
    let mut app = PlayApp::new(session, !*no_ghost);

    Runtime::new(FPS, FPS).run(&mut app)?;
    Ok(())
}
