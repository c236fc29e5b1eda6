use std::path::PathBuf;

use blockfall_engine::{EngineConfig, PieceSeed};
use clap::{Parser, Subcommand};

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run seeded games with a random controller and print JSON summaries
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that builds a session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Engine configuration file (JSON); omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
}

impl SessionArg {
    fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => EngineConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn seed(&self) -> PieceSeed {
        self.seed.unwrap_or_else(PieceSeed::random)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
