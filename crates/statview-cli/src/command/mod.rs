use clap::{Parser, Subcommand};

use self::{
    bland_altman::BlandAltmanArg, explore::ExploreArg, survival::SurvivalArg,
};

mod bland_altman;
mod explore;
mod survival;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build Kaplan-Meier survival curves from a table
    Survival(#[clap(flatten)] SurvivalArg),
    /// Compute Bland-Altman agreement statistics for two measurement columns
    BlandAltman(#[clap(flatten)] BlandAltmanArg),
    /// Summarize table columns with statistics and histograms
    Explore(#[clap(flatten)] ExploreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Survival(arg) => survival::run(&arg)?,
        Mode::BlandAltman(arg) => bland_altman::run(&arg)?,
        Mode::Explore(arg) => explore::run(&arg)?,
    }
    Ok(())
}
