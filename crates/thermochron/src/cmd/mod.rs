use clap::ValueEnum;

use crate::exit::CliResult;

pub mod clear;
pub mod read;
pub mod start;
pub mod status;
pub mod stop;

/// Operations selected with `--command`.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Action {
    Status,
    Clear,
    Start,
    Stop,
    Read,
    Help,
}

pub fn run(action: Action) -> CliResult {
    match action {
        Action::Status => status::run(),
        Action::Clear => clear::run(),
        Action::Start => start::run(),
        Action::Stop => stop::run(),
        Action::Read => read::run(),
        // handled in main before dispatch
        Action::Help => Ok(()),
    }
}
