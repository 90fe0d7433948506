mod cmd;
mod exit;
mod logging;

use clap::{CommandFactory, Parser};

use crate::cmd::Action;

#[derive(Parser, Debug)]
#[command(
    name = "thermochron",
    version,
    about = "Maxim DS192x iButton temperature logger client"
)]
struct Cli {
    /// Operation to perform.
    #[arg(long, value_enum, default_value = "help")]
    command: Action,

    /// Toggle debug logging.
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Action::Help = cli.command {
        let _ = Cli::command().print_help();
        std::process::exit(exit::USAGE);
    }

    if let Err(err) = cmd::run(cli.command) {
        println!("{err}");
        std::process::exit(err.code);
    }
}
