use thermochron::Button;

use crate::exit::{CliError, CliResult};

pub fn run() -> CliResult {
    let mut button = Button::open().map_err(|e| CliError::operation("open button", e))?;
    button
        .stop_mission()
        .map_err(|e| CliError::operation("stop mission", e))?;
    println!("Stopped mission.");
    Ok(())
}
