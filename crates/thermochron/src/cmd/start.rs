use chrono::Local;
use thermochron::Button;

use crate::exit::{CliError, CliResult};

pub fn run() -> CliResult {
    let mut button = Button::open().map_err(|e| CliError::operation("open button", e))?;
    let now = Local::now().naive_local();
    button
        .program_mission(&now)
        .map_err(|e| CliError::operation("start mission", e))?;
    println!("Started mission.");
    Ok(())
}
