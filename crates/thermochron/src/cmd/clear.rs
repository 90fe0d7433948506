use thermochron::Button;

use crate::exit::{CliError, CliResult};

pub fn run() -> CliResult {
    let mut button = Button::open().map_err(|e| CliError::operation("open button", e))?;
    button
        .clear_memory()
        .map_err(|e| CliError::operation("clear memory", e))?;
    println!("Cleared memory.");
    Ok(())
}
