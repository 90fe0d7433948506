use thermochron::Button;

use crate::exit::{CliError, CliResult};

pub fn run() -> CliResult {
    let mut button = Button::open().map_err(|e| CliError::operation("open button", e))?;
    let samples = button
        .read_log()
        .map_err(|e| CliError::operation("read log", e))?;
    for sample in samples {
        println!("{}\t{}°C", sample.time, sample.temperature);
    }
    Ok(())
}
