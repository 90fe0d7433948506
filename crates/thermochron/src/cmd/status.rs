use chrono::TimeDelta;
use thermochron::Button;

use crate::exit::{CliError, CliResult};

pub fn run() -> CliResult {
    let mut button = Button::open().map_err(|e| CliError::operation("open iButton", e))?;
    let status = button
        .status()
        .map_err(|e| CliError::operation("get iButton status", e))?;
    let time = status
        .time()
        .map_err(|e| CliError::operation("get iButton status", e))?;
    let timestamp = status
        .mission_timestamp()
        .map_err(|e| CliError::operation("get iButton status", e))?;

    println!("time:           {time}");
    println!("model:          {}", status.name());
    println!("timestamp:      {timestamp}");
    println!("count:          {}", status.sample_count());
    println!("running:        {}", status.mission_in_progress());
    println!("memory cleared: {}", status.memory_cleared());
    println!(
        "resolution:     {}",
        if status.high_resolution() {
            "0.0625°C"
        } else {
            "0.5°C"
        }
    );
    println!("rate:           {}", format_rate(status.sample_rate()));
    Ok(())
}

fn format_rate(rate: TimeDelta) -> String {
    let secs = rate.num_seconds();
    if secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}
