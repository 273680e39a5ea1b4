// Clinic Agenda replay tool
// Feeds a JSON scenario through the grid interaction controller and prints
// every emitted event as one JSON line

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clinic_agenda::services::replay::{self, Scenario};
use clinic_agenda::services::settings::SettingsService;

fn read_scenario(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read scenario {}", path))
        }
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read scenario from stdin")?;
            Ok(content)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1);
    let content = read_scenario(path.as_deref())?;
    let scenario: Scenario = serde_json::from_str(&content).context("Failed to parse scenario")?;

    let settings = match &scenario.settings {
        Some(settings) => settings.clone(),
        None => SettingsService::from_environment().load()?,
    };
    log::info!(
        "Replaying {} steps over {} day(s) and {} room(s)",
        scenario.steps.len(),
        scenario.dates.len(),
        scenario.rooms.len()
    );

    let lines = replay::run(&scenario, settings)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }
    Ok(())
}
