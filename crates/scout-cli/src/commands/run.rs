use anyhow::Result;
use cliclack::spinner;
use scout::config::Settings;

use super::build_bridge;

/// Ask once and print the answer. Any failure ends the process with an error.
pub fn execute(settings: Settings, text: &str) -> Result<()> {
    let bridge = build_bridge(settings)?;

    let progress = spinner();
    progress.start("Thinking...");
    let answer = bridge.ensure_ready().and_then(|()| bridge.ask(text));
    progress.stop("");

    println!("{}", answer?);
    Ok(())
}
