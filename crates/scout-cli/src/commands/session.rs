use anyhow::Result;
use scout::config::Settings;

use super::build_bridge;
use crate::prompt::cliclack::CliclackPrompt;
use crate::session::Session;

pub fn execute(settings: Settings) -> Result<()> {
    let bridge = build_bridge(settings)?;
    let mut session = Session::new(&bridge, Box::new(CliclackPrompt::new()));
    session.start()
}
