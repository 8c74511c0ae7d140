use anyhow::{bail, Result};
use console::style;
use scout::blueprint::AgentBlueprint;
use scout::config::Settings;

pub fn execute(settings: &Settings) -> Result<()> {
    println!("{}", style("Scout configuration").bold());
    for (name, value) in describe(settings) {
        println!("  {:<14} {}", name, value);
    }

    let missing = settings.missing_credentials();
    if !missing.is_empty() {
        bail!("Missing credentials: {}", missing.join(", "));
    }

    // Credentials exist, make sure they also produce a usable blueprint.
    let blueprint = AgentBlueprint::from_settings(settings)?;
    for (name, server) in &blueprint.servers {
        println!("  {:<14} {}", format!("server.{}", name), server.redacted());
    }
    println!("{}", style("All credentials present.").green());
    Ok(())
}

fn describe(settings: &Settings) -> Vec<(&'static str, String)> {
    let present = |set: bool| String::from(if set { "set" } else { "missing" });
    vec![
        ("agent host", settings.agent.host.clone()),
        ("graph", settings.agent.graph_id.clone()),
        (
            "timeout",
            settings
                .agent
                .timeout_secs
                .map(|secs| format!("{}s", secs))
                .unwrap_or_else(|| "none".to_string()),
        ),
        ("model", settings.model.name.clone()),
        ("model key", present(settings.model_api_key().is_some())),
        ("search", format!("{} ({:?})", settings.search.url, settings.search.transport)),
        ("search key", present(settings.search_api_key().is_some())),
    ]
}
