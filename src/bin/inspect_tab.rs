// src/bin/inspect_tab.rs
// Fetch one tab with the configured reader and print what the extractor
// makes of it.
//
// Usage: inspect-tab <dashboard|competitors|metrics|category NAME>

use anyhow::{bail, Result};
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use visibility_dash::{sheets, Config, Report};

fn parse_args(args: &[String]) -> Result<Report> {
    let report = match args {
        [kind] if kind == "dashboard" => Report::MainDashboard,
        [kind] if kind == "competitors" => Report::Competitors,
        [kind] if kind == "metrics" => Report::Metrics,
        [kind, name] if kind == "category" => Report::Category(name.clone()),
        _ => bail!("usage: inspect-tab <dashboard|competitors|metrics|category NAME>"),
    };
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::WARN.into())),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let report = parse_args(&args)?;

    let source = sheets::connect(&config.source).await?;
    info!(range = %report.range(), "inspecting");
    let body = report.load(source.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
