use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use visibility_dash::{
    server::{self, AppState, CategoryPolicy},
    sheets, Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config ───────────────────────────────────────────────────
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // ─── 2) init logging ─────────────────────────────────────────────
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();
    info!(source = ?config.source, categories = config.category_tabs.len(), "startup");

    // ─── 3) build the reader once and share it ───────────────────────
    let source = sheets::connect(&config.source).await?;
    let state = AppState::new(source, CategoryPolicy::new(config.category_tabs.clone()));

    // ─── 4) serve ────────────────────────────────────────────────────
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    server::serve(state, addr).await;

    Ok(())
}
