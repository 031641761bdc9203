use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ceo_console::api;
use ceo_console::config::Config;
use ceo_console::console::{now_ms, CeoConsole};
use ceo_console::db::RocksStore;
use ceo_console::state::AppState;
use ceo_console::storage::{MemoryStore, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // -----------------------------
    // Storage: persistent local scope, per-process session scope
    // -----------------------------
    let local = RocksStore::open(&config.data_dir)
        .with_context(|| format!("opening {}", config.data_dir.display()))?;
    let storage = Storage::new(Arc::new(local), Arc::new(MemoryStore::new()));

    let mut console = CeoConsole::new(&config, storage)?;
    let restored = console.restore(now_ms());

    let addr = config.bind_addr.clone();
    let state = AppState::new(config, console);
    if restored {
        state.start_live_updates().await;
    }
    let _background = state.spawn_background();

    // -----------------------------
    // Router
    // -----------------------------
    let app = api::app(state);

    info!(%addr, restored, "ceo console listening");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
