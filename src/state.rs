use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::console::{now_ms, CeoConsole};
use crate::scheduler::{spawn_every, ScheduledTask};

// ------------------------------------------------------------
// SHARED STATE
// ------------------------------------------------------------
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub console: Arc<Mutex<CeoConsole>>,
    live_updates: Arc<Mutex<Option<ScheduledTask>>>,
}

impl AppState {
    pub fn new(config: Config, console: CeoConsole) -> Self {
        Self {
            config: Arc::new(config),
            console: Arc::new(Mutex::new(console)),
            live_updates: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the live-update loop unless one is already running.
    pub async fn start_live_updates(&self) {
        let mut slot = self.live_updates.lock().await;
        if slot.as_ref().is_some_and(|task| !task.is_cancelled()) {
            return;
        }

        let console = self.console.clone();
        *slot = Some(spawn_every(
            "live_updates",
            self.config.live_update_every,
            move || {
                let console = console.clone();
                async move {
                    console.lock().await.live_tick(now_ms());
                }
            },
        ));
        info!("live updates started");
    }

    pub async fn stop_live_updates(&self) {
        if let Some(task) = self.live_updates.lock().await.take() {
            task.cancel();
            info!("live updates stopped");
        }
    }

    pub async fn live_updates_running(&self) -> bool {
        self.live_updates
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_cancelled())
    }

    /// Session-timeout sweep and simulated events. Keep the returned
    /// handles alive for as long as the server runs.
    pub fn spawn_background(&self) -> Vec<ScheduledTask> {
        let sweeper = {
            let state = self.clone();
            spawn_every("session_check", self.config.session_check_every, move || {
                let state = state.clone();
                async move {
                    let expired = state.console.lock().await.enforce_timeout(now_ms());
                    if expired {
                        state.stop_live_updates().await;
                    }
                }
            })
        };

        let simulator = {
            let console = self.console.clone();
            spawn_every("simulation", self.config.simulation_every, move || {
                let console = console.clone();
                async move {
                    console.lock().await.simulate_events(now_ms());
                }
            })
        };

        vec![sweeper, simulator]
    }
}
