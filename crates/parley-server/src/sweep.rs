//! Periodic expiry sweep: ends sessions idle past their TTL and tears down
//! their avatar sessions best-effort. Runs independently of request
//! handling.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::state::AppState;

pub fn spawn_expiry_sweep(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; skip it so the sweep starts
        // one full interval after boot.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_sweep(&state).await;
        }
    })
}

pub async fn run_sweep(state: &AppState) {
    let removed = state.store.sweep_expired().await;
    if removed.is_empty() {
        return;
    }
    tracing::info!("expired {} inactive session(s)", removed.len());

    let mut avatar_sessions = state.avatar_sessions.write().await;
    for id in removed {
        if let Some(avatar_id) = avatar_sessions.remove(&id) {
            if let Some(presenter) = &state.presenter {
                if let Err(e) = presenter.end_session(&avatar_id).await {
                    tracing::warn!("avatar session teardown failed during sweep: {e:#}");
                }
            }
        }
    }
}
