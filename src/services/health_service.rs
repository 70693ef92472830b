//! Health projection over the storage connection.

use tracing::{info, warn};

use crate::{
    dto::{
        health::HealthResponse,
        sse::{ServerEvent, SystemStatus},
    },
    state::SharedState,
};

/// Respond with a static health payload while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.relay_store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        None => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}

/// Announce degraded-mode transitions on both SSE streams.
///
/// Runs until the watch channel closes, which only happens at shutdown.
pub async fn run_status_broadcaster(state: SharedState) {
    let mut watcher = state.degraded_watcher();

    while watcher.changed().await.is_ok() {
        let degraded = *watcher.borrow_and_update();
        info!(degraded, "storage availability changed");

        if let Ok(event) = ServerEvent::json(Some("status".to_string()), &SystemStatus { degraded })
        {
            state.public_sse().broadcast(event.clone());
            state.admin_sse().broadcast(event);
        }
    }
}
