//! The once-per-second heartbeat of the show.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    dto::{
        common::CountdownSnapshot,
        public::CountdownResponse,
        sse::{ServerEvent, TickEvent},
    },
    services::effect_service,
    state::{
        SharedState,
        countdown::CountdownEngine,
        target,
    },
};

/// Run the countdown loop until the process exits.
///
/// Every second the remaining time is recomputed from the effective target,
/// broadcast as a `tick` event, and handed to the effect dispatcher for
/// tick sounds and the celebration sequence.
pub async fn run(state: SharedState) {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        tick_once(&state, OffsetDateTime::now_utc()).await;
    }
}

/// Advance the countdown by one observation of `now`.
pub async fn tick_once(state: &SharedState, now: OffsetDateTime) {
    let settings = state.settings_snapshot().await;
    let target = target::resolve(&settings, state.config().default_target());

    let (tick, effects) = {
        let mut runtime = state.runtime().lock().await;
        let tick = runtime.engine.tick(now, target);
        let effects = runtime.dispatcher.on_tick(&tick);
        (tick, effects)
    };

    let snapshot = CountdownSnapshot {
        remaining: tick.remaining,
        phase: tick.phase,
        target,
    };
    if let Ok(payload) = ServerEvent::json(Some("tick".to_string()), &TickEvent(snapshot)) {
        state.public_sse().broadcast(payload);
    }

    for effect in effects {
        effect_service::dispatch(state, effect);
    }
}

/// Read-only countdown projection for the polling endpoint.
///
/// Uses a throwaway engine so a poll never touches the celebration latch
/// owned by the tick loop.
pub async fn snapshot(state: &SharedState) -> CountdownResponse {
    let settings = state.settings_snapshot().await;
    let target = target::resolve(&settings, state.config().default_target());
    let tick = CountdownEngine::new().tick(OffsetDateTime::now_utc(), target);

    CountdownResponse {
        countdown: CountdownSnapshot {
            remaining: tick.remaining,
            phase: tick.phase,
            target,
        },
        degraded: state.is_degraded().await,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn tick_broadcasts_countdown_event() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        tick_once(&state, datetime!(2025-12-01 00:00 UTC)).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("tick"));
        assert!(event.data.contains("\"phase\":\"normal\""));
    }

    #[tokio::test]
    async fn poll_snapshot_reports_degraded_startup() {
        let state = AppState::new(AppConfig::default());
        let response = snapshot(&state).await;
        assert!(response.degraded);
    }
}
