//! Periodic viewer-count estimation and broadcast.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    dto::{
        public::ViewersResponse,
        sse::{ServerEvent, ViewersEvent},
    },
    state::{SharedState, target, viewers::ViewerEstimator},
};

/// Interval between random-walk steps.
const STEP_INTERVAL: Duration = Duration::from_secs(3);

/// Run the viewer estimation loop until the process exits.
pub async fn run(state: SharedState) {
    let mut ticker = interval(STEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let watching = step(&state).await;
        broadcast_viewers(&state, watching);
    }
}

/// Advance the walk one step and blend in boost and live connections.
async fn step(state: &SharedState) -> u64 {
    let settings = state.settings_snapshot().await;
    let target = target::resolve(&settings, state.config().default_target());

    let walk = {
        let mut estimator = state.estimator().lock().await;
        let mut rng = rand::rng();
        estimator.step(&mut rng, OffsetDateTime::now_utc(), target)
    };

    ViewerEstimator::displayed(
        walk,
        settings.extra_viewers,
        state.viewers_online().len() as u64,
    )
}

/// Current blended count for the polling endpoint, without advancing the
/// walk.
pub async fn current(state: &SharedState) -> ViewersResponse {
    let settings = state.settings_snapshot().await;
    let walk = {
        let estimator = state.estimator().lock().await;
        estimator.current()
    };

    ViewersResponse {
        watching: ViewerEstimator::displayed(
            walk,
            settings.extra_viewers,
            state.viewers_online().len() as u64,
        ),
    }
}

fn broadcast_viewers(state: &SharedState, watching: u64) {
    if let Ok(payload) = ServerEvent::json(Some("viewers".to_string()), &ViewersEvent { watching })
    {
        state.public_sse().broadcast(payload);
    }
}
