//! Broadcast glue turning dispatcher decisions into `effect` SSE events.

use std::time::Duration;

use tokio::time::sleep;

use crate::{
    dto::sse::{EffectEvent, ServerEvent},
    state::{SharedState, effects::Effect},
};

/// Follow-up bursts of the celebration sequence, relative to entry.
const CELEBRATION_FOLLOWUP_DELAYS: [Duration; 2] =
    [Duration::from_secs(6), Duration::from_secs(12)];

/// Fan an effect out to all public subscribers.
///
/// Fire and forget: delivery failures are ignored and the celebration
/// follow-ups run on detached tasks so the tick loop is never blocked.
pub fn dispatch(state: &SharedState, effect: Effect) {
    match effect {
        Effect::FireworksBurst => broadcast(state, &EffectEvent::Fireworks),
        Effect::TestSound => broadcast(state, &EffectEvent::Sound),
        Effect::TickSound { second } => broadcast(state, &EffectEvent::Tick { second }),
        Effect::CelebrationSequence => {
            broadcast(state, &EffectEvent::Fireworks);
            for delay in CELEBRATION_FOLLOWUP_DELAYS {
                let state = state.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    broadcast(&state, &EffectEvent::Fireworks);
                });
            }
        }
    }
}

fn broadcast(state: &SharedState, event: &EffectEvent) {
    if let Ok(payload) = ServerEvent::json(Some("effect".to_string()), event) {
        state.public_sse().broadcast(payload);
    }
}
