//! Admin command emitter: every operation rewrites the settings row and then
//! pushes the new image through the settings channel.
//!
//! Writes are persist-then-apply. A storage failure is logged and the
//! in-memory image still advances so the admin keeps control of the live
//! show while the database is away; the row is rewritten on the next
//! successful save anyway.

use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::warn;

use crate::{
    dao::models::SettingsEntity,
    dto::{
        admin::{ActionResponse, SettingsResponse, SimulateRequest},
        common::SettingsSnapshot,
    },
    error::ServiceError,
    services::settings_service,
    state::{SharedState, settings::SettingsRecord},
};

/// Toggle the force-elapse flag.
pub async fn set_force(state: &SharedState, active: bool) -> SettingsResponse {
    let mut record = state.settings_snapshot().await;
    record.is_force_new_year = active;
    SettingsResponse(persist_and_apply(state, record).await)
}

/// Set, shift, or clear the simulated target instant.
pub async fn simulate(
    state: &SharedState,
    request: SimulateRequest,
) -> Result<SettingsResponse, ServiceError> {
    let simulated = match (request.timestamp, request.seconds_from_now) {
        (Some(_), Some(_)) => {
            return Err(ServiceError::InvalidInput(
                "Provide either timestamp or seconds_from_now, not both".into(),
            ));
        }
        (Some(raw), None) => Some(OffsetDateTime::parse(&raw, &Rfc3339).map_err(|_| {
            ServiceError::InvalidInput(format!("'{raw}' is not a valid RFC 3339 timestamp"))
        })?),
        (None, Some(seconds)) => Some(OffsetDateTime::now_utc() + Duration::seconds(seconds)),
        (None, None) => None,
    };

    let mut record = state.settings_snapshot().await;
    record.simulation_timestamp = simulated;
    Ok(SettingsResponse(persist_and_apply(state, record).await))
}

/// Fire a fireworks burst on every connected viewer.
pub async fn trigger_fireworks(state: &SharedState) -> ActionResponse {
    let mut record = state.settings_snapshot().await;
    record.trigger_fireworks = Some(OffsetDateTime::now_utc());
    persist_and_apply(state, record).await;
    ActionResponse {
        message: "Fireworks triggered".to_string(),
    }
}

/// Play the test sound on every connected viewer.
pub async fn test_sound(state: &SharedState) -> ActionResponse {
    let mut record = state.settings_snapshot().await;
    record.test_sound = Some(OffsetDateTime::now_utc());
    persist_and_apply(state, record).await;
    ActionResponse {
        message: "Test sound triggered".to_string(),
    }
}

/// Adjust the constant added to the displayed viewer count.
pub async fn set_viewer_boost(state: &SharedState, extra_viewers: u32) -> SettingsResponse {
    let mut record = state.settings_snapshot().await;
    record.extra_viewers = extra_viewers;
    SettingsResponse(persist_and_apply(state, record).await)
}

/// Current settings row image.
pub async fn get_settings(state: &SharedState) -> SettingsResponse {
    let record = state.settings_snapshot().await;
    SettingsResponse(SettingsSnapshot::from(&record))
}

/// Write the row to storage, then apply it in memory regardless of the
/// storage outcome.
async fn persist_and_apply(state: &SharedState, record: SettingsRecord) -> SettingsSnapshot {
    match state.relay_store().await {
        Some(store) => {
            let entity = SettingsEntity::from_record(&record);
            if let Err(error) = store.save_settings(entity).await {
                warn!(%error, "Failed to persist settings update, keeping in-memory image");
            }
        }
        None => {
            warn!("Storage unavailable, settings update applied in memory only");
        }
    }

    settings_service::apply_update(state, record.clone()).await;
    SettingsSnapshot::from(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn first_trigger_while_degraded_still_fires_effect() {
        // Fresh state, storage never connected: the command baseline must
        // already be seeded so the first bump counts as an edge.
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        trigger_fireworks(&state).await;

        let settings = receiver.recv().await.unwrap();
        assert_eq!(settings.event.as_deref(), Some("settings"));
        let effect = receiver.recv().await.unwrap();
        assert_eq!(effect.event.as_deref(), Some("effect"));
    }

    #[tokio::test]
    async fn repeated_sound_bumps_fire_one_effect_each() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        test_sound(&state).await;
        test_sound(&state).await;

        let mut effects = 0;
        while let Ok(event) = receiver.try_recv() {
            if event.event.as_deref() == Some("effect") {
                effects += 1;
            }
        }
        assert_eq!(effects, 2);
    }
}
