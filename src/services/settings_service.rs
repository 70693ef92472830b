//! Applies settings row images to the in-memory state and fans out the
//! resulting change notifications.

use crate::{
    dto::{
        common::SettingsSnapshot,
        sse::{SettingsChangedEvent, ServerEvent},
    },
    services::effect_service,
    state::{SharedState, settings::SettingsRecord},
};

/// Apply a freshly written settings row.
///
/// The row image replaces the last-known copy, the one-shot command fields
/// are diffed against the tracker baseline, and both the `settings` event and
/// any triggered effects are broadcast to subscribers.
pub async fn apply_update(state: &SharedState, record: SettingsRecord) {
    {
        let mut guard = state.settings().write().await;
        *guard = record.clone();
    }

    let commands = {
        let mut tracker = state.tracker().lock().await;
        tracker.observe(&record)
    };

    broadcast_settings(state, &record);

    for command in commands {
        let effect = {
            let runtime = state.runtime().lock().await;
            runtime.dispatcher.on_command(command)
        };
        effect_service::dispatch(state, effect);
    }
}

/// Adopt a row image loaded from storage without replaying its command
/// fields.
///
/// Used after (re)connecting to storage: whatever the one-shot fields held
/// while we were away becomes the new baseline and must not fire effects.
pub async fn reseed(state: &SharedState, record: SettingsRecord) {
    {
        let mut guard = state.settings().write().await;
        *guard = record.clone();
    }

    {
        let mut tracker = state.tracker().lock().await;
        tracker.reseed(&record);
    }

    broadcast_settings(state, &record);
}

fn broadcast_settings(state: &SharedState, record: &SettingsRecord) {
    let event = SettingsChangedEvent(SettingsSnapshot::from(record));
    if let Ok(payload) = ServerEvent::json(Some("settings".to_string()), &event) {
        state.public_sse().broadcast(payload.clone());
        state.admin_sse().broadcast(payload);
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn command_edge_broadcasts_settings_then_effect() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        let mut record = SettingsRecord::default();
        apply_update(&state, record.clone()).await;
        let seeded = receiver.recv().await.unwrap();
        assert_eq!(seeded.event.as_deref(), Some("settings"));

        record.trigger_fireworks = Some(OffsetDateTime::now_utc());
        apply_update(&state, record).await;
        let changed = receiver.recv().await.unwrap();
        assert_eq!(changed.event.as_deref(), Some("settings"));
        let effect = receiver.recv().await.unwrap();
        assert_eq!(effect.event.as_deref(), Some("effect"));
    }

    #[tokio::test]
    async fn reseed_never_replays_stored_commands() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        let record = SettingsRecord {
            trigger_fireworks: Some(OffsetDateTime::now_utc()),
            test_sound: Some(OffsetDateTime::now_utc()),
            ..SettingsRecord::default()
        };
        reseed(&state, record).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("settings"));
        assert!(receiver.try_recv().is_err());
    }
}
