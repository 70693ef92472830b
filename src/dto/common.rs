//! Projections shared between REST responses and SSE payloads.

use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::state::{
    countdown::{CountdownPhase, TimeRemaining},
    settings::SettingsRecord,
};

/// Wire image of the settings row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsSnapshot {
    /// Viewer-count boost.
    pub extra_viewers: u32,
    /// Force-elapse flag.
    pub is_force_new_year: bool,
    /// Simulated target instant, when active.
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub simulation_timestamp: Option<OffsetDateTime>,
    /// Fireworks one-shot marker.
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub trigger_fireworks: Option<OffsetDateTime>,
    /// Sound one-shot marker.
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub test_sound: Option<OffsetDateTime>,
}

impl From<&SettingsRecord> for SettingsSnapshot {
    fn from(record: &SettingsRecord) -> Self {
        Self {
            extra_viewers: record.extra_viewers,
            is_force_new_year: record.is_force_new_year,
            simulation_timestamp: record.simulation_timestamp,
            trigger_fireworks: record.trigger_fireworks,
            test_sound: record.test_sound,
        }
    }
}

/// Current countdown state as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountdownSnapshot {
    /// Time left until the effective target.
    pub remaining: TimeRemaining,
    /// Display phase.
    pub phase: CountdownPhase,
    /// The instant currently counted down to.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub target: OffsetDateTime,
}
