//! Storage entities for the settings row and wishes, plus domain
//! conversions.
//!
//! Timestamps are persisted as RFC 3339 strings; an unparseable stored
//! value degrades to `None` (with a warning) so target resolution falls
//! back to the configured default instant.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::warn;
use uuid::Uuid;

use crate::state::settings::SettingsRecord;

/// Fixed identifier of the singleton settings row.
pub const SETTINGS_DOC_ID: i32 = 1;

/// Persisted image of the settings row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsEntity {
    /// Always [`SETTINGS_DOC_ID`]; the row is a singleton.
    #[serde(rename = "_id")]
    pub id: i32,
    /// Viewer-count boost.
    pub extra_viewers: i64,
    /// Force-elapse flag.
    pub is_force_new_year: bool,
    /// Simulated target instant, RFC 3339.
    pub simulation_timestamp: Option<String>,
    /// Fireworks one-shot marker, RFC 3339.
    pub trigger_fireworks: Option<String>,
    /// Sound one-shot marker, RFC 3339.
    pub test_sound: Option<String>,
}

impl SettingsEntity {
    /// Entity image of the given domain record.
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            id: SETTINGS_DOC_ID,
            extra_viewers: i64::from(record.extra_viewers),
            is_force_new_year: record.is_force_new_year,
            simulation_timestamp: format_stamp(record.simulation_timestamp),
            trigger_fireworks: format_stamp(record.trigger_fireworks),
            test_sound: format_stamp(record.test_sound),
        }
    }

    /// Domain record carried by this entity.
    pub fn into_record(self) -> SettingsRecord {
        SettingsRecord {
            extra_viewers: self.extra_viewers.clamp(0, i64::from(u32::MAX)) as u32,
            is_force_new_year: self.is_force_new_year,
            simulation_timestamp: parse_stamp("simulation_timestamp", self.simulation_timestamp),
            trigger_fireworks: parse_stamp("trigger_fireworks", self.trigger_fireworks),
            test_sound: parse_stamp("test_sound", self.test_sound),
        }
    }
}

impl Default for SettingsEntity {
    fn default() -> Self {
        Self::from_record(&SettingsRecord::default())
    }
}

/// Persisted wish, append-only and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishEntity {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Viewer-submitted message, already validated and filtered.
    pub message: String,
    /// Server-assigned creation instant, RFC 3339.
    pub created_at: String,
}

impl WishEntity {
    /// Build a new wish with a fresh id and the current instant.
    pub fn new(message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            created_at: format_stamp(Some(OffsetDateTime::now_utc())).unwrap_or_default(),
        }
    }
}

fn format_stamp(stamp: Option<OffsetDateTime>) -> Option<String> {
    stamp.and_then(|value| value.format(&Rfc3339).ok())
}

fn parse_stamp(field: &str, raw: Option<String>) -> Option<OffsetDateTime> {
    let raw = raw?;
    match OffsetDateTime::parse(&raw, &Rfc3339) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(field, raw, error = %err, "unparseable stored timestamp; ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn record_round_trips_through_entity() {
        let record = SettingsRecord {
            extra_viewers: 750,
            is_force_new_year: true,
            simulation_timestamp: Some(datetime!(2026-01-01 00:00 +7)),
            trigger_fireworks: Some(datetime!(2025-12-31 23:59:59 UTC)),
            test_sound: None,
        };
        let entity = SettingsEntity::from_record(&record);
        assert_eq!(entity.id, SETTINGS_DOC_ID);
        assert_eq!(entity.into_record(), record);
    }

    #[test]
    fn malformed_stored_timestamp_degrades_to_none() {
        let entity = SettingsEntity {
            simulation_timestamp: Some("not-a-timestamp".into()),
            ..SettingsEntity::default()
        };
        let record = entity.into_record();
        assert!(record.simulation_timestamp.is_none());
    }

    #[test]
    fn negative_stored_boost_clamps_to_zero() {
        let entity = SettingsEntity {
            extra_viewers: -5,
            ..SettingsEntity::default()
        };
        assert_eq!(entity.into_record().extra_viewers, 0);
    }

    #[test]
    fn new_wish_carries_id_and_timestamp() {
        let wish = WishEntity::new("Happy 2026!".into());
        assert_eq!(wish.message, "Happy 2026!");
        assert!(!wish.created_at.is_empty());
    }
}
