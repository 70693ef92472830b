//! Effective-target resolution from the settings record.

use time::OffsetDateTime;

use crate::state::settings::SettingsRecord;

/// Resolve the instant the countdown runs toward.
///
/// Priority: the force flag elapses the countdown immediately (it wins
/// over everything, including an active simulation); otherwise a
/// simulated target overrides the configured default; otherwise the
/// default instant applies. The default is timezone-qualified at
/// configuration time, so every client resolves the same instant.
pub fn resolve(settings: &SettingsRecord, default_target: OffsetDateTime) -> OffsetDateTime {
    if settings.is_force_new_year {
        // Any instant already in the past forces an elapsed countdown.
        return OffsetDateTime::UNIX_EPOCH;
    }

    settings.simulation_timestamp.unwrap_or(default_target)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const DEFAULT: OffsetDateTime = datetime!(2026-01-01 00:00 +7);

    #[test]
    fn default_target_applies_without_overrides() {
        let settings = SettingsRecord::default();
        assert_eq!(resolve(&settings, DEFAULT), DEFAULT);
    }

    #[test]
    fn default_target_is_a_fixed_instant_across_timezones() {
        // +07:00 midnight is 17:00 UTC on New Year's Eve everywhere.
        assert_eq!(DEFAULT, datetime!(2025-12-31 17:00 UTC));
    }

    #[test]
    fn simulation_overrides_default() {
        let simulated = datetime!(2025-12-30 10:00 UTC);
        let settings = SettingsRecord {
            simulation_timestamp: Some(simulated),
            ..SettingsRecord::default()
        };
        assert_eq!(resolve(&settings, DEFAULT), simulated);
    }

    #[test]
    fn force_flag_overrides_simulation() {
        let settings = SettingsRecord {
            is_force_new_year: true,
            simulation_timestamp: Some(datetime!(2099-01-01 00:00 UTC)),
            ..SettingsRecord::default()
        };
        let resolved = resolve(&settings, DEFAULT);
        assert!(resolved < OffsetDateTime::now_utc());
    }
}
