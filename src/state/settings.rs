//! Shared settings record and the command channel that diffs its updates.

use time::OffsetDateTime;

/// Latest image of the singleton settings row.
///
/// The row is the only coordination point between the admin surface and
/// viewers: `extra_viewers`, `is_force_new_year`, and
/// `simulation_timestamp` are level-triggered (the current value is
/// authoritative), while `trigger_fireworks` and `test_sound` smuggle
/// one-shot commands into the row as timestamp bumps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsRecord {
    /// Operator-controlled boost added to the displayed viewer count.
    pub extra_viewers: u32,
    /// When set, the effective target is forced into the past.
    pub is_force_new_year: bool,
    /// Overrides the real target instant for rehearsals.
    pub simulation_timestamp: Option<OffsetDateTime>,
    /// Marker whose *change* requests a one-shot fireworks burst.
    pub trigger_fireworks: Option<OffsetDateTime>,
    /// Marker whose *change* requests a one-shot sound effect.
    pub test_sound: Option<OffsetDateTime>,
}

/// One-shot command decoded from a settings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fire an immediate fireworks burst on every viewer.
    LaunchFireworks,
    /// Play the test sound on every viewer.
    PlaySound,
}

/// Per-field last-seen values backing edge detection.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Baseline {
    fireworks: Option<OffsetDateTime>,
    sound: Option<OffsetDateTime>,
}

impl Baseline {
    fn of(record: &SettingsRecord) -> Self {
        Self {
            fireworks: record.trigger_fireworks,
            sound: record.test_sound,
        }
    }
}

/// Edge detector for the one-shot command fields.
///
/// Commands are triggered by value *inequality* against the last-seen
/// value, never by truthiness, so re-observing the same row is a no-op.
/// The baseline is seeded from the first snapshot a session observes;
/// commands issued before that snapshot are never replayed.
#[derive(Debug, Default)]
pub struct CommandTracker {
    baseline: Option<Baseline>,
}

impl CommandTracker {
    /// Create a tracker with no baseline; the first observation seeds it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the baseline to `record` without emitting commands.
    ///
    /// Called when the storage layer reconnects and the row is re-fetched:
    /// edges that happened during the outage are deliberately dropped.
    pub fn reseed(&mut self, record: &SettingsRecord) {
        self.baseline = Some(Baseline::of(record));
    }

    /// Diff `record` against the baseline and return the commands whose
    /// fields changed, updating the baseline in the same step.
    pub fn observe(&mut self, record: &SettingsRecord) -> Vec<Command> {
        let Some(baseline) = &self.baseline else {
            self.reseed(record);
            return Vec::new();
        };

        let mut commands = Vec::new();
        if record.trigger_fireworks != baseline.fireworks {
            commands.push(Command::LaunchFireworks);
        }
        if record.test_sound != baseline.sound {
            commands.push(Command::PlaySound);
        }

        self.baseline = Some(Baseline::of(record));
        commands
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn record_with_fireworks(stamp: Option<OffsetDateTime>) -> SettingsRecord {
        SettingsRecord {
            trigger_fireworks: stamp,
            ..SettingsRecord::default()
        }
    }

    #[test]
    fn first_snapshot_seeds_without_replay() {
        let mut tracker = CommandTracker::new();
        let record = record_with_fireworks(Some(datetime!(2025-12-31 12:00 UTC)));
        assert!(tracker.observe(&record).is_empty());
    }

    #[test]
    fn same_value_never_refires() {
        let mut tracker = CommandTracker::new();
        let record = record_with_fireworks(Some(datetime!(2025-12-31 12:00 UTC)));
        tracker.observe(&record);
        assert!(tracker.observe(&record).is_empty());
        assert!(tracker.observe(&record).is_empty());
    }

    #[test]
    fn edge_trigger_counts_value_transitions() {
        // Value sequence [A, A, B, B, A] fires exactly twice.
        let a = record_with_fireworks(Some(datetime!(2025-12-31 12:00 UTC)));
        let b = record_with_fireworks(Some(datetime!(2025-12-31 12:05 UTC)));

        let mut tracker = CommandTracker::new();
        tracker.reseed(&a);

        let fired: usize = [&a, &a, &b, &b, &a]
            .into_iter()
            .map(|record| tracker.observe(record).len())
            .sum();
        assert_eq!(fired, 2);
    }

    #[test]
    fn both_command_fields_are_independent() {
        let mut tracker = CommandTracker::new();
        tracker.reseed(&SettingsRecord::default());

        let update = SettingsRecord {
            trigger_fireworks: Some(datetime!(2025-12-31 23:59 UTC)),
            test_sound: Some(datetime!(2025-12-31 23:59 UTC)),
            ..SettingsRecord::default()
        };
        let commands = tracker.observe(&update);
        assert!(commands.contains(&Command::LaunchFireworks));
        assert!(commands.contains(&Command::PlaySound));
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn level_fields_do_not_emit_commands() {
        let mut tracker = CommandTracker::new();
        tracker.reseed(&SettingsRecord::default());

        let update = SettingsRecord {
            extra_viewers: 500,
            is_force_new_year: true,
            simulation_timestamp: Some(datetime!(2026-01-01 00:00 +7)),
            ..SettingsRecord::default()
        };
        assert!(tracker.observe(&update).is_empty());
    }

    #[test]
    fn reseed_skips_edges_missed_during_outage() {
        let before = record_with_fireworks(Some(datetime!(2025-12-31 12:00 UTC)));
        let after = record_with_fireworks(Some(datetime!(2025-12-31 12:30 UTC)));

        let mut tracker = CommandTracker::new();
        tracker.reseed(&before);
        // Outage: the bump to `after` is only seen via the re-fetched row.
        tracker.reseed(&after);
        assert!(tracker.observe(&after).is_empty());
    }
}
