//! Countdown engine deriving time remaining and display phase from the clock.

use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Decomposed time remaining until the effective target.
///
/// Each unit is taken modulo its parent span, so the value can be
/// reassembled as `days*86400 + hours*3600 + minutes*60 + seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeRemaining {
    /// Whole days remaining.
    pub days: u64,
    /// Hours remaining within the current day (0..24).
    pub hours: u8,
    /// Minutes remaining within the current hour (0..60).
    pub minutes: u8,
    /// Seconds remaining within the current minute (0..60).
    pub seconds: u8,
}

impl TimeRemaining {
    /// All-zero remaining time, displayed once the target has been reached.
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a whole-second count by truncation at each unit boundary.
    fn from_seconds(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: ((total / 3_600) % 24) as u8,
            minutes: ((total / 60) % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    /// Reassemble the decomposition into a whole-second count.
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400
            + u64::from(self.hours) * 3_600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }
}

/// Display phase derived from the distance to the effective target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    /// All units shown; a minute or more remains.
    Normal,
    /// Last minute: days, hours, and minutes are zero with seconds left.
    Final,
    /// The target has been reached (or force-elapsed by an operator).
    Celebration,
}

/// Outcome of a single engine tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Time left until the effective target, zero once elapsed.
    pub remaining: TimeRemaining,
    /// Display phase for this tick.
    pub phase: CountdownPhase,
    /// True exactly once per celebration entry; drives the one-shot
    /// celebration effect sequence.
    pub entered_celebration: bool,
}

/// Stateful countdown engine.
///
/// The only state is the celebration latch: it guarantees the celebration
/// sequence fires once per arrival, survives repeated ticks past the
/// target, and resets when an operator moves the target back into the
/// future so a later genuine arrival fires again.
#[derive(Debug, Default)]
pub struct CountdownEngine {
    celebration_latched: bool,
}

impl CountdownEngine {
    /// Create an engine with the latch cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute remaining time and phase from scratch.
    ///
    /// Idempotent with respect to `(now, target)`: calling it twice with
    /// the same inputs yields the same output and sets
    /// `entered_celebration` at most once.
    pub fn tick(&mut self, now: OffsetDateTime, target: OffsetDateTime) -> Tick {
        let difference = target - now;

        if difference <= time::Duration::ZERO {
            let entered = !self.celebration_latched;
            self.celebration_latched = true;
            return Tick {
                remaining: TimeRemaining::ZERO,
                phase: CountdownPhase::Celebration,
                entered_celebration: entered,
            };
        }

        // Target moved back into the future: unlatch so the next arrival
        // fires the celebration sequence again.
        self.celebration_latched = false;

        let total = difference.whole_seconds() as u64;
        let remaining = TimeRemaining::from_seconds(total);
        let phase = if remaining.days == 0
            && remaining.hours == 0
            && remaining.minutes == 0
            && remaining.seconds > 0
        {
            CountdownPhase::Final
        } else {
            CountdownPhase::Normal
        };

        Tick {
            remaining,
            phase,
            entered_celebration: false,
        }
    }

    /// Whether the celebration sequence has fired for the current arrival.
    pub fn is_latched(&self) -> bool {
        self.celebration_latched
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const TARGET: OffsetDateTime = datetime!(2026-01-01 00:00 +7);

    #[test]
    fn decomposition_bounds_and_reassembly() {
        let mut engine = CountdownEngine::new();
        // Sample a spread of offsets, including unit boundaries.
        let offsets = [
            1i64, 59, 60, 61, 3_599, 3_600, 3_601, 86_399, 86_400, 86_401, 123_456, 31_536_000,
        ];
        for offset in offsets {
            let now = TARGET - time::Duration::seconds(offset);
            let tick = engine.tick(now, TARGET);
            assert!(tick.remaining.hours < 24);
            assert!(tick.remaining.minutes < 60);
            assert!(tick.remaining.seconds < 60);
            assert_eq!(tick.remaining.total_seconds(), offset as u64);
        }
    }

    #[test]
    fn sub_second_remainder_truncates() {
        let mut engine = CountdownEngine::new();
        let now = TARGET - time::Duration::milliseconds(65_500);
        let tick = engine.tick(now, TARGET);
        assert_eq!(tick.remaining.minutes, 1);
        assert_eq!(tick.remaining.seconds, 5);
    }

    #[test]
    fn exactly_zero_difference_is_celebration() {
        let mut engine = CountdownEngine::new();
        let tick = engine.tick(TARGET, TARGET);
        assert_eq!(tick.phase, CountdownPhase::Celebration);
        assert_eq!(tick.remaining, TimeRemaining::ZERO);
        assert!(tick.entered_celebration);
    }

    #[test]
    fn final_phase_only_when_seconds_alone_remain() {
        let mut engine = CountdownEngine::new();

        let tick = engine.tick(TARGET - time::Duration::seconds(45), TARGET);
        assert_eq!(tick.phase, CountdownPhase::Final);

        let tick = engine.tick(TARGET - time::Duration::seconds(60), TARGET);
        assert_eq!(tick.phase, CountdownPhase::Normal);

        let tick = engine.tick(TARGET - time::Duration::hours(2), TARGET);
        assert_eq!(tick.phase, CountdownPhase::Normal);
    }

    #[test]
    fn tick_is_idempotent() {
        let mut engine = CountdownEngine::new();
        let now = TARGET - time::Duration::seconds(90);
        let first = engine.tick(now, TARGET);
        let second = engine.tick(now, TARGET);
        assert_eq!(first, second);
    }

    #[test]
    fn celebration_entered_once_across_repeated_ticks() {
        let mut engine = CountdownEngine::new();
        let mut entries = 0;
        for elapsed in 0..5 {
            let now = TARGET + time::Duration::seconds(elapsed);
            if engine.tick(now, TARGET).entered_celebration {
                entries += 1;
            }
        }
        assert_eq!(entries, 1);
    }

    #[test]
    fn one_second_target_walks_final_then_celebration() {
        let mut engine = CountdownEngine::new();
        let start = TARGET - time::Duration::seconds(1);

        let first = engine.tick(start, TARGET);
        assert_eq!(first.phase, CountdownPhase::Final);
        assert_eq!(first.remaining.seconds, 1);

        let second = engine.tick(start + time::Duration::seconds(1), TARGET);
        assert_eq!(second.phase, CountdownPhase::Celebration);
        assert!(second.entered_celebration);

        let third = engine.tick(start + time::Duration::seconds(2), TARGET);
        assert_eq!(third.phase, CountdownPhase::Celebration);
        assert!(!third.entered_celebration);
    }

    #[test]
    fn reversal_resets_latch_and_refires() {
        let mut engine = CountdownEngine::new();

        assert!(engine.tick(TARGET, TARGET).entered_celebration);
        assert!(engine.is_latched());

        // Operator pushes a simulated target 90 seconds out.
        let rehearsal = TARGET + time::Duration::seconds(95);
        let tick = engine.tick(TARGET + time::Duration::seconds(5), rehearsal);
        assert_eq!(tick.phase, CountdownPhase::Normal);
        assert!(!engine.is_latched());

        // The rehearsal arrival fires the full sequence again.
        let tick = engine.tick(rehearsal, rehearsal);
        assert!(tick.entered_celebration);
    }

    #[test]
    fn negative_difference_never_yields_negative_units() {
        let mut engine = CountdownEngine::new();
        let tick = engine.tick(TARGET + time::Duration::days(3), TARGET);
        assert_eq!(tick.remaining, TimeRemaining::ZERO);
        assert_eq!(tick.phase, CountdownPhase::Celebration);
    }
}
