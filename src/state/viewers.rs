//! Cosmetic viewer-count estimator: a floored random walk with a surge
//! window around the target instant.

use rand::Rng;
use time::{Duration, OffsetDateTime};

/// How long before the target the surge window opens.
const SURGE_LOOKBACK: Duration = Duration::minutes(10);
/// How long after the target the surge window stays open.
const SURGE_LOOKAHEAD: Duration = Duration::minutes(1);

/// Random-walk viewer estimator.
///
/// Normal mode is a small symmetric walk bounded below by the floor.
/// Inside the surge window the walk is biased upward toward a band and
/// then oscillates within it. The walk value is blended with the admin
/// boost and the live connection count by [`ViewerEstimator::displayed`].
#[derive(Debug)]
pub struct ViewerEstimator {
    walk: i64,
    floor: i64,
    band_low: i64,
    band_high: i64,
}

impl ViewerEstimator {
    /// Create an estimator starting at `seed`, never dropping below
    /// `floor`. The surge band scales off the floor.
    pub fn new(seed: u32, floor: u32) -> Self {
        let floor = i64::from(floor);
        Self {
            walk: i64::from(seed).max(floor),
            floor,
            band_low: floor * 8,
            band_high: floor * 12,
        }
    }

    /// Advance the walk one step and return the new raw value.
    pub fn step<R: Rng>(
        &mut self,
        rng: &mut R,
        now: OffsetDateTime,
        target: OffsetDateTime,
    ) -> u64 {
        let delta = if self.in_surge_window(now, target) {
            if self.walk < self.band_low {
                rng.random_range(10..=60)
            } else if self.walk > self.band_high {
                -rng.random_range(10..=60)
            } else {
                rng.random_range(-15..=15)
            }
        } else {
            rng.random_range(-2..=2)
        };

        self.walk = (self.walk + delta).max(self.floor);
        self.walk as u64
    }

    /// Current raw walk value.
    pub fn current(&self) -> u64 {
        self.walk as u64
    }

    /// Blend the walk with the admin boost and the live connection count.
    pub fn displayed(walk: u64, extra_viewers: u32, live_connections: u64) -> u64 {
        walk.saturating_add(u64::from(extra_viewers))
            .saturating_add(live_connections)
    }

    fn in_surge_window(&self, now: OffsetDateTime, target: OffsetDateTime) -> bool {
        now >= target - SURGE_LOOKBACK && now <= target + SURGE_LOOKAHEAD
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const TARGET: OffsetDateTime = datetime!(2026-01-01 00:00 +7);

    #[test]
    fn walk_never_drops_below_floor() {
        let mut estimator = ViewerEstimator::new(124, 100);
        let mut rng = rand::rng();
        let now = TARGET - Duration::days(2);
        for _ in 0..1_000 {
            assert!(estimator.step(&mut rng, now, TARGET) >= 100);
        }
    }

    #[test]
    fn seed_below_floor_is_clamped() {
        let estimator = ViewerEstimator::new(10, 100);
        assert_eq!(estimator.current(), 100);
    }

    #[test]
    fn surge_window_pulls_walk_into_band() {
        let mut estimator = ViewerEstimator::new(124, 100);
        let mut rng = rand::rng();
        let now = TARGET - Duration::minutes(5);
        for _ in 0..500 {
            estimator.step(&mut rng, now, TARGET);
        }
        // Enough biased steps to reach the band; the walk may oscillate
        // slightly below its lower edge afterwards.
        assert!(estimator.current() >= 700);
    }

    #[test]
    fn outside_window_walk_stays_small() {
        let mut estimator = ViewerEstimator::new(124, 100);
        let mut rng = rand::rng();
        let now = TARGET - Duration::hours(6);
        for _ in 0..100 {
            estimator.step(&mut rng, now, TARGET);
        }
        // 100 steps of at most +-2 cannot escape this envelope.
        assert!(estimator.current() <= 124 + 200);
    }

    #[test]
    fn displayed_count_blends_and_saturates() {
        assert_eq!(ViewerEstimator::displayed(124, 500, 3), 627);
        assert_eq!(ViewerEstimator::displayed(u64::MAX, 1, 1), u64::MAX);
    }
}
