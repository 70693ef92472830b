//! Effect dispatcher mapping ticks and commands to at-most-once effects.

use crate::state::{
    countdown::{CountdownPhase, Tick},
    settings::Command,
};

/// Seconds-remaining threshold below which the final-countdown tick sound
/// plays.
const TICK_SOUND_WINDOW: u8 = 10;

/// Effect invocation handed to the broadcast layer.
///
/// Effects are fire-and-forget: the dispatcher decides *whether* an
/// effect fires, never tracks its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Single fireworks burst.
    FireworksBurst,
    /// Celebration sequence: one burst now, two more at fixed delays.
    CelebrationSequence,
    /// Per-second tick sound during the final countdown.
    TickSound {
        /// Seconds remaining when the sound fires.
        second: u8,
    },
    /// Operator-requested test sound.
    TestSound,
}

/// Decides which effects a tick or command produces.
///
/// The per-second memo guarantees the tick sound fires at most once per
/// distinct seconds value even when ticks are recomputed or replayed.
#[derive(Debug, Default)]
pub struct EffectDispatcher {
    last_tick_sound_second: Option<u8>,
}

impl EffectDispatcher {
    /// Create a dispatcher with an empty tick-sound memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one engine tick to its effects.
    pub fn on_tick(&mut self, tick: &Tick) -> Vec<Effect> {
        let mut effects = Vec::new();

        if tick.entered_celebration {
            effects.push(Effect::CelebrationSequence);
        }

        match tick.phase {
            CountdownPhase::Final => {
                let second = tick.remaining.seconds;
                if second > 0
                    && second <= TICK_SOUND_WINDOW
                    && self.last_tick_sound_second != Some(second)
                {
                    self.last_tick_sound_second = Some(second);
                    effects.push(Effect::TickSound { second });
                }
            }
            // Leaving the final countdown clears the memo so a rehearsal
            // run through the same seconds values plays again.
            CountdownPhase::Normal | CountdownPhase::Celebration => {
                self.last_tick_sound_second = None;
            }
        }

        effects
    }

    /// Map a remote one-shot command to its effect, independent of phase.
    pub fn on_command(&self, command: Command) -> Effect {
        match command {
            Command::LaunchFireworks => Effect::FireworksBurst,
            Command::PlaySound => Effect::TestSound,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::state::countdown::TimeRemaining;

    use super::*;

    fn final_tick(seconds: u8) -> Tick {
        Tick {
            remaining: TimeRemaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds,
            },
            phase: CountdownPhase::Final,
            entered_celebration: false,
        }
    }

    fn celebration_tick(entered: bool) -> Tick {
        Tick {
            remaining: TimeRemaining::ZERO,
            phase: CountdownPhase::Celebration,
            entered_celebration: entered,
        }
    }

    #[test]
    fn tick_sound_fires_once_per_second_value() {
        let mut dispatcher = EffectDispatcher::new();
        let tick = final_tick(7);

        assert_eq!(
            dispatcher.on_tick(&tick),
            vec![Effect::TickSound { second: 7 }]
        );
        // Re-render storm: same second observed again.
        assert!(dispatcher.on_tick(&tick).is_empty());
        assert_eq!(
            dispatcher.on_tick(&final_tick(6)),
            vec![Effect::TickSound { second: 6 }]
        );
    }

    #[test]
    fn tick_sound_only_inside_last_ten_seconds() {
        let mut dispatcher = EffectDispatcher::new();
        assert!(dispatcher.on_tick(&final_tick(45)).is_empty());
        assert!(dispatcher.on_tick(&final_tick(11)).is_empty());
        assert!(!dispatcher.on_tick(&final_tick(10)).is_empty());
    }

    #[test]
    fn celebration_sequence_only_on_entry() {
        let mut dispatcher = EffectDispatcher::new();
        assert_eq!(
            dispatcher.on_tick(&celebration_tick(true)),
            vec![Effect::CelebrationSequence]
        );
        assert!(dispatcher.on_tick(&celebration_tick(false)).is_empty());
    }

    #[test]
    fn memo_clears_when_leaving_final_phase() {
        let mut dispatcher = EffectDispatcher::new();
        dispatcher.on_tick(&final_tick(10));
        dispatcher.on_tick(&celebration_tick(true));

        // Rehearsal reversal walks through second 10 again.
        assert_eq!(
            dispatcher.on_tick(&final_tick(10)),
            vec![Effect::TickSound { second: 10 }]
        );
    }

    #[test]
    fn commands_fire_regardless_of_phase_state() {
        let dispatcher = EffectDispatcher::new();
        assert_eq!(
            dispatcher.on_command(Command::LaunchFireworks),
            Effect::FireworksBurst
        );
        assert_eq!(dispatcher.on_command(Command::PlaySound), Effect::TestSound);
    }
}
