//! One-shot auto-execute countdown.
//!
//! Once a registration is observed, the view arms a fixed-duration countdown
//! that triggers `execute()` on expiry. The state machine here guarantees at
//! most one fire per registration event: each arm consumes a monotonic
//! registration token, and a consumed token can never re-arm, so a cancelled
//! or fired countdown cannot restart off an unrelated re-render.

/// Number of ticks the auto-execute countdown runs before firing.
pub const AUTO_EXECUTE_TICKS: u32 = 10;

/// Phase of the countdown state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// No countdown has been armed for the current token.
    Idle,
    /// Counting down toward a fire.
    Counting,
    /// The countdown reached zero and fired.
    Fired,
    /// The countdown was cancelled before reaching zero.
    Cancelled,
}

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running; nothing happened.
    Idle,
    /// Still counting; this many ticks remain.
    Remaining(u32),
    /// The countdown reached zero on this tick. Trigger execute now; further
    /// ticks are no-ops until a new token is armed.
    Fire,
}

/// One-shot countdown keyed by a monotonic registration token.
#[derive(Debug, Clone)]
pub struct AutoExecuteCountdown {
    phase: CountdownPhase,
    remaining: u32,
    duration: u32,
    token: Option<u64>,
}

impl AutoExecuteCountdown {
    /// Create a countdown with the default duration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(AUTO_EXECUTE_TICKS)
    }

    /// Create a countdown with a custom duration in ticks.
    #[must_use]
    pub fn with_duration(ticks: u32) -> Self {
        Self { phase: CountdownPhase::Idle, remaining: 0, duration: ticks.max(1), token: None }
    }

    /// Arm the countdown for a registration token.
    ///
    /// A token is consumed the moment it arms; whether that countdown later
    /// fires or gets cancelled, the same token can never arm again. Only a
    /// strictly newer token starts a new countdown. Returns whether the
    /// countdown actually started.
    pub fn arm(&mut self, token: u64) -> bool {
        if self.token.is_some_and(|seen| seen >= token) {
            return false;
        }
        self.token = Some(token);
        self.phase = CountdownPhase::Counting;
        self.remaining = self.duration;
        true
    }

    /// Advance the countdown by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != CountdownPhase::Counting {
            return TickOutcome::Idle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.phase = CountdownPhase::Fired;
            TickOutcome::Fire
        } else {
            TickOutcome::Remaining(self.remaining)
        }
    }

    /// Cancel a running countdown. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.phase == CountdownPhase::Counting {
            self.phase = CountdownPhase::Cancelled;
            true
        } else {
            false
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Ticks remaining, while counting.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        (self.phase == CountdownPhase::Counting).then_some(self.remaining)
    }

    /// Whether a countdown is currently running.
    #[must_use]
    pub fn is_counting(&self) -> bool {
        self.phase == CountdownPhase::Counting
    }
}

impl Default for AutoExecuteCountdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_fires_exactly_once() {
        let mut countdown = AutoExecuteCountdown::with_duration(3);
        assert!(countdown.arm(1));
        assert_eq!(countdown.tick(), TickOutcome::Remaining(2));
        assert_eq!(countdown.tick(), TickOutcome::Remaining(1));
        assert_eq!(countdown.tick(), TickOutcome::Fire);
        assert_eq!(countdown.phase(), CountdownPhase::Fired);

        // Ticking past the fire never fires again.
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_default_duration_ticks_to_zero() {
        let mut countdown = AutoExecuteCountdown::new();
        countdown.arm(1);
        let mut fires = 0;
        for _ in 0..AUTO_EXECUTE_TICKS {
            if countdown.tick() == TickOutcome::Fire {
                fires += 1;
            }
        }
        assert_eq!(fires, 1);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut countdown = AutoExecuteCountdown::with_duration(5);
        countdown.arm(1);
        countdown.tick();
        assert!(countdown.cancel());
        assert_eq!(countdown.phase(), CountdownPhase::Cancelled);
        for _ in 0..10 {
            assert_eq!(countdown.tick(), TickOutcome::Idle);
        }
    }

    #[test]
    fn test_consumed_token_never_rearms() {
        let mut countdown = AutoExecuteCountdown::with_duration(5);
        assert!(countdown.arm(1));
        countdown.cancel();

        // The precondition may still hold on later renders, but token 1 has
        // been consumed; only a newer registration event re-arms.
        assert!(!countdown.arm(1));
        assert!(!countdown.is_counting());

        assert!(countdown.arm(2));
        assert!(countdown.is_counting());
    }

    #[test]
    fn test_rearm_while_counting_is_noop_for_same_token() {
        let mut countdown = AutoExecuteCountdown::with_duration(5);
        countdown.arm(1);
        countdown.tick();
        assert!(!countdown.arm(1));
        assert_eq!(countdown.remaining(), Some(4));
    }

    #[test]
    fn test_remaining_outside_counting_is_none() {
        let mut countdown = AutoExecuteCountdown::with_duration(2);
        assert_eq!(countdown.remaining(), None);
        countdown.arm(1);
        assert_eq!(countdown.remaining(), Some(2));
        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.remaining(), None);
    }

    #[test]
    fn test_zero_duration_clamps_to_one_tick() {
        let mut countdown = AutoExecuteCountdown::with_duration(0);
        countdown.arm(1);
        assert_eq!(countdown.tick(), TickOutcome::Fire);
    }
}
