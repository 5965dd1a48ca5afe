/// Identifies one started countdown. Ticks carrying an older token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// What a single one-second tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { seconds_left: u32 },
    /// The countdown reached zero on this tick.
    Expired,
    /// The token belongs to a cancelled or superseded countdown; nothing changed.
    Stale,
}

/// Per-question countdown owned by the session.
///
/// The driver (a UI loop or a test) calls `tick` once per second with the
/// token it got from `start`. `cancel` and `start` both invalidate earlier
/// tokens, so a late tick can never touch the next question.
#[derive(Debug, Clone)]
pub struct QuestionTimer {
    limit: u32,
    seconds_left: u32,
    generation: u64,
    running: bool,
}

impl QuestionTimer {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            seconds_left: limit,
            generation: 0,
            running: false,
        }
    }

    /// Reset to the full limit and start counting down.
    pub fn start(&mut self) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.seconds_left = self.limit;
        self.running = true;
        TimerToken(self.generation)
    }

    /// Stop the countdown, keeping the seconds that were left.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, token: TimerToken) -> TickOutcome {
        if !self.running || token != TimerToken(self.generation) {
            return TickOutcome::Stale;
        }

        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                seconds_left: self.seconds_left,
            }
        }
    }

    /// Token of the running countdown, if any.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.running.then_some(TimerToken(self.generation))
    }

    #[must_use]
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}
