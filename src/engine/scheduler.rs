// ============================================================================
// Scheduler
// Cancellable countdown and deferred transitions on a virtual clock
// ============================================================================
//
// The session runs on elapsed time handed in by its driver rather than on
// OS timers. Two slots exist:
// - countdown: recurring, fires once per TICK_PERIOD
// - deferred: one-shot, fires a DeferredAction after a delay
//
// Arming a slot cancels whatever it held, so at most one countdown and one
// deferred transition are pending at any instant. Every arm hands out a fresh
// TimerToken; a fired token that no longer matches the slot is stale.

use std::time::Duration;

/// Countdown resolution
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identity of one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Work scheduled to run after the feedback pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    NextRound,
    GameOver,
}

/// Something that became due while time elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Tick(TimerToken),
    Deferred(TimerToken, DeferredAction),
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    token: TimerToken,
    next_tick_in: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Deferred {
    token: TimerToken,
    action: DeferredAction,
    due_in: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_token: u64,
    countdown: Option<Countdown>,
    deferred: Option<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> TimerToken {
        self.next_token = self.next_token.wrapping_add(1);
        TimerToken(self.next_token)
    }

    /// Arm the countdown, replacing any running one
    pub fn start_countdown(&mut self) -> TimerToken {
        self.stop_countdown();
        let token = self.issue();
        self.countdown = Some(Countdown {
            token,
            next_tick_in: TICK_PERIOD,
        });
        token
    }

    pub fn stop_countdown(&mut self) -> Option<TimerToken> {
        let cancelled = self.countdown.take().map(|c| c.token);
        if let Some(token) = cancelled {
            tracing::trace!(?token, "countdown cancelled");
        }
        cancelled
    }

    /// Arm a deferred transition, replacing any pending one
    pub fn defer(&mut self, action: DeferredAction, delay: Duration) -> TimerToken {
        self.cancel_deferred();
        let token = self.issue();
        self.deferred = Some(Deferred {
            token,
            action,
            due_in: delay,
        });
        token
    }

    pub fn cancel_deferred(&mut self) -> Option<TimerToken> {
        let cancelled = self.deferred.take().map(|d| d.token);
        if let Some(token) = cancelled {
            tracing::trace!(?token, "deferred transition cancelled");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        self.stop_countdown();
        self.cancel_deferred();
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn pending_deferred(&self) -> Option<DeferredAction> {
        self.deferred.map(|d| d.action)
    }

    /// Whether `token` still identifies an armed timer
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.countdown.map(|c| c.token) == Some(token)
            || self.deferred.map(|d| d.token) == Some(token)
    }

    /// Let up to `budget` elapse.
    ///
    /// Returns the earliest timer due within the budget together with the
    /// time consumed to reach it; the caller handles it and polls again with
    /// the remainder. Returns `None` once nothing is due, after charging the
    /// whole budget to the pending timers.
    pub fn poll(&mut self, budget: Duration) -> Option<(Duration, Fired)> {
        let tick_due = self.countdown.map(|c| c.next_tick_in);
        let deferred_due = self.deferred.map(|d| d.due_in);

        let earliest = match (tick_due, deferred_due) {
            (Some(t), Some(d)) => Some(t.min(d)),
            (t, d) => t.or(d),
        };

        match earliest {
            Some(due) if due <= budget => {
                self.charge(due);
                // Countdown wins a tie; the deferred slot is still due next poll
                if tick_due == Some(due) {
                    if let Some(countdown) = self.countdown.as_mut() {
                        countdown.next_tick_in = TICK_PERIOD;
                        return Some((due, Fired::Tick(countdown.token)));
                    }
                }
                self.deferred
                    .take()
                    .map(|deferred| (due, Fired::Deferred(deferred.token, deferred.action)))
            },
            _ => {
                self.charge(budget);
                None
            },
        }
    }

    fn charge(&mut self, elapsed: Duration) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.next_tick_in = countdown.next_tick_in.saturating_sub(elapsed);
        }
        if let Some(deferred) = self.deferred.as_mut() {
            deferred.due_in = deferred.due_in.saturating_sub(elapsed);
        }
    }
}
