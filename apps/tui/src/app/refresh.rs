use std::time::{Duration, Instant};

/// Fixed periodic refresh cadence.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Identifies one fetch cycle. Ids are handed out in start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleId(u64);

/// Decides which fetch cycle is allowed to render.
///
/// Rule: last-started wins. `begin` marks a new cycle current;
/// `accept` is true only for that cycle, so a late-finishing earlier
/// cycle can never overwrite a newer one's render. There is no
/// cancellation; superseded results are simply discarded on arrival.
#[derive(Debug)]
pub struct RefreshOrchestrator {
    current: u64,
    next_due: Instant,
    interval: Duration,
}

impl RefreshOrchestrator {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, REFRESH_INTERVAL)
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            current: 0,
            next_due: now + interval,
            interval,
        }
    }

    /// Starts a new cycle, superseding any cycle still in flight.
    pub fn begin(&mut self) -> CycleId {
        self.current += 1;
        CycleId(self.current)
    }

    /// True iff `id` is the most recently started cycle.
    pub const fn accept(&self, id: CycleId) -> bool {
        id.0 == self.current
    }

    /// Consumes the periodic tick when it is due. The timer runs
    /// independently of manual refreshes; a tick racing a manual cycle
    /// is allowed and resolved by the supersession rule.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if now >= self.next_due {
            self.next_due = now + self.interval;
            true
        } else {
            false
        }
    }
}
