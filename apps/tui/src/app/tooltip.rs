use std::time::{Duration, Instant};

/// Debounce before a focused gate row reveals its tooltip.
pub const SHOW_DELAY: Duration = Duration::from_millis(150);
/// Delay before a blurred tooltip retires. Zero: hide on the next tick.
pub const HIDE_DELAY: Duration = Duration::ZERO;

/// Per-trigger tooltip lifecycle. `target` is the index of the gate
/// row that owns the (single, shared) overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    Idle,
    Pending { target: usize, deadline: Instant },
    Visible { target: usize },
    Closing { target: usize, deadline: Instant },
}

/// Show/hide debounce state machine for the tooltip overlay.
///
/// One machine exists for the whole dashboard, so at most one show or
/// hide timer is armed at a time; arming a new transition replaces the
/// previous deadline. Timers are plain `Instant` deadlines advanced by
/// `tick` from the event loop.
#[derive(Debug)]
pub struct TooltipMachine {
    state: TooltipState,
    show_delay: Duration,
    hide_delay: Duration,
}

impl TooltipMachine {
    pub const fn new() -> Self {
        Self::with_delays(SHOW_DELAY, HIDE_DELAY)
    }

    pub const fn with_delays(show_delay: Duration, hide_delay: Duration) -> Self {
        Self {
            state: TooltipState::Idle,
            show_delay,
            hide_delay,
        }
    }

    pub const fn state(&self) -> TooltipState {
        self.state
    }

    pub const fn visible_target(&self) -> Option<usize> {
        match self.state {
            TooltipState::Visible { target } => Some(target),
            _ => None,
        }
    }

    /// A gate row gained focus. A pending hide for the same row is
    /// cancelled first (no flicker when focus returns quickly); any
    /// other state arms the show timer for the new row.
    pub fn focus(&mut self, target: usize, now: Instant) {
        self.state = match self.state {
            TooltipState::Visible { target: current } | TooltipState::Closing { target: current, .. }
                if current == target =>
            {
                TooltipState::Visible { target }
            }
            _ => TooltipState::Pending {
                target,
                deadline: now + self.show_delay,
            },
        };
    }

    /// Focus left the trigger: cancel an armed show, or arm the hide
    /// timer for a visible overlay.
    pub fn blur(&mut self, now: Instant) {
        self.state = match self.state {
            TooltipState::Idle | TooltipState::Pending { .. } => TooltipState::Idle,
            TooltipState::Visible { target } => TooltipState::Closing {
                target,
                deadline: now + self.hide_delay,
            },
            closing @ TooltipState::Closing { .. } => closing,
        };
    }

    /// Global dismissal: list scroll, outside interaction, refresh.
    /// Forces Idle immediately, timers and all.
    pub fn dismiss(&mut self) {
        self.state = TooltipState::Idle;
    }

    /// Advances armed deadlines. `has_content` gates the Pending →
    /// Visible transition: a row whose lookup resolves empty never
    /// shows an overlay.
    pub fn tick(&mut self, now: Instant, has_content: impl Fn(usize) -> bool) {
        self.state = match self.state {
            TooltipState::Pending { target, deadline } if now >= deadline => {
                if has_content(target) {
                    TooltipState::Visible { target }
                } else {
                    TooltipState::Idle
                }
            }
            TooltipState::Closing { deadline, .. } if now >= deadline => TooltipState::Idle,
            other => other,
        };
    }

    /// Re-validates the machine after a render replaced the gate list.
    /// A target that no longer exists dismisses the overlay.
    pub fn rewire(&mut self, row_count: usize) {
        let target = match self.state {
            TooltipState::Idle => return,
            TooltipState::Pending { target, .. }
            | TooltipState::Visible { target }
            | TooltipState::Closing { target, .. } => target,
        };

        if target >= row_count {
            self.state = TooltipState::Idle;
        }
    }
}

impl Default for TooltipMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW: Duration = Duration::from_millis(150);

    fn machine() -> TooltipMachine {
        TooltipMachine::with_delays(SHOW, Duration::ZERO)
    }

    #[test]
    fn focus_arms_the_show_timer() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(0, now);
        assert!(matches!(m.state(), TooltipState::Pending { target: 0, .. }));

        // Before the deadline nothing shows
        m.tick(now + Duration::from_millis(100), |_| true);
        assert!(matches!(m.state(), TooltipState::Pending { .. }));

        // At >= 150ms the tooltip reveals
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.visible_target(), Some(0));
    }

    #[test]
    fn leaving_before_the_deadline_cancels_the_show() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(0, now);
        m.blur(now + Duration::from_millis(10));
        assert_eq!(m.state(), TooltipState::Idle);

        // The old deadline passing must not resurrect the tooltip
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.state(), TooltipState::Idle);
    }

    #[test]
    fn empty_content_never_shows() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(3, now);
        m.tick(now + SHOW, |_| false);
        assert_eq!(m.state(), TooltipState::Idle);
    }

    #[test]
    fn blur_then_tick_hides_a_visible_tooltip() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(0, now);
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.visible_target(), Some(0));

        m.blur(now + SHOW);
        assert!(matches!(m.state(), TooltipState::Closing { target: 0, .. }));
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.state(), TooltipState::Idle);
    }

    #[test]
    fn refocus_cancels_a_pending_hide() {
        let now = Instant::now();
        let mut m = TooltipMachine::with_delays(SHOW, Duration::from_millis(50));

        m.focus(0, now);
        m.tick(now + SHOW, |_| true);
        m.blur(now + SHOW);

        // Focus comes back before the hide deadline: still visible,
        // no flicker through Idle.
        m.focus(0, now + SHOW + Duration::from_millis(10));
        assert_eq!(m.visible_target(), Some(0));
    }

    #[test]
    fn moving_to_an_adjacent_row_rearms_the_show_timer() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(0, now);
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.visible_target(), Some(0));

        m.focus(1, now + SHOW);
        assert!(matches!(m.state(), TooltipState::Pending { target: 1, .. }));
        m.tick(now + SHOW + SHOW, |_| true);
        assert_eq!(m.visible_target(), Some(1));
    }

    #[test]
    fn dismiss_is_immediate_from_any_state() {
        let now = Instant::now();

        let mut pending = machine();
        pending.focus(0, now);
        pending.dismiss();
        assert_eq!(pending.state(), TooltipState::Idle);

        let mut visible = machine();
        visible.focus(0, now);
        visible.tick(now + SHOW, |_| true);
        visible.dismiss();
        assert_eq!(visible.state(), TooltipState::Idle);
    }

    #[test]
    fn rewire_retires_targets_beyond_the_new_list() {
        let now = Instant::now();
        let mut m = machine();

        m.focus(5, now);
        m.tick(now + SHOW, |_| true);
        assert_eq!(m.visible_target(), Some(5));

        // List shrank to 3 rows on refresh
        m.rewire(3);
        assert_eq!(m.state(), TooltipState::Idle);

        // A still-valid target survives the rewire
        m.focus(1, now);
        m.tick(now + SHOW, |_| true);
        m.rewire(3);
        assert_eq!(m.visible_target(), Some(1));
    }
}
