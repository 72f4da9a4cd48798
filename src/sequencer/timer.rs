//! Timer tickets
//!
//! Machines never sleep themselves. They hand out one [`TimerRequest`] at a
//! time and only honor the ticket they issued last, so a timer that fires
//! after the item it belonged to was replaced is a no-op.

use std::time::Duration;

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket(u64);

/// Ask the driver to call back after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub ticket: TimerTicket,
    pub delay: Duration,
}

/// Anything driven by a single outstanding timer
pub trait Timeline {
    /// Enter the initial state and schedule the first timer
    fn start(&mut self) -> Option<TimerRequest>;

    /// Handle a fired timer; stale tickets return `None` and change nothing
    fn on_timer(&mut self, ticket: TimerTicket) -> Option<TimerRequest>;
}

/// Issues tickets and remembers the single outstanding one
#[derive(Debug, Default)]
pub(crate) struct TicketIssuer {
    next: u64,
    outstanding: Option<(TimerTicket, Duration)>,
}

impl TicketIssuer {
    /// Replace any outstanding timer with a new one
    pub(crate) fn issue(&mut self, delay: Duration) -> TimerRequest {
        self.next += 1;
        let ticket = TimerTicket(self.next);
        self.outstanding = Some((ticket, delay));
        TimerRequest { ticket, delay }
    }

    /// Consume `ticket` if it is the outstanding one, returning its delay
    pub(crate) fn redeem(&mut self, ticket: TimerTicket) -> Option<Duration> {
        match self.outstanding {
            Some((current, delay)) if current == ticket => {
                self.outstanding = None;
                Some(delay)
            }
            _ => None,
        }
    }

    /// Forget the outstanding timer
    pub(crate) fn cancel(&mut self) {
        self.outstanding = None;
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.outstanding.is_some()
    }
}
