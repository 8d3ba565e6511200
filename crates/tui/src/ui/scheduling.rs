//! Deferred scroll-into-view tasks.
//!
//! Scrolling to a row only works once that row has been laid out, which
//! happens during the next render. Components therefore schedule a
//! `DeferredScroll`, poll it on every tick, and either apply the resolved row
//! offset, reschedule, or drop the task.

use std::time::{Duration, Instant};

/// Delay before the side navigation scrolls the selected section into view
/// after a route change.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(250);
/// Delay between attempts to find an anchor that is not laid out yet.
pub const SCROLL_RETRY_DELAY: Duration = Duration::from_millis(250);
/// Retries after the first attempt before an anchor scroll is abandoned.
pub const SCROLL_RETRY_ATTEMPTS: u8 = 5;

/// Result of polling a deferred scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPoll<R> {
    /// Not due yet.
    Pending,
    /// Target found; the task is finished.
    Resolved(R),
    /// Target missing; another attempt has been scheduled.
    Rescheduled,
    /// Target missing and no attempts remain; the task is finished.
    Abandoned,
}

impl<R> ScrollPoll<R> {
    /// True when the owner should drop the task.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Abandoned)
    }
}

/// A scroll request for `target`, checked at `due_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredScroll<T> {
    target: T,
    due_at: Instant,
    retries_left: u8,
}

impl<T> DeferredScroll<T> {
    /// Single attempt after `SCROLL_SETTLE_DELAY`, without retries.
    pub fn after_settle(target: T, now: Instant) -> Self {
        Self {
            target,
            due_at: now + SCROLL_SETTLE_DELAY,
            retries_left: 0,
        }
    }

    /// Immediate attempt followed by up to `SCROLL_RETRY_ATTEMPTS` retries
    /// spaced by `SCROLL_RETRY_DELAY`.
    pub fn with_retries(target: T, now: Instant) -> Self {
        Self {
            target,
            due_at: now,
            retries_left: SCROLL_RETRY_ATTEMPTS,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due_at
    }

    /// Checks the precondition if the task is due.
    ///
    /// `resolve` looks the target up in the last rendered layout and returns
    /// `None` while it is absent.
    pub fn poll<R>(&mut self, now: Instant, resolve: impl FnOnce(&T) -> Option<R>) -> ScrollPoll<R> {
        if !self.is_due(now) {
            return ScrollPoll::Pending;
        }
        if let Some(resolved) = resolve(&self.target) {
            return ScrollPoll::Resolved(resolved);
        }
        if self.retries_left == 0 {
            return ScrollPoll::Abandoned;
        }
        self.retries_left -= 1;
        self.due_at = now + SCROLL_RETRY_DELAY;
        ScrollPoll::Rescheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_scroll_waits_then_fires_once() {
        let start = Instant::now();
        let mut task = DeferredScroll::after_settle("components", start);

        assert_eq!(task.poll(start, |_| Some(3)), ScrollPoll::Pending);
        assert_eq!(task.poll(start + SCROLL_SETTLE_DELAY, |_| None::<usize>), ScrollPoll::Abandoned);
    }

    #[test]
    fn retrying_scroll_gives_up_after_bound() {
        let mut now = Instant::now();
        let mut task = DeferredScroll::with_retries("colors".to_string(), now);
        let mut attempts = 0;

        loop {
            let outcome = task.poll(now, |_| {
                attempts += 1;
                None::<usize>
            });
            if outcome.is_finished() {
                assert_eq!(outcome, ScrollPoll::Abandoned);
                break;
            }
            assert_eq!(outcome, ScrollPoll::Rescheduled);
            assert_eq!(task.poll(now, |_| Some(0)), ScrollPoll::Pending);
            now += SCROLL_RETRY_DELAY;
        }
        assert_eq!(attempts, usize::from(SCROLL_RETRY_ATTEMPTS) + 1);
    }

    #[test]
    fn retrying_scroll_resolves_when_target_appears() {
        let now = Instant::now();
        let mut task = DeferredScroll::with_retries("sizes", now);
        assert_eq!(task.poll(now, |_| None::<usize>), ScrollPoll::Rescheduled);
        assert_eq!(task.poll(now + SCROLL_RETRY_DELAY, |target| (*target == "sizes").then_some(12)), ScrollPoll::Resolved(12));
        assert_eq!(task.retries_left, SCROLL_RETRY_ATTEMPTS - 1);
    }
}
