//! Cursor tracker
//!
//! Two-state machine (CONTINUE / STOP) holding the current cursor.

use super::limiter::EmitLimiter;
use super::types::{Cursor, StopReason, StopResult};

/// Holds the continuation token and decides whether to fetch again
#[derive(Debug, Clone)]
pub struct CursorTracker {
    cursor: Option<Cursor>,
    manual: bool,
    state: StopResult,
    reason: Option<StopReason>,
    pages: usize,
    resume_skip: usize,
}

impl CursorTracker {
    /// Start tracking from an optional caller-supplied cursor
    pub fn new(start_cursor: Option<Cursor>, manual: bool) -> Self {
        Self {
            cursor: start_cursor,
            manual,
            state: StopResult::Continue,
            reason: None,
            pages: 0,
            resume_skip: 0,
        }
    }

    /// Cursor to send with the next request
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Current state
    pub fn state(&self) -> StopResult {
        self.state
    }

    /// Why the tracker stopped, once it has
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.reason
    }

    /// True when the caller drives paging
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Pages recorded so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Items to skip when resuming from [`Self::cursor`]
    pub fn resume_skip(&self) -> usize {
        self.resume_skip
    }

    /// Check if no further fetch may happen
    pub fn is_stopped(&self) -> bool {
        self.state.should_stop()
    }

    /// Force STOP
    pub fn stop(&mut self, reason: StopReason) {
        if self.state.should_continue() {
            self.state = StopResult::Stop;
            self.reason = Some(reason);
        }
    }

    /// Record a fetched page and decide whether to continue
    ///
    /// `received` is the number of items the server returned on this page;
    /// the limiter must already have admitted them.
    pub fn advance(
        &mut self,
        next_cursor: Option<Cursor>,
        received: usize,
        limiter: &EmitLimiter,
    ) -> StopResult {
        self.pages += 1;
        self.cursor = next_cursor;

        if let Some(limit) = limiter.emit_limit() {
            let retrieved = limiter.retrieved();
            if retrieved != 0 && retrieved >= limit {
                self.stop(StopReason::EmitLimitReached);
            } else if received == 0 {
                // an empty page under a limit ends the run even if a cursor came back
                self.stop(StopReason::EmptyPage);
            }
        }

        if self.cursor.is_none() {
            self.stop(StopReason::Exhausted);
        }

        if self.manual {
            self.stop(StopReason::Manual);
        }

        self.state
    }

    /// Record a page cut short by the emit limit and STOP
    ///
    /// The cursor rewinds to the page's start so the dropped items stay
    /// reachable; `skip` items of that page have been emitted.
    pub fn truncate(&mut self, resume_from: Option<Cursor>, skip: usize) -> StopResult {
        self.pages += 1;
        self.cursor = resume_from;
        self.resume_skip = skip;
        self.stop(StopReason::Truncated);
        self.state
    }
}
