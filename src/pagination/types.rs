//! Pagination types
//!
//! Cursor, page, caller controls and run outcome shared by the driver
//! components.

use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page cap applied by the list operations this crate was modelled on
pub const DEFAULT_PAGE_CAP: usize = 100;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque continuation token issued by the server
///
/// The token is never parsed; it is forwarded verbatim on the next request.
/// An empty token is treated the same as no token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token, returning `None` for an empty one
    pub fn new(token: impl Into<String>) -> Option<Self> {
        token.into().none_if_empty().map(Self)
    }

    /// Interpret an optional token returned by the server
    pub fn from_server(token: Option<String>) -> Option<Self> {
        token.none_if_empty().map(Self)
    }

    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the raw token
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Caller Controls
// ============================================================================

/// Caller-facing iteration controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingControls {
    /// Cursor to resume a previous manual iteration from
    pub start_cursor: Option<Cursor>,
    /// Maximum total number of items to emit across all pages
    pub emit_limit: Option<usize>,
    /// Fetch a single page and hand the cursor back to the caller
    pub no_auto_iteration: bool,
    /// Leading items of the first page already emitted by an earlier,
    /// truncated run
    pub skip: usize,
}

impl PagingControls {
    /// Create default controls (automatic iteration, no limit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.start_cursor = cursor;
        self
    }

    /// Cap the total number of emitted items
    #[must_use]
    pub fn with_emit_limit(mut self, limit: Option<usize>) -> Self {
        self.emit_limit = limit;
        self
    }

    /// Disable automatic multi-page iteration
    #[must_use]
    pub fn no_auto_iteration(mut self, enabled: bool) -> Self {
        self.no_auto_iteration = enabled;
        self
    }

    /// Drop the first `skip` items of the first page
    #[must_use]
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// True when the caller drives paging: a cursor was supplied or
    /// automatic iteration was switched off
    pub fn user_controls_paging(&self) -> bool {
        self.no_auto_iteration || self.start_cursor.is_some()
    }
}

/// Per-operation paging settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingSettings {
    /// Maximum items the server returns in one response
    pub page_cap: usize,
    /// Send the page cap when no emit limit is set; when false the
    /// page-size field is omitted and the server default applies
    pub send_page_cap: bool,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            page_cap: DEFAULT_PAGE_CAP,
            send_page_cap: true,
        }
    }
}

impl PagingSettings {
    /// Settings with a specific page cap
    pub fn with_page_cap(page_cap: usize) -> Self {
        Self {
            page_cap: page_cap.max(1),
            ..Self::default()
        }
    }

    /// Omit the page-size field when no emit limit is set
    #[must_use]
    pub fn server_default_page_size(mut self) -> Self {
        self.send_page_cap = false;
        self
    }
}

// ============================================================================
// Tracker State
// ============================================================================

/// Decision of the cursor tracker after a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Why iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The server returned no next cursor
    Exhausted,
    /// The emit limit was reached
    EmitLimitReached,
    /// A page came back empty while an emit limit was set
    EmptyPage,
    /// The caller controls paging; one page was fetched
    Manual,
    /// The emit limit was reached partway through a page the server sent
    /// oversized; resume from that page's start cursor, skipping what was kept
    Truncated,
    /// A page fetch failed
    Failed,
}

// ============================================================================
// Pages
// ============================================================================

/// One fetched page, as handed to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// 1-based page number within this run
    pub number: usize,
    /// Items emitted from this page
    pub items: Vec<T>,
    /// Items the server returned (may exceed `items.len()` if the server
    /// ignored the requested page size)
    pub received: usize,
    /// Leading items dropped because an earlier run already emitted them
    pub skipped: usize,
    /// Page size sent with the request, if any
    pub requested_size: Option<usize>,
    /// Cursor the page was requested with
    pub start_cursor: Option<Cursor>,
    /// Cursor returned by the server for the following page
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Number of items emitted from this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page emitted no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when items past the emit limit were dropped from this page
    pub fn is_truncated(&self) -> bool {
        self.received > self.skipped + self.items.len()
    }

    /// Cursor to resume from after this page
    ///
    /// The page's own start cursor when it was truncated, since the dropped
    /// items are only reachable by fetching it again.
    pub fn resume_cursor(&self) -> Option<&Cursor> {
        if self.is_truncated() {
            self.start_cursor.as_ref()
        } else {
            self.next_cursor.as_ref()
        }
    }

    /// Items to skip on the first page after resuming from [`Self::resume_cursor`]
    pub fn resume_skip(&self) -> usize {
        if self.is_truncated() {
            self.skipped + self.items.len()
        } else {
            0
        }
    }
}

/// Progress notification emitted after each page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Page number just fetched
    pub page: usize,
    /// Items emitted from that page
    pub received: usize,
    /// Items emitted so far across the run
    pub retrieved_so_far: usize,
    /// Marker the page started from
    pub start_cursor: Option<Cursor>,
    /// Marker for the following page
    pub next_cursor: Option<Cursor>,
    /// Whether the caller controls paging
    pub manual: bool,
}

/// Collected result of a whole run
#[derive(Debug, Clone, PartialEq)]
pub struct PagingOutcome<T> {
    /// All emitted items in order
    pub items: Vec<T>,
    /// Number of remote calls made
    pub pages_fetched: usize,
    /// Cursor left for the caller to resume from, if any
    pub next_cursor: Option<Cursor>,
    /// Items to skip on the first page when resuming from `next_cursor`;
    /// non-zero only after [`StopReason::Truncated`]
    pub resume_skip: usize,
    /// Why iteration stopped
    pub stop_reason: Option<StopReason>,
}
