//! Emit limiter
//!
//! Sizes each request so the run never retrieves more than the caller's
//! emit limit.

use super::types::PagingSettings;

/// Tracks the remaining quota and the page size of the next request
#[derive(Debug, Clone)]
pub struct EmitLimiter {
    emit_limit: Option<usize>,
    settings: PagingSettings,
    retrieved: usize,
}

impl EmitLimiter {
    /// Create a limiter for an optional emit limit
    pub fn new(emit_limit: Option<usize>, settings: PagingSettings) -> Self {
        Self {
            emit_limit,
            settings,
            retrieved: 0,
        }
    }

    /// The caller's emit limit
    pub fn emit_limit(&self) -> Option<usize> {
        self.emit_limit
    }

    /// Items emitted so far
    pub fn retrieved(&self) -> usize {
        self.retrieved
    }

    /// Remaining quota, clamped at zero; `None` without an emit limit
    pub fn remaining(&self) -> Option<usize> {
        self.emit_limit
            .map(|limit| limit.saturating_sub(self.retrieved))
    }

    /// True once an emit limit is set and fully consumed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Page size for the next request
    ///
    /// `min(page_cap, remaining)` under an emit limit; otherwise the page cap,
    /// or `None` to let the server choose.
    pub fn next_page_size(&self) -> Option<usize> {
        match self.remaining() {
            Some(remaining) => Some(remaining.min(self.settings.page_cap)),
            None if self.settings.send_page_cap => Some(self.settings.page_cap),
            None => None,
        }
    }

    /// Page size for a request whose first `skip` items are already emitted
    pub fn next_page_size_skipping(&self, skip: usize) -> Option<usize> {
        self.next_page_size()
            .map(|size| size.saturating_add(skip).min(self.settings.page_cap))
    }

    /// Count a page's items against the quota, dropping any beyond it
    ///
    /// Returns the number of items kept.
    pub fn admit<T>(&mut self, items: &mut Vec<T>) -> usize {
        if let Some(remaining) = self.remaining() {
            items.truncate(remaining);
        }
        self.retrieved += items.len();
        items.len()
    }
}
