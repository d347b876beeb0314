//! Pagination module
//!
//! Cursor-based auto-iteration over `NextToken` / `Limit` style list calls.
//!
//! # Overview
//!
//! - `ListRequestBuilder` - builds the immutable request and caller controls
//! - `PageFetcher` - one remote call per page (trait seam)
//! - `CursorTracker` - CONTINUE / STOP state machine over the opaque cursor
//! - `EmitLimiter` - shrinks page sizes as the emit limit is approached
//! - `Paginator` - drives the loop and streams pages as they arrive

mod driver;
mod limiter;
mod request;
mod tracker;
mod types;

pub use driver::{
    fetch_fn, FnFetcher, ItemOf, PageFetcher, PageResponse, PagedRequest, PagedResponse,
    Paginator,
};
pub use limiter::EmitLimiter;
pub use request::{ListRequest, ListRequestBuilder, SortOrder};
pub use tracker::CursorTracker;
pub use types::{
    Cursor, Page, PagingControls, PagingOutcome, PagingSettings, Progress, StopReason,
    StopResult, DEFAULT_PAGE_CAP,
};
