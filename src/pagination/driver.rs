//! Pagination driver
//!
//! Ties the request builder, page fetcher, cursor tracker and emit limiter
//! together. Pages are fetched strictly in order, one call in flight at a
//! time, and streamed to the caller as they arrive.

use super::limiter::EmitLimiter;
use super::tracker::CursorTracker;
use super::types::{
    Cursor, Page, PagingControls, PagingOutcome, PagingSettings, Progress, StopReason,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// Seams
// ============================================================================

/// A request the driver can point at a cursor and a page size
pub trait PagedRequest: Clone + Send + Sync {
    /// Set (or clear) the continuation cursor
    fn set_cursor(&mut self, cursor: Option<&Cursor>);

    /// Set (or clear) the page-size field
    fn set_page_size(&mut self, page_size: Option<usize>);
}

/// A response the driver can read items and the next cursor from
pub trait PagedResponse: Send {
    /// Item type carried by the page
    type Item: Send;

    /// Cursor for the following page, `None` when the listing is complete
    fn next_cursor(&self) -> Option<Cursor>;

    /// Consume the response into its items
    fn into_items(self) -> Vec<Self::Item>;
}

/// One remote list call
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Request type
    type Request: PagedRequest;
    /// Response type
    type Response: PagedResponse;

    /// Perform exactly one remote call
    async fn fetch_page(&self, request: &Self::Request) -> Result<Self::Response>;
}

/// Item type produced by a fetcher
pub type ItemOf<F> = <<F as PageFetcher>::Response as PagedResponse>::Item;

type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;

// ============================================================================
// Plain Page Response
// ============================================================================

/// Ready-made response carrying items and a next cursor
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Items in the page
    pub items: Vec<T>,
    /// Next cursor, if more items exist
    pub next_cursor: Option<Cursor>,
}

impl<T> PageResponse<T> {
    /// Create a page response
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }

    /// Create the final page of a listing
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

impl<T: Send> PagedResponse for PageResponse<T> {
    type Item = T;

    fn next_cursor(&self) -> Option<Cursor> {
        self.next_cursor.clone()
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }
}

// ============================================================================
// Closure Fetcher
// ============================================================================

/// Fetcher backed by an async closure
pub struct FnFetcher<Req, Resp, F> {
    call: F,
    _marker: PhantomData<fn(Req) -> Resp>,
}

/// Wrap an async function `Req -> Result<Resp>` as a [`PageFetcher`]
///
/// The returned future must own its data; clone shared handles into it.
pub fn fetch_fn<Req, Resp, F, Fut>(call: F) -> FnFetcher<Req, Resp, F>
where
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Resp>> + Send + 'static,
{
    FnFetcher {
        call,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<Req, Resp, F, Fut> PageFetcher for FnFetcher<Req, Resp, F>
where
    Req: PagedRequest + 'static,
    Resp: PagedResponse + 'static,
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Resp>> + Send + 'static,
{
    type Request = Req;
    type Response = Resp;

    async fn fetch_page(&self, request: &Req) -> Result<Resp> {
        (self.call)(request.clone()).await
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Auto-paginating driver over a [`PageFetcher`]
pub struct Paginator<F> {
    fetcher: F,
    settings: PagingSettings,
    progress: Option<ProgressFn>,
}

impl<F: PageFetcher> Paginator<F> {
    /// Create a paginator with default settings
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            settings: PagingSettings::default(),
            progress: None,
        }
    }

    /// Set paging settings
    #[must_use]
    pub fn with_settings(mut self, settings: PagingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Observe progress after each page
    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Paging settings
    pub fn settings(&self) -> PagingSettings {
        self.settings
    }

    /// Stream pages as they are fetched
    ///
    /// A failed fetch is yielded as the final element.
    pub fn pages(
        &self,
        request: F::Request,
        controls: PagingControls,
    ) -> impl Stream<Item = Result<Page<ItemOf<F>>>> + '_ {
        let walk = Walk::new(request, controls, self.settings);
        stream::unfold(walk, move |mut walk| async move {
            let page = walk.next_page(&self.fetcher, self.progress.as_ref()).await?;
            Some((page, walk))
        })
    }

    /// Stream individual items across pages
    pub fn items(
        &self,
        request: F::Request,
        controls: PagingControls,
    ) -> impl Stream<Item = Result<ItemOf<F>>> + '_ {
        self.pages(request, controls)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<_, Error>)))
            .try_flatten()
    }

    /// Run to completion and collect every item
    pub async fn collect(
        &self,
        request: F::Request,
        controls: PagingControls,
    ) -> Result<PagingOutcome<ItemOf<F>>> {
        let mut walk = Walk::new(request, controls, self.settings);
        let mut items = Vec::new();

        while let Some(page) = walk
            .next_page(&self.fetcher, self.progress.as_ref())
            .await
        {
            items.extend(page?.items);
        }

        Ok(PagingOutcome {
            items,
            pages_fetched: walk.tracker.pages(),
            next_cursor: walk.tracker.cursor().cloned(),
            resume_skip: walk.tracker.resume_skip(),
            stop_reason: walk.tracker.stop_reason(),
        })
    }
}

impl<F: std::fmt::Debug> std::fmt::Debug for Paginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("fetcher", &self.fetcher)
            .field("settings", &self.settings)
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}

/// State of one paginated run
struct Walk<R> {
    request: R,
    tracker: CursorTracker,
    limiter: EmitLimiter,
    skip: usize,
}

impl<R: PagedRequest> Walk<R> {
    fn new(request: R, controls: PagingControls, settings: PagingSettings) -> Self {
        let manual = controls.user_controls_paging();
        Self {
            request,
            tracker: CursorTracker::new(controls.start_cursor, manual),
            limiter: EmitLimiter::new(controls.emit_limit, settings),
            skip: controls.skip,
        }
    }

    async fn next_page<F>(
        &mut self,
        fetcher: &F,
        progress: Option<&ProgressFn>,
    ) -> Option<Result<Page<ItemOf<F>>>>
    where
        F: PageFetcher<Request = R>,
    {
        if self.tracker.is_stopped() {
            return None;
        }
        if self.limiter.is_exhausted() {
            self.tracker.stop(StopReason::EmitLimitReached);
            return None;
        }

        let number = self.tracker.pages() + 1;
        let start_cursor = self.tracker.cursor().cloned();
        let requested_size = self.limiter.next_page_size_skipping(self.skip);
        self.request.set_cursor(start_cursor.as_ref());
        self.request.set_page_size(requested_size);

        debug!(
            page = number,
            page_size = ?requested_size,
            cursor = start_cursor.as_ref().map(Cursor::as_str),
            skip = self.skip,
            "Fetching page"
        );

        let response = match fetcher.fetch_page(&self.request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(page = number, error = %e, "Page fetch failed, stopping");
                self.tracker.stop(StopReason::Failed);
                return Some(Err(Error::page_fetch(number, e)));
            }
        };

        let next_cursor = response.next_cursor();
        let mut items = response.into_items();
        let received = items.len();
        let skipped = std::mem::take(&mut self.skip).min(received);
        if skipped > 0 {
            items = items.split_off(skipped);
        }
        let offered = items.len();
        let kept = self.limiter.admit(&mut items);
        let state = if kept < offered {
            self.tracker.truncate(start_cursor.clone(), skipped + kept)
        } else {
            self.tracker.advance(next_cursor.clone(), received, &self.limiter)
        };

        debug!(
            page = number,
            received,
            skipped,
            kept,
            retrieved = self.limiter.retrieved(),
            ?state,
            "Page fetched"
        );

        let update = Progress {
            page: number,
            received: kept,
            retrieved_so_far: self.limiter.retrieved(),
            start_cursor: start_cursor.clone(),
            next_cursor: next_cursor.clone(),
            manual: self.tracker.is_manual(),
        };
        if update.manual {
            match self.tracker.cursor() {
                Some(next) if self.tracker.resume_skip() > 0 => info!(
                    "Retrieved {} records starting from marker '{}'; resume with next token '{}' skipping {}",
                    kept,
                    start_cursor.as_ref().map_or("", Cursor::as_str),
                    next,
                    self.tracker.resume_skip()
                ),
                Some(next) => info!(
                    "Retrieved {} records starting from marker '{}'; resume with next token '{}'",
                    kept,
                    start_cursor.as_ref().map_or("", Cursor::as_str),
                    next
                ),
                None => info!(
                    "Retrieved {} records starting from marker '{}'",
                    kept,
                    start_cursor.as_ref().map_or("", Cursor::as_str)
                ),
            }
        }
        if let Some(callback) = progress {
            callback(&update);
        }

        Some(Ok(Page {
            number,
            items,
            received,
            skipped,
            requested_size,
            start_cursor,
            next_cursor,
        }))
    }
}
