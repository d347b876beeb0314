//! # pagewalk
//!
//! Cursor-based auto-pagination for `NextToken` / `Limit` style list APIs.
//!
//! ## Features
//!
//! - **Auto-iteration**: Follow opaque server cursors until the listing ends
//! - **Emit limits**: Shrink page sizes as the caller's item quota runs out
//! - **Manual paging**: Resume from a token and fetch one page at a time
//! - **Streaming**: Pages are yielded as they arrive, strictly in order
//! - **Declarative operations**: Describe list calls in YAML, no code per operation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{load_service, ClientConfig, JsonListOperation, ListRequest, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = load_service("events")?;
//!     let config = ClientConfig::default().with_region(Some("eu-west-1".into()));
//!     let paginator = JsonListOperation::new(&service, "ListRules", &config)?.into_paginator();
//!
//!     let (request, controls) = ListRequest::builder()
//!         .field("NamePrefix", "ops-")
//!         .emit_limit(Some(150))
//!         .build()?;
//!
//!     let outcome = paginator.collect(request, controls).await?;
//!     println!(
//!         "{} rules, resume with {:?} skipping {}",
//!         outcome.items.len(),
//!         outcome.next_cursor,
//!         outcome.resume_skip
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Paginator                            │
//! │   pages() → Stream<Page>   items() → Stream<Item>  collect() │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┼───────────────┬───────────────┐
//! │   Request    │  PageFetcher  │ CursorTracker │  EmitLimiter  │
//! ├──────────────┼───────────────┼───────────────┼───────────────┤
//! │ fields       │ one call/page │ CONTINUE/STOP │ min(cap, rem) │
//! │ sort order   │ JSON over HTTP│ manual mode   │ truncation    │
//! └──────────────┴───────────────┴───────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication applied to outgoing requests
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor-based pagination driver
pub mod pagination;

/// Client configuration
pub mod config;

/// JSON list operations
pub mod operation;

/// YAML loader for service definitions
pub mod loader;

/// Built-in service definitions
pub mod services;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ClientConfig;
pub use loader::{load_service, load_service_from_str, OperationDefinition, ServiceDefinition};
pub use operation::{JsonListOperation, JsonPage};
pub use pagination::{
    Cursor, ListRequest, Page, PageFetcher, PagingControls, PagingOutcome, PagingSettings,
    Paginator,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
