//! Authentication module
//!
//! Supports: API Key (header or query), Basic, Bearer, Custom Headers
//!
//! Credentials are explicit configuration handed to each operation; nothing
//! is read from ambient process state.

mod types;

pub use types::{AuthConfig, Location};

#[cfg(test)]
mod tests;
