//! Nostr client seam for Vlogstr.
//!
//! This crate provides:
//! - `Filter`: NIP-01 query filters with builder methods and local matching
//! - `NostrClient` / `Signer`: the traits the feature services depend on
//! - `QueryOptions` / `CancelToken` / `run_with_options`: per-query deadlines
//!   raced against caller cancellation
//! - `QueryCache`: request-keyed cache with staleness windows, fetch
//!   coalescing, and generation-guarded optimistic mutations
//! - `MemoryRelay`: in-memory `NostrClient` for tests
//!
//! Relay transport (WebSockets, subscriptions) is intentionally absent; the
//! application binds a transport by implementing `NostrClient`.

mod cache;
mod cancel;
mod client;
mod error;
mod filter;
mod memory;

pub use cache::{CacheKey, QueryCache};
pub use cancel::{CancelToken, QueryOptions, run_with_options};
pub use client::{NostrClient, Signer};
pub use error::{ClientError, Result};
pub use filter::Filter;
pub use memory::MemoryRelay;
