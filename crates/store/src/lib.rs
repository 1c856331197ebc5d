//! SQLite persistence for the fare monitor.
//!
//! This crate provides:
//! - the append-only `price_history` table of fare observations
//! - the append-only `notifications` ledger backing alert deduplication

pub mod entry;
pub mod store;

pub use entry::{NotificationEntry, PriceHistoryEntry};
pub use store::{Store, StoreError};
