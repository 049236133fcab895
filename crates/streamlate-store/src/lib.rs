//! # streamlate-store
//!
//! SQLite-backed persistence for the Streamlate bot: the runtime
//! configuration document, the template catalog, user profiles, and
//! quota counters.

mod store;

pub use store::{QuotaSnapshot, Store, ToggleOutcome};
