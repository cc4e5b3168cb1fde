//! Re-exported types from external crates for convenience.
//!
//! These types appear in the public API of this crate and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for match kick-off instants.
pub use chrono::{DateTime, Utc};
/// JSON value type used for the loosely-typed scalar fields of live updates.
pub use serde_json::Value;
