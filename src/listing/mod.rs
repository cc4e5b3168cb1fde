//! Upcoming football matches scraped from the public listing page.
//!
//! **Feature flag:** `listing` (required to use this module)
//!
//! Kick-off times come from the `platformConfig = {...};` blob embedded in the
//! page; team names come from the match anchors. Both are joined on the event id,
//! which is also the identifier the [discovery handshake](crate::discovery) takes.
//!
//! # Example
//!
//! ```no_run
//! use live_match_feed::listing::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! for m in client.matches().await? {
//!     println!("{} {} v {} at {}", m.id, m.teams.home, m.teams.away, m.date);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::{Client, parse_matches};
pub use types::{Match, Teams};
