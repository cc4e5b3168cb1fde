//! Discovery handshake for the live match feed.
//!
//! **Feature flag:** `discovery` (required to use this module)
//!
//! The feed endpoint is not published anywhere. It is derived from three public
//! pages fetched in sequence, each one yielding the address of the next:
//!
//! | Step | Page | Extracted |
//! |------|------|-----------|
//! | 1 | `GetPlayer.do` video player | frame source URL (`LV.setFrameSrc('...')`) |
//! | 2 | frame source | `src` of the embedded `<iframe>` |
//! | 3 | iframe page | socket hostname, validation token, match id; `wt` from the iframe URL |
//!
//! The result is a [`DiscoveryTarget`]: the `wss://` socket.io URL and the topic
//! to subscribe to.
//!
//! # Example
//!
//! ```no_run
//! use live_match_feed::discovery::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//! let target = client.discover("31234567").await?;
//!
//! println!("{} -> {}", target.topic, target.web_socket_url);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::Client;
pub use error::DiscoveryError;
pub use types::response::DiscoveryTarget;
