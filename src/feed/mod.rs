//! Live update feed over socket.io.
//!
//! **Feature flag:** `ws` (required to use this module)
//!
//! The protocol is split into three layers:
//!
//! - [`frame`]: numeric-prefix packet framing
//! - [`envelope`]: decoding of the double-encoded `42` event bodies into
//!   [`MatchLiveUpdate`]s
//! - [`machine`]: the connection state machine, free of any I/O
//!
//! [`FeedConnection`] runs the machine over a real socket and reconnects
//! according to [`crate::ws::Config`].
//!
//! # Protocol
//!
//! ```text
//! server                        client
//!   |  <-------- open ----------  |
//!   |  "0{...}" --------------->  |   (handshake, ignored)
//!   |  "40" ------------------->  |
//!   |  <---- 42["subscribe",{..}] |
//!   |  42["message",{..}] ----->  |
//!   |  <-------------------- "2"  |   (one ack per event)
//! ```

pub mod connection;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod machine;
pub mod types;

pub use connection::FeedConnection;
pub use error::DecodeError;
pub use machine::{ConnectionState, FeedEvent};
pub use types::request::SubscribeRequest;
pub use types::response::MatchLiveUpdate;
