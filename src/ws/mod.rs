//! Core WebSocket infrastructure.
//!
//! The feed connection talks to sockets only through the [`Transport`] and
//! [`Socket`] traits, so the protocol logic is independent of the WebSocket
//! library. [`TungsteniteTransport`] is the production implementation; tests
//! plug in their own.
//!
//! # Architecture
//!
//! - [`Config`]: connect timeout, client ping, and reconnection pacing
//! - [`Transport`]: opens a brand-new [`Socket`] per connection attempt
//! - [`Socket`]: one live connection, polled for [`TransportEvent`]s

pub mod config;
pub mod error;
pub mod traits;
pub mod transport;

pub use config::{Config, Pacing, ReconnectConfig};
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
pub use traits::*;
pub use transport::{TungsteniteSocket, TungsteniteTransport};
