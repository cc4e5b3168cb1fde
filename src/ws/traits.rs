//! Seams between the feed connection and the WebSocket library.

use async_trait::async_trait;

use crate::Result;

/// What a live socket reports when polled.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text message
    Text(String),
    /// The peer closed the connection, or the stream ended
    Closed(Option<String>),
    /// Reading failed
    Errored(String),
}

/// Opens connections. Every call yields a brand-new socket.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Socket: Socket;

    async fn connect(&self, url: &str) -> Result<Self::Socket>;
}

/// One open connection.
///
/// Once `next_event` has returned [`TransportEvent::Closed`] or
/// [`TransportEvent::Errored`] the socket is not polled again.
#[async_trait]
pub trait Socket: Send + 'static {
    /// Waits for the next inbound message or for the connection to end.
    ///
    /// Must be cancel safe: the connection drops this future when it needs to
    /// send or shut down.
    async fn next_event(&mut self) -> TransportEvent;

    async fn send(&mut self, text: String) -> Result<()>;

    /// Asks the peer to close. Errors are not interesting at this point.
    async fn close(&mut self);
}
