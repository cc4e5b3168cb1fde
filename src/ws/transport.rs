use async_trait::async_trait;
use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as TungsteniteError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::error::WsError;
use super::traits::{Socket, Transport, TransportEvent};
use crate::Result;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// [`Transport`] backed by `tokio-tungstenite`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteTransport;

#[async_trait]
impl Transport for TungsteniteTransport {
    type Socket = TungsteniteSocket;

    async fn connect(&self, url: &str) -> Result<Self::Socket> {
        let (stream, response) = connect_async(url).await.map_err(WsError::Connection)?;

        tracing::debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(TungsteniteSocket { stream })
    }
}

/// One `tokio-tungstenite` stream.
pub struct TungsteniteSocket {
    stream: WsStream,
}

#[async_trait]
impl Socket for TungsteniteSocket {
    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    tracing::trace!(%text, "Received WebSocket text message");
                    return TransportEvent::Text(text.as_str().to_owned());
                }
                Some(Ok(Message::Close(frame))) => {
                    return TransportEvent::Closed(
                        frame
                            .map(|frame| frame.reason.as_str().to_owned())
                            .filter(|reason| !reason.is_empty()),
                    );
                }
                Some(Err(e)) => return TransportEvent::Errored(e.to_string()),
                None => return TransportEvent::Closed(None),
                Some(Ok(_)) => {
                    // Binary frames carry nothing for the feed; pings are answered by tungstenite.
                }
            }
        }
    }

    async fn send(&mut self, text: String) -> Result<()> {
        tracing::trace!(%text, "Sending WebSocket text message");
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(send_error)?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "WebSocket close failed");
        }
    }
}

fn send_error(e: TungsteniteError) -> WsError {
    match e {
        TungsteniteError::ConnectionClosed | TungsteniteError::AlreadyClosed => {
            WsError::ConnectionClosed
        }
        e => WsError::Connection(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sending_on_a_closed_stream_is_connection_closed() {
        assert!(matches!(
            send_error(TungsteniteError::AlreadyClosed),
            WsError::ConnectionClosed
        ));
        assert!(matches!(
            send_error(TungsteniteError::ConnectionClosed),
            WsError::ConnectionClosed
        ));
        assert!(matches!(
            send_error(TungsteniteError::Utf8("bad".to_owned())),
            WsError::Connection(_)
        ));
    }
}
