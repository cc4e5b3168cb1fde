//! Packet framing of the socket.io transport.
//!
//! Every text message starts with a run of ASCII digits naming the packet type,
//! followed by an optional body. Only a handful of types matter to the feed:
//!
//! | Prefix | Meaning |
//! |--------|---------|
//! | `0` | transport open (handshake parameters in the body) |
//! | `3` | pong |
//! | `40` | namespace connected, ready for `subscribe` |
//! | `42` | event, body is `[name, payload]` |
//!
//! The client answers every event with a bare `2`, which is also the client
//! ping.

use serde::Serialize;

use super::types::request::{EventMessage, SubscribeRequest};
use crate::Result;

const OPEN: &str = "0";
const PONG: &str = "3";
const CONNECT: &str = "40";
const EVENT: &str = "42";
const ACK: &str = "2";
const PING: &str = "2";

/// Packet type of a [`Frame`], as far as the feed protocol cares.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `0`
    Open,
    /// `3`
    Pong,
    /// `40`
    Connect,
    /// `42`
    Event,
    /// Legal framing without a handler
    Other,
}

/// One transport message split into its digit prefix and body.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Leading ASCII digits, possibly empty
    pub prefix: String,
    /// Everything after the prefix, possibly empty
    pub body: String,
}

impl Frame {
    #[must_use]
    pub fn kind(&self) -> FrameKind {
        match self.prefix.as_str() {
            OPEN => FrameKind::Open,
            PONG => FrameKind::Pong,
            CONNECT => FrameKind::Connect,
            EVENT => FrameKind::Event,
            _ => FrameKind::Other,
        }
    }
}

/// Splits `raw` after its longest leading run of ASCII digits. Never fails.
#[must_use]
pub fn decode(raw: &str) -> Frame {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (prefix, body) = raw.split_at(split);

    Frame {
        prefix: prefix.to_owned(),
        body: body.to_owned(),
    }
}

/// Encodes `["subscribe", {...}]` for `topic` as a `42` frame.
pub fn encode_subscribe(topic: &str) -> Result<String> {
    encode_event(SubscribeRequest::EVENT, &SubscribeRequest::new(topic))
}

/// Encodes `[name, payload]` as a `42` frame.
pub fn encode_event<P: Serialize>(name: &str, payload: &P) -> Result<String> {
    let message = serde_json::to_string(&EventMessage(name, payload))?;

    Ok(format!("{EVENT}{message}"))
}

/// The reply to every event frame.
#[must_use]
pub fn encode_ack() -> String {
    ACK.to_owned()
}

/// Client-initiated keepalive.
#[must_use]
pub fn encode_ping() -> String {
    PING.to_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn decode_splits_prefix() {
        let frame = decode("40{}");
        assert_eq!(frame.prefix, "40");
        assert_eq!(frame.body, "{}");
        assert_eq!(frame.kind(), FrameKind::Connect);

        let frame = decode("2");
        assert_eq!(frame.prefix, "2");
        assert_eq!(frame.body, "");
        assert_eq!(frame.kind(), FrameKind::Other);
    }

    #[test]
    fn decode_empty_and_bodies_without_prefix() {
        assert_eq!(decode(""), Frame::default());

        let frame = decode("[\"x\"]");
        assert_eq!(frame.prefix, "");
        assert_eq!(frame.body, "[\"x\"]");
    }

    #[test]
    fn decode_keeps_digits_after_body_start() {
        let frame = decode("0{\"pingInterval\":25000}");

        assert_eq!(frame.kind(), FrameKind::Open);
        assert_eq!(frame.body, "{\"pingInterval\":25000}");
    }

    #[test]
    fn decode_non_ascii_body() {
        let frame = decode("42[\"größe\"]");

        assert_eq!(frame.kind(), FrameKind::Event);
        assert_eq!(frame.body, "[\"größe\"]");
    }

    #[test]
    fn encode_subscribe_wire_format() {
        let raw = encode_subscribe("m1").unwrap();

        assert_eq!(
            raw,
            r#"42["subscribe",{"Topic":"m1","ConditionsUpdates":"true","LiveUpdates":"true","OddsUpdates":"false","VideoUpdates":"false"}]"#
        );
    }

    #[test]
    fn subscribe_topic_survives_decode() {
        for topic in ["m1", "", "with \"quotes\" and \\ slashes", "42", "ünïcode"] {
            let frame = decode(&encode_subscribe(topic).unwrap());
            assert_eq!(frame.kind(), FrameKind::Event, "topic {topic:?}");

            let body: Value = serde_json::from_str(&frame.body).unwrap();
            assert_eq!(body[0], json!("subscribe"));
            assert_eq!(body[1]["Topic"], json!(topic));
        }
    }

    #[test]
    fn ack_is_bare_two() {
        assert_eq!(encode_ack(), "2");
    }
}
