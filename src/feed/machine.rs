//! Transport-agnostic protocol state machine of one feed connection.
//!
//! The machine consumes [`FeedEvent`]s one at a time and answers each with the
//! [`Action`]s the driver has to carry out, in order, before feeding the next
//! event. It never touches a socket itself.
//!
//! ```text
//! Disconnected --connect--> Connecting --Opened--> Open --"40"--> Subscribed
//!                               ^                    |                |
//!                               |                    +--Closed/Errored+--> Closed
//!                               +--------------- connect ---------------------+
//! ```
//!
//! After [`FeedMachine::disconnect`] the machine is terminal: it stays
//! `Disconnected` and ignores everything.

use super::envelope::{self, Envelope};
use super::frame::{self, Frame, FrameKind};
use super::types::response::MatchLiveUpdate;
use crate::Result;

/// Connection state tracking.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ConnectionState {
    /// Not connected, either never started or explicitly disconnected
    Disconnected,
    /// Waiting for the transport to open
    Connecting,
    /// Transport open, namespace not yet connected
    Open,
    /// Subscribe request sent, receiving events
    Subscribed,
    /// Transport closed or failed; reconnection may follow
    Closed,
}

impl ConnectionState {
    /// A connection attempt is in progress or established.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open | Self::Subscribed)
    }

    /// The transport is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::Subscribed)
    }
}

/// Notifications from the transport, in arrival order.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Opened,
    FrameReceived(Frame),
    /// Orderly close, with the peer's reason if it gave one
    Closed(Option<String>),
    Errored(String),
}

/// Side effects requested by the machine.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send this text frame on the current transport
    Send(String),
    /// Hand a decoded live update to subscribers
    Publish(MatchLiveUpdate),
}

#[derive(Debug)]
pub struct FeedMachine {
    state: ConnectionState,
    subscribe: String,
    disconnected: bool,
}

impl FeedMachine {
    /// Creates a machine subscribing to `topic`, in `Disconnected` state.
    pub fn new(topic: &str) -> Result<Self> {
        Ok(Self {
            state: ConnectionState::Disconnected,
            subscribe: frame::encode_subscribe(topic)?,
            disconnected: false,
        })
    }

    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether [`Self::disconnect`] has been called.
    #[must_use]
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Starts a connection attempt from `Disconnected` or `Closed`.
    ///
    /// Returns `false`, leaving the state untouched, if an attempt is already
    /// active or the machine was disconnected.
    pub fn connect(&mut self) -> bool {
        if self.disconnected || self.state.is_active() {
            return false;
        }

        self.state = ConnectionState::Connecting;
        true
    }

    /// Moves to `Disconnected` for good.
    pub fn disconnect(&mut self) {
        self.disconnected = true;
        self.state = ConnectionState::Disconnected;
    }

    /// Applies one transport event and returns the actions it calls for.
    pub fn handle(&mut self, event: FeedEvent) -> Vec<Action> {
        if self.disconnected {
            tracing::trace!(?event, "ignoring event after disconnect");
            return Vec::new();
        }

        match event {
            FeedEvent::Opened => {
                if self.state == ConnectionState::Connecting {
                    self.state = ConnectionState::Open;
                } else {
                    tracing::debug!(state = %self.state, "open notification outside of a connection attempt");
                }
                Vec::new()
            }
            FeedEvent::FrameReceived(frame) => self.on_frame(&frame),
            FeedEvent::Closed(reason) => {
                if self.state.is_active() {
                    tracing::info!(reason = reason.as_deref().unwrap_or(""), state = %self.state, "feed transport closed");
                    self.state = ConnectionState::Closed;
                }
                Vec::new()
            }
            FeedEvent::Errored(cause) => {
                if self.state.is_active() {
                    tracing::warn!(%cause, state = %self.state, "feed transport failed");
                    self.state = ConnectionState::Closed;
                }
                Vec::new()
            }
        }
    }

    fn on_frame(&mut self, frame: &Frame) -> Vec<Action> {
        if !self.state.is_open() {
            tracing::trace!(state = %self.state, prefix = %frame.prefix, "ignoring frame while not open");
            return Vec::new();
        }

        match frame.kind() {
            FrameKind::Open | FrameKind::Pong => {
                tracing::trace!(prefix = %frame.prefix, "keepalive frame");
                Vec::new()
            }
            FrameKind::Connect => {
                tracing::debug!("namespace connected, subscribing");
                self.state = ConnectionState::Subscribed;
                vec![Action::Send(self.subscribe.clone())]
            }
            FrameKind::Event => {
                let mut actions = Vec::with_capacity(2);
                match envelope::decode(&frame.body) {
                    Ok(Envelope {
                        update: Some(update),
                        ..
                    }) => {
                        log_update(&update);
                        actions.push(Action::Publish(update));
                    }
                    Ok(envelope) => {
                        tracing::trace!(event = %envelope.event, "event without live update");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, body = %frame.body, "undecodable event payload");
                    }
                }
                // acknowledged whether or not the payload made sense
                actions.push(Action::Send(frame::encode_ack()));
                actions
            }
            FrameKind::Other => {
                tracing::trace!(prefix = %frame.prefix, "unhandled frame");
                Vec::new()
            }
        }
    }
}

fn log_update(update: &MatchLiveUpdate) {
    tracing::info!(
        cpt = %update.cpt,
        cr = %update.cr,
        psid = %update.psid,
        tsid = %update.tsid,
        sch = %update.sch,
        sca = %update.sca,
        t = update.t.len(),
        eid = %update.eid,
        en = %update.en,
        "match live update"
    );
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event_frame() -> String {
        let inner = json!({"MLU": {"CPT": 1, "CR": 2, "PSID": 3, "TSID": 4, "SCH": 0, "SCA": 0}});
        format!(
            "42{}",
            json!(["message", { "ActiveMQMessage": inner.to_string() }])
        )
    }

    fn received(raw: &str) -> FeedEvent {
        FeedEvent::FrameReceived(frame::decode(raw))
    }

    fn open_machine() -> FeedMachine {
        let mut machine = FeedMachine::new("m1").unwrap();
        assert!(machine.connect());
        machine.handle(FeedEvent::Opened);
        machine
    }

    #[test]
    fn handshake_subscribes_and_acks() {
        let mut machine = FeedMachine::new("m1").unwrap();
        assert_eq!(machine.state(), ConnectionState::Disconnected);

        assert!(machine.connect());
        assert_eq!(machine.state(), ConnectionState::Connecting);

        assert!(machine.handle(FeedEvent::Opened).is_empty());
        assert_eq!(machine.state(), ConnectionState::Open);

        assert!(machine.handle(received("0{\"sid\":\"abc\"}")).is_empty());
        assert_eq!(machine.state(), ConnectionState::Open);

        let actions = machine.handle(received("40"));
        assert_eq!(machine.state(), ConnectionState::Subscribed);
        assert_eq!(
            actions,
            vec![Action::Send(frame::encode_subscribe("m1").unwrap())]
        );

        let actions = machine.handle(received(&event_frame()));
        assert_eq!(machine.state(), ConnectionState::Subscribed);
        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[0], Action::Publish(update) if update.eid == "?"));
        assert_eq!(actions[1], Action::Send("2".to_owned()));
    }

    #[test]
    fn keepalive_frames_are_no_ops() {
        let mut machine = open_machine();
        machine.handle(received("40"));

        assert!(machine.handle(received("3")).is_empty());
        assert!(machine.handle(received("0")).is_empty());
        assert!(machine.handle(received("41")).is_empty());
        assert_eq!(machine.state(), ConnectionState::Subscribed);
    }

    #[test]
    fn undecodable_events_are_still_acknowledged() {
        let mut machine = open_machine();
        machine.handle(received("40"));

        for raw in ["42not json", "42{}", r#"42["message",{"ActiveMQMessage":"{"}]"#, r#"42["ping",{}]"#] {
            let actions = machine.handle(received(raw));
            assert_eq!(actions, vec![Action::Send("2".to_owned())], "frame {raw}");
        }
        assert_eq!(machine.state(), ConnectionState::Subscribed);
    }

    #[test]
    fn frames_before_open_are_ignored() {
        let mut machine = FeedMachine::new("m1").unwrap();
        machine.connect();

        assert!(machine.handle(received("40")).is_empty());
        assert_eq!(machine.state(), ConnectionState::Connecting);
    }

    #[test]
    fn close_and_error_end_in_closed() {
        let mut machine = open_machine();
        machine.handle(FeedEvent::Closed(Some("bye".to_owned())));
        assert_eq!(machine.state(), ConnectionState::Closed);

        assert!(machine.connect());
        machine.handle(FeedEvent::Opened);
        machine.handle(received("40"));
        machine.handle(FeedEvent::Errored("reset".to_owned()));
        assert_eq!(machine.state(), ConnectionState::Closed);
    }

    #[test]
    fn failed_attempt_ends_in_closed() {
        let mut machine = FeedMachine::new("m1").unwrap();
        machine.connect();

        machine.handle(FeedEvent::Errored("refused".to_owned()));
        assert_eq!(machine.state(), ConnectionState::Closed);
    }

    #[test]
    fn connect_is_idempotent_while_active() {
        let mut machine = FeedMachine::new("m1").unwrap();
        assert!(machine.connect());
        assert!(!machine.connect());

        machine.handle(FeedEvent::Opened);
        assert!(!machine.connect());
        assert_eq!(machine.state(), ConnectionState::Open);
    }

    #[test]
    fn disconnect_is_terminal() {
        let mut machine = open_machine();
        machine.handle(received("40"));

        machine.disconnect();
        assert_eq!(machine.state(), ConnectionState::Disconnected);
        assert!(machine.is_disconnected());

        assert!(machine.handle(received(&event_frame())).is_empty());
        assert!(machine.handle(FeedEvent::Closed(None)).is_empty());
        assert!(!machine.connect());
        assert_eq!(machine.state(), ConnectionState::Disconnected);
    }
}
