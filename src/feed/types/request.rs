#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

/// Options of the `subscribe` event sent once the namespace is connected.
///
/// The server expects the flags as the strings `"true"`/`"false"`.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "PascalCase")]
pub struct SubscribeRequest {
    #[builder(into)]
    pub topic: String,
    #[serde_as(as = "DisplayFromStr")]
    #[builder(default = true)]
    pub conditions_updates: bool,
    #[serde_as(as = "DisplayFromStr")]
    #[builder(default = true)]
    pub live_updates: bool,
    #[serde_as(as = "DisplayFromStr")]
    #[builder(default = false)]
    pub odds_updates: bool,
    #[serde_as(as = "DisplayFromStr")]
    #[builder(default = false)]
    pub video_updates: bool,
}

impl SubscribeRequest {
    /// Event name the request is emitted under.
    pub const EVENT: &'static str = "subscribe";

    /// Live and conditions updates for `topic`, no odds or video.
    #[must_use]
    pub fn new<S: Into<String>>(topic: S) -> Self {
        Self::builder().topic(topic).build()
    }
}

/// A socket.io event, serialized as the two-element array `[name, payload]`.
#[derive(Debug, Serialize)]
pub struct EventMessage<'a, P: Serialize>(pub &'a str, pub &'a P);
