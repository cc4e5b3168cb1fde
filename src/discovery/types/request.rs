#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;

/// Query parameters for the video player page (Step 1).
///
/// Everything except the event id is fixed by the player.
#[derive(Debug, Clone, Builder, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct PlayerRequest {
    #[builder(default = true)]
    pub allow_popup: bool,
    #[builder(default = true)]
    pub content_only: bool,
    #[builder(default = "viz".to_owned(), into)]
    pub content_type: String,
    #[builder(default = "viz".to_owned(), into)]
    pub content_view: String,
    #[serde(rename = "eID")]
    #[builder(into)]
    pub event_id: String,
    #[builder(default = 214)]
    pub height: u32,
    #[builder(default = 2)]
    pub tr: u32,
    #[builder(default = 374)]
    pub width: u32,
}

impl PlayerRequest {
    /// Player request for one match with the default layout.
    #[must_use]
    pub fn for_event<S: Into<String>>(event_id: S) -> Self {
        Self::builder().event_id(event_id).build()
    }
}

/// Query parameters of the feed socket URL.
///
/// The upstream server matches these byte for byte, field order included. The
/// `cssdiff` and `referer` values are already percent-encoded and get encoded
/// once more on serialization, which is what the server expects.
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct SocketRequest {
    #[builder(
        default = "https%3A%2F%2Fassets.cdnbf.net%2Fstatic%2Fdatavis%2Fbf-css%2Fbetfair1.css".to_owned(),
        into
    )]
    pub cssdiff: String,
    #[builder(default = "viz".to_owned(), into)]
    pub defaultview: String,
    #[serde(rename = "EIO")]
    #[builder(default = 3)]
    pub eio: u8,
    #[builder(default = "n".to_owned(), into)]
    pub flash: String,
    #[builder(default = 438)]
    pub height: u32,
    #[builder(default = "en".to_owned(), into)]
    pub lang: String,
    #[builder(default = false)]
    pub multimatch: bool,
    #[serde(rename = "partnerId")]
    #[builder(default = 7)]
    pub partner_id: u32,
    #[builder(
        default = "https%3A%2F%2Fwab-visualisation.performgroup.com%2Fcsb%2Findex.html%3FwbuserId".to_owned(),
        into
    )]
    pub referer: String,
    #[builder(default = false)]
    pub statsswitch: bool,
    #[builder(default = true)]
    pub streamonly: bool,
    #[builder(into)]
    pub token: String,
    #[builder(default = "wab-visualisation.performgroup.com".to_owned(), into)]
    pub topreferer: String,
    #[builder(default = "websocket".to_owned(), into)]
    pub transport: String,
    #[builder(default = "1.31".to_owned(), into)]
    pub version: String,
    #[builder(default = 600)]
    pub width: u32,
    #[builder(into)]
    pub wt: String,
}
