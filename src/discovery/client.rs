//! Client for the three-step discovery handshake.
//!
//! Every step follows the same pattern: GET a page, collapse its line breaks,
//! and capture exactly one value with a fixed pattern. A missing match is a
//! [`DiscoveryError`] naming the extraction point.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{
    Client as ReqwestClient, Method, Request,
    header::{HeaderMap, HeaderValue},
};
use url::Url;

use super::error::DiscoveryError;
use super::types::request::{PlayerRequest, SocketRequest};
use super::types::response::DiscoveryTarget;
use crate::{Result, ToQueryParams as _, collapse_lines};

const PLAYER_ENDPOINT: &str = "https://videoplayer.betfair.com/GetPlayer.do";

static FRAME_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LV.setFrameSrc\('(.*?)'\)").expect("frame source pattern is valid")
});
static IFRAME_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<iframe.*?src="(.*?)".*?>"#).expect("iframe pattern is valid")
});
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window.socketServerURL = "https://(.*?)";"#).expect("hostname pattern is valid")
});
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window.validationToken = "(.*?)";"#).expect("token pattern is valid")
});
static TOPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window.matchId = "(.*?)";"#).expect("topic pattern is valid")
});

/// HTTP client performing the discovery handshake.
///
/// The underlying HTTP client keeps cookies between steps, the way a browser
/// session would.
///
/// # Example
///
/// ```no_run
/// use live_match_feed::discovery::Client;
///
/// // Default player endpoint
/// let client = Client::default();
///
/// // Or a custom one
/// let client = Client::new("https://player.example.com/GetPlayer.do").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    player: Url,
    client: ReqwestClient,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(PLAYER_ENDPOINT).expect("Client with default endpoint should succeed")
    }
}

impl Client {
    /// Creates a discovery client whose Step 1 request goes to `player_endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(player_endpoint: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "User-Agent",
            HeaderValue::from_static("Mozilla/5.0 (compatible; live-match-feed)"),
        );
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        let client = ReqwestClient::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            player: Url::parse(player_endpoint)?,
            client,
        })
    }

    /// Returns the Step 1 player endpoint.
    #[must_use]
    pub fn player_endpoint(&self) -> &Url {
        &self.player
    }

    /// Runs all three steps for `event_id` and assembles the connection target.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::Kind::Discovery`] error naming the first value
    /// that could not be extracted, or a transport/status error if a page could
    /// not be fetched.
    pub async fn discover(&self, event_id: &str) -> Result<DiscoveryTarget> {
        let frame_source = self.frame_source(event_id).await?;
        let iframe_source = self.iframe_source(&frame_source).await?;
        let target = self.connection_target(&iframe_source).await?;

        tracing::info!(topic = %target.topic, "discovered feed connection target");

        Ok(target)
    }

    /// Step 1: fetches the player page and extracts the frame source URL.
    ///
    /// The player parameters are appended to any query the endpoint already carries.
    pub async fn frame_source(&self, event_id: &str) -> Result<Url> {
        let request = self
            .client
            .request(Method::GET, self.player.clone())
            .query(&PlayerRequest::for_event(event_id))
            .build()?;
        let contents = self.fetch(request).await?;

        let source = extract(&FRAME_SOURCE, &contents, DiscoveryError::InvalidUrl1)?;
        Ok(self.player.join(&unescape_attribute(&source))?)
    }

    /// Step 2: fetches the frame source page and extracts the embedded iframe URL.
    pub async fn iframe_source(&self, frame_source: &Url) -> Result<Url> {
        let request = self.client.request(Method::GET, frame_source.clone()).build()?;
        let contents = self.fetch(request).await?;

        let source = extract(&IFRAME_SOURCE, &contents, DiscoveryError::InvalidUrl2)?;
        Ok(frame_source.join(&unescape_attribute(&source))?)
    }

    /// Step 3: fetches the iframe page and assembles the connection target.
    pub async fn connection_target(&self, iframe_source: &Url) -> Result<DiscoveryTarget> {
        let request = self.client.request(Method::GET, iframe_source.clone()).build()?;
        let contents = self.fetch(request).await?;

        Ok(parse_target(&contents, iframe_source)?)
    }

    async fn fetch(&self, request: Request) -> Result<String> {
        let contents = crate::request_text(&self.client, request).await?;

        Ok(collapse_lines(&contents))
    }
}

/// Extracts the connection target from the (collapsed) Step 3 page.
///
/// `wt` is not part of the page: it is read from the query string of the URL
/// the page was fetched from.
pub fn parse_target(
    contents: &str,
    iframe_source: &Url,
) -> std::result::Result<DiscoveryTarget, DiscoveryError> {
    let hostname = extract(&HOSTNAME, contents, DiscoveryError::InvalidHostname)?;
    let token = extract(&TOKEN, contents, DiscoveryError::InvalidToken)?;
    let wt = wt(iframe_source)?;
    let web_socket_url = socket_url(&hostname, &token, &wt);
    let topic = extract(&TOPIC, contents, DiscoveryError::InvalidTopic)?;

    Ok(DiscoveryTarget {
        web_socket_url,
        topic,
    })
}

/// Builds the feed socket URL for `hostname` with the fixed parameter set.
///
/// Values are form-encoded with `*` escaped and `~` left as is, the way the
/// feed's own web client encodes them.
#[must_use]
pub fn socket_url(hostname: &str, token: &str, wt: &str) -> String {
    let query = SocketRequest::builder()
        .token(token)
        .wt(wt)
        .build()
        .query_params()
        .replace('*', "%2A")
        .replace("%7E", "~");

    format!("wss://{hostname}/socket.io/{query}")
}

fn wt(url: &Url) -> std::result::Result<String, DiscoveryError> {
    url.query_pairs()
        .find_map(|(key, value)| (key == "wt").then(|| value.into_owned()))
        .ok_or(DiscoveryError::InvalidWt)
}

fn extract(
    pattern: &Regex,
    contents: &str,
    error: DiscoveryError,
) -> std::result::Result<String, DiscoveryError> {
    let value = pattern
        .captures(contents)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_owned());

    match value {
        Some(value) => {
            tracing::debug!(step = error.step(), %value, "extracted discovery value");
            Ok(value)
        }
        None => {
            tracing::error!(step = error.step(), "{error}");
            Err(error)
        }
    }
}

fn unescape_attribute(value: &str) -> String {
    value.replace("&amp;", "&")
}
