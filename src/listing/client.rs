use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use url::Url;

use super::types::{EventUpdate, Match, PlatformConfig, Teams};
use crate::error::Error;
use crate::serde_helpers::deserialize_str;
use crate::types::{DateTime, Utc};
use crate::{Result, collapse_lines};

const LISTING_PAGE: &str = "https://www.betfair.com/sport/football";

static DATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"platformConfig = (\{.*?\});").expect("platform config pattern is valid")
});
static MATCHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"data-eventId="(\d+?)".*?class="home-team-name"\s*title="(.*?)".*?class="away-team-name"\s*title="(.*?)""#,
    )
    .expect("match anchor pattern is valid")
});

/// HTTP client for the football listing page.
#[derive(Clone, Debug)]
pub struct Client {
    page: Url,
    client: ReqwestClient,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(LISTING_PAGE).expect("Client with default page should succeed")
    }
}

impl Client {
    /// Creates a listing client reading from `page`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(page: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "User-Agent",
            HeaderValue::from_static("Mozilla/5.0 (compatible; live-match-feed)"),
        );
        headers.insert("Accept", HeaderValue::from_static("text/html"));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        Ok(Self {
            page: Url::parse(page)?,
            client,
        })
    }

    /// Returns the listing page URL.
    #[must_use]
    pub fn page(&self) -> &Url {
        &self.page
    }

    /// Fetches the listing page and returns its upcoming matches in page order.
    pub async fn matches(&self) -> Result<Vec<Match>> {
        let request = self.client.request(Method::GET, self.page.clone()).build()?;
        let contents = crate::request_text(&self.client, request).await?;

        parse_matches(&contents)
    }
}

/// Parses the listing page into match records.
///
/// Anchors whose event id has no kick-off time in the `platformConfig` blob are
/// skipped.
///
/// # Errors
///
/// Returns a [`crate::error::Kind::Validation`] error if the page carries no
/// `platformConfig` blob, or an internal error if the blob is not valid JSON.
pub fn parse_matches(contents: &str) -> Result<Vec<Match>> {
    let contents = collapse_lines(contents);
    let dates = dates(&contents)?;

    let matches = MATCHES
        .captures_iter(&contents)
        .filter_map(|captures| {
            let (_, [id, home, away]) = captures.extract();
            let Ok(id) = id.parse::<u64>() else {
                tracing::warn!(%id, "event id out of range, skipping");
                return None;
            };
            let Some(date) = dates.get(&id) else {
                tracing::warn!(id, "no start time for event, skipping");
                return None;
            };

            Some(Match {
                id,
                teams: Teams {
                    home: home.to_owned(),
                    away: away.to_owned(),
                },
                date: *date,
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!(count = matches.len(), "parsed match listing");

    Ok(matches)
}

fn dates(contents: &str) -> Result<HashMap<u64, DateTime<Utc>>> {
    let blob = DATES
        .captures(contents)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| Error::validation("listing page has no platformConfig blob"))?;
    let config: PlatformConfig = deserialize_str(blob.as_str())?;

    let mut dates = HashMap::new();
    for instruction in config.page.config.instructions {
        if instruction.kind != "eventupdates" {
            continue;
        }

        let updates: Vec<EventUpdate> = serde_json::from_value(instruction.arguments)?;
        for update in updates {
            match start_time(update.start_time) {
                Some(date) => {
                    dates.insert(update.event_id, date);
                }
                None => {
                    tracing::warn!(
                        event_id = update.event_id,
                        start_time = update.start_time,
                        "start time out of range"
                    );
                }
            }
        }
    }

    Ok(dates)
}

/// Epoch milliseconds to a UTC instant, truncated to whole seconds.
fn start_time(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(millis / 1000, 0)
}
