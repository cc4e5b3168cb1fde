use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::types::{DateTime, Utc, Value};

/// One upcoming match from the listing page.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct Match {
    /// Event id, usable as input to the discovery handshake
    pub id: u64,
    pub teams: Teams,
    /// Kick-off, truncated to whole seconds
    pub date: DateTime<Utc>,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct Teams {
    #[builder(into)]
    pub home: String,
    #[builder(into)]
    pub away: String,
}

/// The `platformConfig` blob, reduced to what the listing needs.
#[derive(Debug, Deserialize)]
pub(crate) struct PlatformConfig {
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page {
    pub config: PageConfig,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageConfig {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// A page instruction. Only `eventupdates` arguments are interpreted, so the
/// others are kept as raw JSON.
#[derive(Debug, Deserialize)]
pub(crate) struct Instruction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub arguments: Value,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventUpdate {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub event_id: u64,
    /// Epoch milliseconds
    pub start_time: i64,
}
