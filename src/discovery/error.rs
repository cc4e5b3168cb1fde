#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;

/// A required value could not be extracted during the discovery handshake.
///
/// Each variant names the extraction point that failed. None of them is
/// recoverable: without a connection target there is nothing to connect to.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DiscoveryError {
    /// Step 1: the player page has no `LV.setFrameSrc('...')` call
    #[strum(to_string = "Invalid URL - #1")]
    InvalidUrl1,
    /// Step 2: the frame source page has no `<iframe src="...">`
    #[strum(to_string = "Invalid URL - #2")]
    InvalidUrl2,
    /// Step 3: the iframe page does not declare `window.socketServerURL`
    #[strum(to_string = "Invalid Hostname")]
    InvalidHostname,
    /// Step 3: the iframe page does not declare `window.validationToken`
    #[strum(to_string = "Invalid Token")]
    InvalidToken,
    /// Step 3: the iframe page does not declare `window.matchId`
    #[strum(to_string = "Invalid Match ID")]
    InvalidTopic,
    /// Step 3: the iframe URL has no `wt` query parameter
    #[strum(to_string = "Invalid wt")]
    InvalidWt,
}

impl DiscoveryError {
    /// The handshake step (1, 2 or 3) this extraction belongs to.
    #[must_use]
    pub const fn step(self) -> u8 {
        match self {
            Self::InvalidUrl1 => 1,
            Self::InvalidUrl2 => 2,
            Self::InvalidHostname | Self::InvalidToken | Self::InvalidTopic | Self::InvalidWt => 3,
        }
    }
}

impl StdError for DiscoveryError {}

impl From<DiscoveryError> for crate::error::Error {
    fn from(e: DiscoveryError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Discovery, e)
    }
}
