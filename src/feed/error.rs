#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

/// An event payload could not be interpreted.
///
/// Never fatal to the connection: the frame is still acknowledged.
#[non_exhaustive]
#[derive(Debug)]
pub enum DecodeError {
    /// The body, the wrapped message, or the `MLU` object is not valid JSON
    /// for its expected type
    Json(serde_json::Error),
    /// The body is JSON but not an `[event, payload]` array
    Shape(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Failed to decode event payload: {e}"),
            Self::Shape(reason) => write!(f, "Unexpected event shape: {reason}"),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Shape(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<DecodeError> for crate::error::Error {
    fn from(e: DecodeError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Decode, e)
    }
}
