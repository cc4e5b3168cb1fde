use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP method type, re-exported for use with error inspection.
#[cfg(any(feature = "discovery", feature = "listing"))]
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
#[cfg(any(feature = "discovery", feature = "listing"))]
pub use reqwest::StatusCode;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to non-successful HTTP call
    Status,
    /// Error related to invalid input or invalid client state
    Validation,
    /// Internal error from dependencies
    Internal,
    /// Error related to WebSocket connections
    WebSocket,
    /// A required value could not be extracted during the discovery handshake
    Discovery,
    /// A feed event payload could not be decoded
    Decode,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    #[cfg(any(feature = "discovery", feature = "listing"))]
    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[cfg(any(feature = "discovery", feature = "listing"))]
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

#[cfg(any(feature = "discovery", feature = "listing"))]
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

#[cfg(any(feature = "discovery", feature = "listing"))]
impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

#[cfg(any(feature = "discovery", feature = "listing"))]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

#[cfg(any(feature = "discovery", feature = "listing"))]
impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_should_succeed() {
        let error = Error::validation("connection was explicitly disconnected");

        assert_eq!(error.kind(), Kind::Validation);
        assert_eq!(
            error.to_string(),
            "Validation: invalid: connection was explicitly disconnected"
        );
    }

    #[test]
    fn downcast_recovers_source() {
        let error = Error::validation("bad");

        let validation = error.downcast_ref::<Validation>().unwrap();
        assert_eq!(validation.reason, "bad");
    }

    #[cfg(any(feature = "discovery", feature = "listing"))]
    #[test]
    fn status_display_should_succeed() {
        let error = Error::status(
            StatusCode::NOT_FOUND,
            Method::GET,
            "/GetPlayer.do".to_owned(),
            "missing",
        );

        assert_eq!(error.kind(), Kind::Status);
        assert!(error.to_string().contains("/GetPlayer.do"));
    }
}
