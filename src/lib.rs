#![cfg_attr(doc, doc = include_str!("../README.md"))]

#[cfg(feature = "discovery")]
pub mod discovery;
pub mod error;
#[cfg(feature = "ws")]
pub mod feed;
#[cfg(feature = "listing")]
pub mod listing;
pub(crate) mod serde_helpers;
pub mod types;
#[cfg(feature = "ws")]
pub mod ws;

#[cfg(any(feature = "discovery", feature = "listing"))]
use reqwest::Request;
use serde::Serialize;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields, in declaration order,
/// into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| tracing::error!("Unable to convert to URL-encoded string {e:?}"))
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}

/// Replaces every line break in `contents` so single-line patterns can span the page.
#[cfg(any(feature = "discovery", feature = "listing"))]
pub(crate) fn collapse_lines(contents: &str) -> String {
    contents.replace(['\r', '\n'], "")
}

/// Executes `request` and returns the response body as text.
///
/// Non-success status codes are reported as [`error::Kind::Status`] errors.
#[cfg(any(feature = "discovery", feature = "listing"))]
#[tracing::instrument(
    level = "debug",
    skip(client, request),
    fields(
        method = %request.method(),
        path = request.url().path(),
        status_code
    )
)]
async fn request_text(client: &reqwest::Client, request: Request) -> Result<String> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "page request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Params {
        #[serde(rename = "eID")]
        event_id: u64,
        flag: bool,
        text: &'static str,
    }

    #[test]
    fn query_params_keep_field_order() {
        let params = Params {
            event_id: 42,
            flag: true,
            text: "a b",
        };

        assert_eq!(params.query_params(), "?eID=42&flag=true&text=a+b");
    }

    #[cfg(any(feature = "discovery", feature = "listing"))]
    #[test]
    fn collapse_lines_removes_line_breaks() {
        assert_eq!(collapse_lines("a\nb\r\nc"), "abc");
    }
}
