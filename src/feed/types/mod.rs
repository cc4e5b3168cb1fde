//! Types exchanged with the feed server.
//!
//! - **Request types**: messages the client emits ([`request::SubscribeRequest`]).
//! - **Response types**: records projected out of event payloads
//!   ([`response::MatchLiveUpdate`]).

pub mod request;
pub mod response;
