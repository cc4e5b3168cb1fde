//! Types for the discovery handshake.
//!
//! - **Request types**: query parameter sets sent to the player page and to the
//!   feed socket ([`request::PlayerRequest`], [`request::SocketRequest`]).
//! - **Response types**: the handshake result ([`response::DiscoveryTarget`]).

pub mod request;
pub mod response;
