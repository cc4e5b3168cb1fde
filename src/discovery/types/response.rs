use bon::Builder;
use serde::{Deserialize, Serialize};

/// Connection target produced by the discovery handshake.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct DiscoveryTarget {
    /// `wss://{hostname}/socket.io/?...` URL of the feed
    #[builder(into)]
    pub web_socket_url: String,
    /// Identifier the feed server uses to scope updates to one match
    #[builder(into)]
    pub topic: String,
}
