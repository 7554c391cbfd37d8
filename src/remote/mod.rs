// src/remote/mod.rs
// Queries a peer's health endpoint and checks its self-reported identity
// against the local compatibility map.
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::compat::{is_compatible_with, CompatibilityMap};

/// Minimum shape a peer's health response must expose.
#[derive(Debug, Deserialize)]
struct PeerIdentity {
    name: String,
    version: String,
}

pub struct RemoteCompatibilityClient {
    client: Client,
}

impl RemoteCompatibilityClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use a preconfigured client, e.g. one carrying a request timeout.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the peer's self-reported name and version and test them against
    /// `map`. Fails closed: transport errors, non-success statuses, and
    /// malformed bodies all report `false`. The failure is logged but never
    /// surfaced to the caller; no retry is attempted.
    pub async fn check_compatibility_with(
        &self,
        map: &CompatibilityMap,
        peer_health_url: &str,
    ) -> bool {
        let peer = match self.fetch_identity(peer_health_url).await {
            Ok(peer) => peer,
            Err(err) => {
                warn!(url = peer_health_url, %err, "failed to read peer health endpoint");
                return false;
            }
        };

        is_compatible_with(map, &peer.name, &peer.version)
    }

    async fn fetch_identity(&self, url: &str) -> Result<PeerIdentity> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

impl Default for RemoteCompatibilityClient {
    fn default() -> Self {
        Self::new()
    }
}
