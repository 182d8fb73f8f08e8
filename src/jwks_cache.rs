use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use jsonwebtoken::jwk::JwkSet;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::fetch_jwks_error;
use crate::error::openid_config_error;
use crate::error::LookupError;

#[derive(Debug, Deserialize)]
struct OpenIdConfig {
    jwks_uri: String,
}

struct CachedJwks {
    jwks: Arc<JwkSet>,
    fetched_at: Instant,
}

impl CachedJwks {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Per-issuer JWKS cache with time based expiry
pub(crate) struct JwksCache {
    entries: RwLock<HashMap<String, CachedJwks>>,
    ttl: Duration,
    client: Client,
}

impl JwksCache {
    pub(crate) fn new(ttl: Duration, client: Client) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            client,
        }
    }

    /// JWKS of a trusted issuer, fetched when missing or stale
    pub(crate) async fn get(&self, issuer: &str) -> Result<Arc<JwkSet>, LookupError> {
        if let Some(jwks) = self.cached(issuer).await {
            return Ok(jwks);
        }

        let jwks = Arc::new(self.fetch(issuer).await?);
        self.entries.write().await.insert(
            issuer.to_string(),
            CachedJwks {
                jwks: Arc::clone(&jwks),
                fetched_at: Instant::now(),
            },
        );
        Ok(jwks)
    }

    async fn cached(&self, issuer: &str) -> Option<Arc<JwkSet>> {
        let entries = self.entries.read().await;
        entries
            .get(issuer)
            .filter(|cached| cached.is_fresh(self.ttl))
            .map(|cached| Arc::clone(&cached.jwks))
    }

    /// Resolve `jwks_uri` through OpenID discovery, then download the key set
    async fn fetch(&self, issuer: &str) -> Result<JwkSet, LookupError> {
        let discovery_url = format!(
            "{}/.well-known/openid-configuration",
            issuer.trim_end_matches('/')
        );
        tracing::debug!(issuer = %issuer, url = %discovery_url, "fetching OpenID configuration");

        let OpenIdConfig { jwks_uri } = self
            .client
            .get(&discovery_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(openid_config_error)?
            .json()
            .await
            .map_err(openid_config_error)?;

        self.client
            .get(&jwks_uri)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_jwks_error)?
            .json()
            .await
            .map_err(fetch_jwks_error)
    }
}
