//! Issuer lookup through OpenID Connect discovery
//!
//! Only issuers registered in [`OidcConfig`] are trusted; a token naming any
//! other issuer is answered with "no issuer data" without touching the network.
//! For a trusted issuer the lookup fetches
//! `<issuer>/.well-known/openid-configuration`, downloads the `jwks_uri` key set,
//! and picks the key named by the token's `kid` header.
//!
//! Key sets are cached per issuer for a configurable TTL (default: 1 hour).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::AlgorithmParameters;
use jsonwebtoken::jwk::EllipticCurveKeyParameters;
use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::jwk::RSAKeyParameters;
use jsonwebtoken::DecodingKey;
use reqwest::Client;

use crate::claims::UnverifiedToken;
use crate::error::LookupError;
use crate::issuer::IssuerLookup;
use crate::issuer::IssuerPolicy;
use crate::issuer::IssuerRecord;
use crate::jwks_cache::JwksCache;

const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600;

/// Configuration for [`OidcIssuers`]
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Trusted issuers and the policy applied to their tokens
    pub(crate) issuers: HashMap<String, IssuerPolicy>,
    /// Time-to-live for cached JWKS (default: 1 hour)
    pub(crate) jwks_cache_ttl: Duration,
    /// Optional custom HTTP client for fetching JWKS
    /// If not provided, a default client will be created
    pub(crate) http_client: Option<Client>,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuers: HashMap::new(),
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            http_client: None,
        }
    }
}

impl OidcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust an issuer and verify its tokens under the given policy
    pub fn with_issuer(mut self, issuer: impl Into<String>, policy: IssuerPolicy) -> Self {
        self.issuers.insert(issuer.into(), policy);
        self
    }

    /// Set the JWKS cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    /// Set a custom HTTP client, e.g. to bound request time
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

/// [`IssuerLookup`] resolving signing keys of trusted OpenID Connect issuers
pub struct OidcIssuers {
    jwks_cache: JwksCache,
    issuers: HashMap<String, IssuerPolicy>,
}

impl OidcIssuers {
    pub fn new(config: OidcConfig) -> Self {
        let client = config.http_client.unwrap_or_default();

        Self {
            jwks_cache: JwksCache::new(config.jwks_cache_ttl, client),
            issuers: config.issuers,
        }
    }
}

#[async_trait]
impl IssuerLookup for OidcIssuers {
    async fn fetch_issuer_data(
        &self,
        issuer: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<IssuerRecord>, LookupError> {
        let Some(policy) = self.issuers.get(issuer) else {
            return Ok(None);
        };

        let Some(kid) = token.key_id() else {
            tracing::debug!(issuer = %issuer, "token has no kid header");
            return Ok(None);
        };

        let jwks = self.jwks_cache.get(issuer).await?;
        let Some(jwk) = jwks.find(kid) else {
            tracing::debug!(issuer = %issuer, kid = %kid, "kid not found in JWKS");
            return Ok(None);
        };

        Ok(decoding_key(jwk)?.map(|key| IssuerRecord::new(key, policy.clone())))
    }
}

/// Build a decoding key from an RSA, EC or octet JWK, `None` for other key types
fn decoding_key(jwk: &Jwk) -> Result<Option<DecodingKey>, LookupError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(RSAKeyParameters { n, e, .. }) => {
            Ok(Some(DecodingKey::from_rsa_components(n, e)?))
        }
        AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters { x, y, .. }) => {
            Ok(Some(DecodingKey::from_ec_components(x, y)?))
        }
        AlgorithmParameters::OctetKey(_) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
        other => {
            tracing::debug!(key = ?other, "unsupported JWK type");
            Ok(None)
        }
    }
}
