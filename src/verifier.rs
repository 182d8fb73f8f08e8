use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::Uri;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde_json::Value;
use thiserror::Error;

use crate::claims::Claims;
use crate::claims::CompleteToken;
use crate::claims::UnverifiedToken;
use crate::claims::VerifiedClaims;
use crate::config::AuthConfig;
use crate::error::Error;
use crate::error::Result;
use crate::extractor::extract_token;
use crate::issuer::IssuerLookup;
use crate::issuer::IssuerPolicy;
use crate::issuer::IssuerRecord;

/// Trait for JWT verification
#[async_trait]
pub trait VerifyJwt {
    /// Verify a raw token and return its claims
    async fn verify(&self, token: &str) -> Result<VerifiedClaims>;
}

/// Bearer token validator resolving key material from the token's issuer
///
/// Generic over the [`IssuerLookup`] collaborator supplying the issuer's key
/// and verification policy.
pub struct JwtValidator<L> {
    config: Arc<AuthConfig>,
    lookup: L,
}

impl<L: IssuerLookup> JwtValidator<L> {
    pub fn new(config: AuthConfig, lookup: L) -> Self {
        Self {
            config: Arc::new(config),
            lookup,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Locate the raw token in the request, see [`extract_token`]
    pub fn extract(&self, headers: &HeaderMap, uri: &Uri) -> Option<String> {
        extract_token(&self.config, headers, uri.query())
    }

    /// Extract and verify the request's credential
    pub async fn authenticate(&self, headers: &HeaderMap, uri: &Uri) -> Result<VerifiedClaims> {
        let Some(token) = self.extract(headers, uri) else {
            tracing::debug!("no token supplied");
            return Err(Error::NoToken);
        };
        self.verify(&token).await
    }

    /// Ask the lookup for the claimed issuer's record
    async fn resolve_issuer(&self, unverified: &UnverifiedToken) -> Result<IssuerRecord> {
        let issuer = unverified.issuer();
        match self.lookup.fetch_issuer_data(issuer, unverified).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                tracing::debug!(issuer = %issuer, "no issuer data");
                Err(Error::NoIssuerData(issuer.to_string()))
            }
            Err(error) => {
                tracing::warn!(issuer = %issuer, error = %error, "issuer data lookup failed");
                Err(Error::IssuerLookupFailed(issuer.to_string()))
            }
        }
    }
}

#[async_trait]
impl<L: IssuerLookup> VerifyJwt for JwtValidator<L> {
    async fn verify(&self, token: &str) -> Result<VerifiedClaims> {
        let unverified = UnverifiedToken::decode(token)?;
        let record = self.resolve_issuer(&unverified).await?;
        let options = VerifyOptions::merge(record.policy(), &self.config);

        verify_signature(token, record.key(), &options).map_err(|error| {
            tracing::debug!(
                issuer = %unverified.issuer(),
                error = %error,
                "unable to verify jwt"
            );
            Error::InvalidSignature
        })
    }
}

/// Issuer policy combined with the global configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VerifyOptions {
    algorithms: Vec<Algorithm>,
    audiences: Option<Vec<String>>,
    clock_tolerance: Duration,
    max_age: Duration,
    subject: Option<String>,
    validate_exp: bool,
    validate_nbf: bool,
    complete: bool,
}

impl VerifyOptions {
    pub(crate) fn merge(policy: &IssuerPolicy, config: &AuthConfig) -> Self {
        Self {
            algorithms: policy.algorithms.clone(),
            audiences: policy.audiences.clone(),
            clock_tolerance: policy.clock_tolerance,
            max_age: policy.max_age.unwrap_or(config.max_age),
            subject: policy.subject.clone(),
            validate_exp: !policy.ignore_expiration,
            validate_nbf: !policy.ignore_not_before,
            complete: config.complete_token,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.algorithms = self.algorithms.clone();
        validation.leeway = self.clock_tolerance.as_secs();
        validation.validate_exp = self.validate_exp;
        validation.validate_nbf = self.validate_nbf;
        validation.set_required_spec_claims(&["iss", "sub", "aud"]);
        match &self.audiences {
            Some(audiences) => validation.set_audience(audiences.as_slice()),
            None => validation.validate_aud = false,
        }
        validation.sub = self.subject.clone();
        validation
    }
}

#[derive(Error, Debug)]
pub(crate) enum SignatureError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("\"iat\" required when a maximum token age is enforced")]
    IssuedAtMissing,
    #[error("maximum token age exceeded: issued at {issued_at}, max age {max_age:?}")]
    MaxAgeExceeded { issued_at: f64, max_age: Duration },
}

/// Fully verify a token against the issuer's key and the merged options
pub(crate) fn verify_signature(
    token: &str,
    key: &DecodingKey,
    options: &VerifyOptions,
) -> std::result::Result<VerifiedClaims, SignatureError> {
    let token_data = decode::<Claims>(token, key, &options.validation())?;
    check_max_age(&token_data.claims, options)?;

    if !options.complete {
        return Ok(VerifiedClaims::payload(token_data.claims));
    }

    let signature = token.rsplit('.').next().unwrap_or_default().to_string();
    Ok(VerifiedClaims::complete(CompleteToken::new(
        token_data.header,
        token_data.claims,
        signature,
    )))
}

fn check_max_age(
    claims: &Claims,
    options: &VerifyOptions,
) -> std::result::Result<(), SignatureError> {
    let issued_at = claims
        .get("iat")
        .and_then(Value::as_f64)
        .ok_or(SignatureError::IssuedAtMissing)?;

    let now = Utc::now().timestamp() as f64;
    let deadline =
        issued_at + options.max_age.as_secs_f64() + options.clock_tolerance.as_secs_f64();
    if now >= deadline {
        return Err(SignatureError::MaxAgeExceeded {
            issued_at,
            max_age: options.max_age,
        });
    }
    Ok(())
}
