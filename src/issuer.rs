//! Issuer key material and the lookup collaborator that resolves it
//!
//! The validator asks an [`IssuerLookup`] for an [`IssuerRecord`] every time it
//! sees a token. Caching, if any, is the lookup's business.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;

use crate::claims::UnverifiedToken;
use crate::error::LookupError;

/// Verification constraints an issuer places on its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerPolicy {
    pub(crate) algorithms: Vec<Algorithm>,
    pub(crate) audiences: Option<Vec<String>>,
    pub(crate) clock_tolerance: Duration,
    pub(crate) max_age: Option<Duration>,
    pub(crate) subject: Option<String>,
    pub(crate) ignore_expiration: bool,
    pub(crate) ignore_not_before: bool,
}

impl IssuerPolicy {
    /// Accept tokens signed with any of the given algorithms
    pub fn new(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            algorithms: algorithms.into_iter().collect(),
            audiences: None,
            clock_tolerance: Duration::ZERO,
            max_age: None,
            subject: None,
            ignore_expiration: false,
            ignore_not_before: false,
        }
    }

    /// Require the token's audience to contain this value
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audiences
            .get_or_insert_with(Vec::new)
            .push(audience.into());
        self
    }

    /// Require the token's audience to match at least one of these values
    pub fn with_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audiences = Some(audiences.into_iter().map(Into::into).collect());
        self
    }

    /// Tolerated clock drift applied to `exp`, `nbf` and max-age checks
    pub fn with_clock_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_tolerance = tolerance;
        self
    }

    /// Overrides the configured default maximum token age
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn ignore_expiration(mut self, ignore: bool) -> Self {
        self.ignore_expiration = ignore;
        self
    }

    pub fn ignore_not_before(mut self, ignore: bool) -> Self {
        self.ignore_not_before = ignore;
        self
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn audiences(&self) -> Option<&[String]> {
        self.audiences.as_deref()
    }
}

/// Key material and policy returned by an [`IssuerLookup`]
#[derive(Clone)]
pub struct IssuerRecord {
    key: DecodingKey,
    policy: IssuerPolicy,
}

impl IssuerRecord {
    pub fn new(key: DecodingKey, policy: IssuerPolicy) -> Self {
        Self { key, policy }
    }

    pub fn key(&self) -> &DecodingKey {
        &self.key
    }

    pub fn policy(&self) -> &IssuerPolicy {
        &self.policy
    }
}

impl fmt::Debug for IssuerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerRecord")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Resolves verification material for the issuer a token claims
///
/// Implementations return `Ok(None)` for issuers they do not recognise and
/// reserve `Err` for failures of the lookup itself (network, storage, ...).
#[async_trait]
pub trait IssuerLookup: Send + Sync {
    async fn fetch_issuer_data(
        &self,
        issuer: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<IssuerRecord>, LookupError>;
}

/// In-memory lookup keyed by issuer
#[derive(Clone, Debug, Default)]
pub struct StaticIssuers {
    issuers: HashMap<String, IssuerRecord>,
}

impl StaticIssuers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>, record: IssuerRecord) -> Self {
        self.issuers.insert(issuer.into(), record);
        self
    }
}

#[async_trait]
impl IssuerLookup for StaticIssuers {
    async fn fetch_issuer_data(
        &self,
        issuer: &str,
        _token: &UnverifiedToken,
    ) -> Result<Option<IssuerRecord>, LookupError> {
        Ok(self.issuers.get(issuer).cloned())
    }
}

/// Lookup backed by an async closure, see [`lookup_fn`]
#[derive(Clone)]
pub struct FnLookup<F> {
    f: F,
}

/// Build an [`IssuerLookup`] from an async closure taking the issuer and the unverified token
///
/// ```rust
/// use issuer_gate::{lookup_fn, IssuerPolicy, IssuerRecord, LookupError};
/// use jsonwebtoken::{Algorithm, DecodingKey};
///
/// let lookup = lookup_fn(|issuer: String, _token| async move {
///     Ok::<_, LookupError>((issuer == "https://issuer.example").then(|| {
///         IssuerRecord::new(
///             DecodingKey::from_secret(b"secret"),
///             IssuerPolicy::new([Algorithm::HS256]),
///         )
///     }))
/// });
/// # let _ = lookup;
/// ```
pub fn lookup_fn<F, Fut>(f: F) -> FnLookup<F>
where
    F: Fn(String, UnverifiedToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<IssuerRecord>, LookupError>> + Send,
{
    FnLookup { f }
}

#[async_trait]
impl<F, Fut> IssuerLookup for FnLookup<F>
where
    F: Fn(String, UnverifiedToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<IssuerRecord>, LookupError>> + Send,
{
    async fn fetch_issuer_data(
        &self,
        issuer: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<IssuerRecord>, LookupError> {
        (self.f)(issuer.to_string(), token.clone()).await
    }
}
