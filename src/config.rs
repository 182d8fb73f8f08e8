use std::time::Duration;

use axum::http::HeaderName;

use crate::error::ConfigError;

const DEFAULT_HEADER_NAME: &str = "authorization";
const DEFAULT_COOKIE_NAME: &str = "session";
const DEFAULT_QUERY_NAME: &str = "token";
const DEFAULT_SCHEME: &str = "bearer";
const DEFAULT_MAX_TOKEN_AGE_SECS: u64 = 14 * 24 * 60 * 60;

/// Configuration for credential extraction and token verification
///
/// Built once and captured by [`JwtValidator`](crate::JwtValidator); it is never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Header carrying `<scheme> <token>`, `None` disables header lookup
    pub(crate) header_name: Option<HeaderName>,
    /// Cookie carrying the raw token, `None` disables cookie lookup
    pub(crate) cookie_name: Option<String>,
    /// Query parameter carrying the raw token, `None` disables query lookup
    pub(crate) query_name: Option<String>,
    /// Expected scheme label, compared case-insensitively
    pub(crate) scheme: String,
    /// When set, a header without the expected scheme yields no token
    pub(crate) strict_scheme: bool,
    /// Maximum token age used when the issuer does not override it
    pub(crate) max_age: Duration,
    /// Return header, payload and signature instead of the payload only
    pub(crate) complete_token: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: Some(HeaderName::from_static(DEFAULT_HEADER_NAME)),
            cookie_name: Some(DEFAULT_COOKIE_NAME.to_string()),
            query_name: Some(DEFAULT_QUERY_NAME.to_string()),
            scheme: DEFAULT_SCHEME.to_string(),
            strict_scheme: false,
            max_age: Duration::from_secs(DEFAULT_MAX_TOKEN_AGE_SECS),
            complete_token: false,
        }
    }
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the token from the given header. An empty name disables header lookup.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidHeaderName` if the name is not a valid HTTP header name
    pub fn with_header_name(mut self, name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            self.header_name = None;
            return Ok(self);
        }
        let header = HeaderName::try_from(name)
            .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))?;
        self.header_name = Some(header);
        Ok(self)
    }

    pub fn without_header(mut self) -> Self {
        self.header_name = None;
        self
    }

    /// Read the token from the given cookie. An empty name disables cookie lookup.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = non_empty(name.into());
        self
    }

    pub fn without_cookie(mut self) -> Self {
        self.cookie_name = None;
        self
    }

    /// Read the token from the given query parameter. An empty name disables query lookup.
    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = non_empty(name.into());
        self
    }

    pub fn without_query(mut self) -> Self {
        self.query_name = None;
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_strict_scheme(mut self, strict: bool) -> Self {
        self.strict_scheme = strict;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_complete_token(mut self, complete: bool) -> Self {
        self.complete_token = complete;
        self
    }

    pub fn header_name(&self) -> Option<&HeaderName> {
        self.header_name.as_ref()
    }

    pub fn cookie_name(&self) -> Option<&str> {
        self.cookie_name.as_deref()
    }

    pub fn query_name(&self) -> Option<&str> {
        self.query_name.as_deref()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn strict_scheme(&self) -> bool {
        self.strict_scheme
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn complete_token(&self) -> bool {
        self.complete_token
    }
}

fn non_empty(name: String) -> Option<String> {
    (!name.is_empty()).then_some(name)
}
