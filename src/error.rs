use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Authentication failures surfaced to callers.
///
/// The message of each variant is safe to hand to an untrusted client: the
/// specific reason a signature or claims check failed is only logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No token supplied")]
    NoToken,
    #[error("{0}")]
    MissingClaims(String),
    #[error("Unable to process tokens from \"{0}\"")]
    NoIssuerData(String),
    #[error("Token signature validation failed")]
    InvalidSignature,
    #[error("Unable to look up issuer data for \"{0}\"")]
    IssuerLookupFailed(String),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NoToken => ErrorCode::NoToken,
            Error::MissingClaims(_) => ErrorCode::MissingClaims,
            Error::NoIssuerData(_) => ErrorCode::NoIssuerData,
            Error::InvalidSignature => ErrorCode::InvalidSignature,
            Error::IssuerLookupFailed(_) => ErrorCode::IssuerLookupFailed,
        }
    }
}

/// Stable machine-readable code of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    NoToken,
    MissingClaims,
    NoIssuerData,
    InvalidSignature,
    IssuerLookupFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoToken => "no-token",
            ErrorCode::MissingClaims => "missing-claims",
            ErrorCode::NoIssuerData => "no-issuer-data",
            ErrorCode::InvalidSignature => "invalid-signature",
            ErrorCode::IssuerLookupFailed => "issuer-lookup-failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by an [`IssuerLookup`](crate::IssuerLookup) implementation.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Failed to fetch OpenID config: {0}")]
    OpenIdConfig(reqwest::Error),
    #[error("Failed to fetch JWKS: {0}")]
    Jwks(reqwest::Error),
    #[error("Unusable key in JWKS: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl LookupError {
    /// Wrap any error raised by an application-provided lookup.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LookupError::Other(error.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid header name: {0:?}")]
    InvalidHeaderName(String),
}

pub(crate) fn openid_config_error(error: reqwest::Error) -> LookupError {
    LookupError::OpenIdConfig(error)
}

pub(crate) fn fetch_jwks_error(error: reqwest::Error) -> LookupError {
    LookupError::Jwks(error)
}
