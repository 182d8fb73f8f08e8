//! # issuer-gate
//!
//! Bearer JWT authentication for HTTP services that accept tokens from more
//! than one issuer.
//!
//! Every request goes through the same pipeline:
//!
//! 1. The raw token is taken from the `authorization` header, the `session`
//!    cookie or the `token` query parameter, in that order. Each source can be
//!    renamed or disabled in [`AuthConfig`].
//! 2. The token is decoded *without* verification to read its `iss`, `aud` and
//!    `sub` claims.
//! 3. An application-provided [`IssuerLookup`] returns the key and policy of
//!    the claimed issuer.
//! 4. The token is fully verified against that key. Only then are its claims
//!    handed out as [`VerifiedClaims`].
//!
//! Failures are reported as an [`Error`] whose [`code`](Error::code) callers
//! can match on: `no-token`, `missing-claims`, `no-issuer-data`,
//! `invalid-signature` and `issuer-lookup-failed`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{routing::get, Extension, Router};
//! use issuer_gate::{
//!     AuthConfig, AuthLayer, IssuerPolicy, IssuerRecord, JwtValidator, StaticIssuers,
//!     VerifiedClaims,
//! };
//! use jsonwebtoken::{Algorithm, DecodingKey};
//!
//! let issuers = StaticIssuers::new().with_issuer(
//!     "https://issuer.example.com",
//!     IssuerRecord::new(
//!         DecodingKey::from_secret(b"shared-secret"),
//!         IssuerPolicy::new([Algorithm::HS256]).with_audience("my-service"),
//!     ),
//! );
//! let validator = JwtValidator::new(AuthConfig::default().with_strict_scheme(true), issuers);
//!
//! let app: Router = Router::new()
//!     .route(
//!         "/me",
//!         get(|Extension(claims): Extension<VerifiedClaims>| async move {
//!             claims.sub().unwrap_or_default().to_string()
//!         }),
//!     )
//!     .layer(AuthLayer::new(validator));
//! # let _ = app;
//! ```

mod claims;
mod config;
mod error;
mod extractor;
mod issuer;
mod jwks_cache;
mod middleware;
pub mod providers;
mod verifier;

// Re-exports for public API
pub use claims::Claims;
pub use claims::CompleteToken;
pub use claims::UnverifiedToken;
pub use claims::VerifiedClaims;
pub use config::AuthConfig;
pub use error::ConfigError;
pub use error::Error;
pub use error::ErrorCode;
pub use error::LookupError;
pub use error::Result;
pub use extractor::extract_token;
pub use issuer::lookup_fn;
pub use issuer::FnLookup;
pub use issuer::IssuerLookup;
pub use issuer::IssuerPolicy;
pub use issuer::IssuerRecord;
pub use issuer::StaticIssuers;
pub use middleware::AuthLayer;
pub use middleware::AuthService;
pub use verifier::JwtValidator;
pub use verifier::VerifyJwt;
