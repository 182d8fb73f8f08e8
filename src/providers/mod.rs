//! Bundled [`IssuerLookup`](crate::IssuerLookup) implementations backed by
//! remote identity providers
//!
//! ## Available Providers
//!
//! - [`oidc`]: issuers publishing their signing keys through OpenID Connect discovery
//!
//! ## Example
//!
//! ```rust,no_run
//! use issuer_gate::providers::oidc::{OidcConfig, OidcIssuers};
//! use issuer_gate::{AuthConfig, IssuerPolicy, JwtValidator, VerifyJwt};
//! use jsonwebtoken::Algorithm;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let issuers = OidcIssuers::new(OidcConfig::new().with_issuer(
//!     "https://accounts.example.com",
//!     IssuerPolicy::new([Algorithm::RS256]).with_audience("my-service"),
//! ));
//! let validator = JwtValidator::new(AuthConfig::default(), issuers);
//!
//! let claims = validator.verify("eyJhbG...").await?;
//! println!("Subject: {:?}", claims.sub());
//! # Ok(())
//! # }
//! ```

pub mod oidc;
