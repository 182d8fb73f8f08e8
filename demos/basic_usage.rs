use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::{Extension, Router};
use issuer_gate::providers::oidc::{OidcConfig, OidcIssuers};
use issuer_gate::{
    AuthConfig, AuthLayer, IssuerPolicy, IssuerRecord, JwtValidator, StaticIssuers, VerifiedClaims,
    VerifyJwt,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

const ISSUER: &str = "https://issuer.example.com";
const SECRET: &[u8] = b"demo-secret";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,issuer_gate=debug")),
        )
        .init();

    // Example 1: Static issuer with a shared secret
    println!("=== Example 1: Direct Verification ===");
    let issuers = StaticIssuers::new().with_issuer(
        ISSUER,
        IssuerRecord::new(
            DecodingKey::from_secret(SECRET),
            IssuerPolicy::new([Algorithm::HS256])
                .with_audience("my-service")
                .with_clock_tolerance(Duration::from_secs(30)),
        ),
    );
    let validator = JwtValidator::new(AuthConfig::default(), issuers);

    let now = chrono::Utc::now().timestamp();
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &serde_json::json!({
            "iss": ISSUER,
            "aud": "my-service",
            "sub": "user-42",
            "iat": now,
            "exp": now + 600,
        }),
        &EncodingKey::from_secret(SECRET),
    )?;

    match validator.verify(&token).await {
        Ok(claims) => println!("✓ Token verified, subject: {:?}", claims.sub()),
        Err(e) => eprintln!("✗ [{}] {}", e.code(), e),
    }

    match validator.verify("eyJhbGciOiJIUzI1NiJ9.e30.c2ln").await {
        Ok(_) => println!("✗ Unexpectedly accepted"),
        Err(e) => println!("✓ Rejected with [{}] {}", e.code(), e),
    }

    println!();

    // Example 2: Middleware in front of an axum router
    println!("=== Example 2: Middleware ===");
    let app = Router::new()
        .route(
            "/me",
            get(|Extension(claims): Extension<VerifiedClaims>| async move {
                format!("hello {}", claims.sub().unwrap_or("stranger"))
            }),
        )
        .layer(AuthLayer::new(validator));

    let request = Request::get("/me")
        .header("cookie", format!("theme=dark; session={token}"))
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    println!("GET /me with session cookie -> {}", response.status());

    let response = app.oneshot(Request::get("/me").body(Body::empty())?).await?;
    println!("GET /me without token -> {}", response.status());

    println!();

    // Example 3: OpenID Connect discovery with a bounded HTTP client
    println!("=== Example 3: OIDC Issuers ===");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let oidc = OidcIssuers::new(
        OidcConfig::new()
            .with_issuer(
                "https://accounts.example.com",
                IssuerPolicy::new([Algorithm::RS256]).with_audience("my-service"),
            )
            .with_cache_ttl(Duration::from_secs(1800))
            .with_http_client(client),
    );
    let validator = JwtValidator::new(
        AuthConfig::default().with_strict_scheme(true).without_query(),
        oidc,
    );
    println!(
        "OIDC validator ready (header: {:?}, cookie: {:?}, query: {:?})",
        validator.config().header_name(),
        validator.config().cookie_name(),
        validator.config().query_name()
    );

    Ok(())
}
