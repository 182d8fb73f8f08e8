//! Tower middleware running the authentication pipeline per request
//!
//! On success the [`VerifiedClaims`](crate::VerifiedClaims) are inserted into
//! the request extensions, where handlers pick them up with
//! `Extension<VerifiedClaims>`. On failure the inner service is not called and
//! the [`Error`] is turned into a response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use axum::http::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tower::Layer;
use tower::Service;

use crate::error::Error;
use crate::error::ErrorCode;
use crate::issuer::IssuerLookup;
use crate::verifier::JwtValidator;
use crate::verifier::VerifyJwt;

/// Layer authenticating every request with a shared [`JwtValidator`]
pub struct AuthLayer<L> {
    validator: Arc<JwtValidator<L>>,
}

impl<L> AuthLayer<L> {
    pub fn new(validator: JwtValidator<L>) -> Self {
        Self::from_shared(Arc::new(validator))
    }

    pub fn from_shared(validator: Arc<JwtValidator<L>>) -> Self {
        Self { validator }
    }
}

impl<L> Clone for AuthLayer<L> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S, L> Layer<S> for AuthLayer<L> {
    type Service = AuthService<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            validator: Arc::clone(&self.validator),
        }
    }
}

pub struct AuthService<S, L> {
    inner: S,
    validator: Arc<JwtValidator<L>>,
}

impl<S: Clone, L> Clone for AuthService<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S, L, ReqBody> Service<Request<ReqBody>> for AuthService<S, L>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    L: IssuerLookup + 'static,
    ReqBody: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Take the service that was driven to readiness and leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let validator = Arc::clone(&self.validator);
        let token = validator.extract(req.headers(), req.uri());

        Box::pin(async move {
            let Some(token) = token else {
                tracing::debug!(uri = %req.uri(), "no token supplied");
                return Ok(Error::NoToken.into_response());
            };

            match validator.verify(&token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    inner.call(req).await
                }
                Err(error) => Ok(error.into_response()),
            }
        })
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::IssuerLookupFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::NoToken
            | Error::MissingClaims(_)
            | Error::NoIssuerData(_)
            | Error::InvalidSignature => StatusCode::UNAUTHORIZED,
        };
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
