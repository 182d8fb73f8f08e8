use jsonwebtoken::dangerous;
use jsonwebtoken::Header;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::Result;

/// JWT payload as a map of claim name to value
pub type Claims = Map<String, Value>;

const REQUIRED_CLAIMS: [&str; 3] = ["iss", "aud", "sub"];

/// A decoded token whose signature has NOT been checked
///
/// Its contents are attacker-controlled. They are only good for deciding which
/// issuer's key material to fetch.
#[derive(Debug, Clone)]
pub struct UnverifiedToken {
    header: Header,
    claims: Claims,
    issuer: String,
}

impl UnverifiedToken {
    /// Decode a token without signature validation and check that `iss`, `aud`
    /// and `sub` are present
    ///
    /// # Errors
    /// Returns `Error::MissingClaims` if the token cannot be decoded or lacks one of the claims
    pub fn decode(token: &str) -> Result<Self> {
        let token_data = match dangerous::insecure_decode::<Claims>(token) {
            Ok(token_data) => token_data,
            Err(error) => {
                tracing::debug!(error = %error, "token could not be decoded");
                return Err(missing_claims(None));
            }
        };

        let claims = token_data.claims;
        if !REQUIRED_CLAIMS.iter().all(|name| has_claim(&claims, name)) {
            return Err(missing_claims(Some(&claims)));
        }

        let issuer = match claims.get("iss") {
            Some(Value::String(issuer)) => issuer.clone(),
            _ => return Err(missing_claims(Some(&claims))),
        };

        Ok(Self {
            header: token_data.header,
            claims,
            issuer,
        })
    }

    /// The claimed issuer, not yet authenticated
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The full unverified payload
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn key_id(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }
}

/// `null`, `false`, `0` and `""` count as missing
fn has_claim(claims: &Claims, name: &str) -> bool {
    match claims.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(value)) => !value.is_empty(),
        Some(Value::Number(value)) => value.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

fn missing_claims(claims: Option<&Claims>) -> Error {
    let got = claims
        .map(|claims| claims.keys().map(String::as_str).collect::<Vec<_>>().join(","))
        .unwrap_or_else(|| "nothing".to_string());
    Error::MissingClaims(format!(
        "Supplied token requires the \"iss\", \"aud\" and \"sub\" claims. Got {got}"
    ))
}

/// Claims of a token whose signature and constraints have been verified
///
/// Only the verification step can construct this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VerifiedClaims(Verified);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum Verified {
    Payload(Claims),
    Complete(CompleteToken),
}

impl VerifiedClaims {
    pub(crate) fn payload(claims: Claims) -> Self {
        Self(Verified::Payload(claims))
    }

    pub(crate) fn complete(complete: CompleteToken) -> Self {
        Self(Verified::Complete(complete))
    }

    /// The verified payload, whichever form was requested
    pub fn claims(&self) -> &Claims {
        match &self.0 {
            Verified::Payload(claims) => claims,
            Verified::Complete(complete) => &complete.payload,
        }
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims().get(name)
    }

    pub fn iss(&self) -> Option<&str> {
        self.claim("iss").and_then(Value::as_str)
    }

    pub fn sub(&self) -> Option<&str> {
        self.claim("sub").and_then(Value::as_str)
    }

    pub fn aud(&self) -> Option<&Value> {
        self.claim("aud")
    }

    /// Header, payload and signature, when complete tokens are configured
    pub fn envelope(&self) -> Option<&CompleteToken> {
        match &self.0 {
            Verified::Payload(_) => None,
            Verified::Complete(complete) => Some(complete),
        }
    }

    pub fn into_claims(self) -> Claims {
        match self.0 {
            Verified::Payload(claims) => claims,
            Verified::Complete(complete) => complete.payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteToken {
    header: Header,
    payload: Claims,
    signature: String,
}

impl CompleteToken {
    pub(crate) fn new(header: Header, payload: Claims, signature: String) -> Self {
        Self {
            header,
            payload,
            signature,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Claims {
        &self.payload
    }

    /// The base64url encoded signature segment
    pub fn signature(&self) -> &str {
        &self.signature
    }
}
