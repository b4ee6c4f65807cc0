//! Session token inspection
//!
//! The dashboard backend issues JWT access tokens and keeps the signing
//! secret to itself. The client only ever looks inside a token to decide
//! whether it is worth sending:
//! - Structure: exactly three dot-separated segments
//! - Expiry: the `exp` claim, compared against the local clock
//!
//! Nothing here verifies a signature. The profile fetch is the authority on
//! whether a token is actually good.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is not a three-segment JWT")]
    Malformed,

    #[error("Token payload is not base64url: {0}")]
    EncodingError(#[from] base64::DecodeError),

    #[error("Token payload is not JSON: {0}")]
    PayloadError(#[from] serde_json::Error),

    #[error("Token is missing claim: {0}")]
    MissingClaim(&'static str),
}

/// Claims read from the payload segment of an access token
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClaims {
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Linked LinkedIn member id
    pub linkedin_id: Option<String>,
    /// Internal user id
    pub user_id: Option<String>,
}

/// True iff the token has exactly three dot-separated segments.
pub fn is_structurally_valid(token: &str) -> bool {
    token.split('.').count() == 3
}

/// Check whether a token has expired, using the current time.
///
/// Tokens that are not JWT-shaped are reported as not expired; the server
/// rejects them on first use. A JWT-shaped token whose claims cannot be
/// decoded is reported as expired.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Same as [`is_expired`] against a caller-supplied clock.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    if !is_structurally_valid(token) {
        return false;
    }

    match decode_claims(token) {
        Ok(claims) => now.timestamp() >= claims.exp,
        Err(e) => {
            tracing::debug!(error = %e, "Treating undecodable token as expired");
            true
        }
    }
}

/// Decode the claims segment without verifying the signature.
///
/// Only the middle segment is read. The header is never parsed, so tokens
/// signed with an algorithm this client does not know (or `none`) still
/// yield their claims.
pub fn decode_claims(token: &str) -> Result<SessionClaims, TokenError> {
    if !is_structurally_valid(token) {
        return Err(TokenError::Malformed);
    }
    let payload = token.split('.').nth(1).ok_or(TokenError::Malformed)?;

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let payload: JsonValue = serde_json::from_slice(&bytes)?;

    let exp = payload
        .get("exp")
        .and_then(claim_as_timestamp)
        .ok_or(TokenError::MissingClaim("exp"))?;

    Ok(SessionClaims {
        exp,
        linkedin_id: payload.get("linkedinId").and_then(claim_as_string),
        user_id: payload.get("userId").and_then(claim_as_string),
    })
}

fn claim_as_timestamp(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.floor() as i64))
}

// Ids show up as strings or numbers depending on the backend revision
fn claim_as_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
