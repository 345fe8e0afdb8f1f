//! FILENAME: client/src/session.rs
//! PURPOSE: Bearer-token session with claims decoded from the token itself.
//! CONTEXT: The token is an opaque credential as far as the server is
//! concerned; the client only peeks at the JWT payload for display (who is
//! logged in) and for a cheap local expiry check. No signature verification
//! happens here, the server remains the authority.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;

/// Claims the client cares about. Unknown claims are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Expiry as unix seconds; zero when the token carries none.
    #[serde(default)]
    pub exp: i64,
}

/// An authenticated session. Constructed from a raw bearer token; a token
/// whose payload cannot be decoded still yields a usable session, just
/// without user claims.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: Option<AuthUser>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let user = decode_jwt_payload(&token);
        if user.is_none() {
            log::debug!("session token payload did not decode; claims unavailable");
        }
        Session { token, user }
    }

    /// Local expiry check against the `exp` claim. A token without claims
    /// or without an expiry is treated as live; the server still gets the
    /// final say on every request.
    pub fn is_expired(&self) -> bool {
        match &self.user {
            Some(user) if user.exp > 0 => Utc::now().timestamp() >= user.exp,
            _ => false,
        }
    }
}

/// Decodes the middle (payload) segment of a JWT without verifying the
/// signature. Returns None on any structural problem.
fn decode_jwt_payload(token: &str) -> Option<AuthUser> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_decodes_claims_from_token() {
        let token = token_with_payload(json!({
            "id": 7,
            "email": "admin@example.com",
            "role": "admin",
            "exp": Utc::now().timestamp() + 3600
        }));
        let session = Session::new(token);
        assert!(!session.is_expired());
        let user = session.user.expect("claims should decode");
        assert_eq!(user.id, 7);
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn test_expired_token_is_flagged() {
        let token = token_with_payload(json!({"id": 1, "exp": 1000}));
        let session = Session::new(token);
        assert!(session.is_expired());
    }

    #[test]
    fn test_malformed_token_still_yields_session() {
        let session = Session::new("not-a-jwt");
        assert!(session.user.is_none());
        assert!(!session.is_expired());
        assert_eq!(session.token, "not-a-jwt");
    }
}
