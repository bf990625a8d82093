//! Signed session tokens.
//!
//! A login issues a pair of HS256 JWTs: a short-lived access token and a
//! longer-lived refresh token, told apart by the `kind` claim so a refresh
//! token can never authorize a request directly. Verification is a pure
//! computation (signature check plus expiry), no store access involved.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is expired, malformed, or badly signed")]
    Invalid,
    #[error("wrong token kind for this operation")]
    WrongKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    kind: TokenKind,
}

/// Issues and verifies the access/refresh token pair.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Build a service from the shared secret and token lifetimes in seconds.
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Issue a fresh access/refresh pair for `username`.
    pub fn issue_pair(&self, username: &str) -> Result<(String, String), jsonwebtoken::errors::Error> {
        let access = self.issue(username, TokenKind::Access, self.access_ttl)?;
        let refresh = self.issue(username, TokenKind::Refresh, self.refresh_ttl)?;
        Ok((access, refresh))
    }

    /// Issue a new access token, used by the refresh endpoint.
    pub fn issue_access(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(username, TokenKind::Access, self.access_ttl)
    }

    /// Verify an access token, returning the subject username.
    pub fn verify_access(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    /// Verify a refresh token, returning the subject username.
    pub fn verify_refresh(&self, token: &str) -> Result<String, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }

    fn issue(
        &self,
        username: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<String, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| TokenError::Invalid)?;
        if data.claims.kind != expected {
            return Err(TokenError::WrongKind);
        }
        Ok(data.claims.sub)
    }
}
