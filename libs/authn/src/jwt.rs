//! JWT encoding and decoding using HS256.
//!
//! Two token kinds share one claims shape: short-lived `access` tokens
//! authenticate API requests, longer-lived `refresh` tokens can only be
//! exchanged for a new access token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthnConfig, AuthnError, CurrentUser};

/// Discriminator carried in the `token_type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user UUID.
    pub sub: String,
    pub username: String,
    pub token_type: TokenKind,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Access + refresh token pair returned by the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

fn issue(
    cfg: &AuthnConfig,
    user_id: Uuid,
    username: &str,
    kind: TokenKind,
    ttl_secs: u64,
) -> Result<String, AuthnError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        token_type: kind,
        iat: now,
        exp: now + ttl_secs as i64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthnError::Encoding(e.to_string()))
}

pub fn issue_access_token(
    cfg: &AuthnConfig,
    user_id: Uuid,
    username: &str,
) -> Result<String, AuthnError> {
    issue(cfg, user_id, username, TokenKind::Access, cfg.access_ttl_secs)
}

pub fn issue_refresh_token(
    cfg: &AuthnConfig,
    user_id: Uuid,
    username: &str,
) -> Result<String, AuthnError> {
    issue(
        cfg,
        user_id,
        username,
        TokenKind::Refresh,
        cfg.refresh_ttl_secs,
    )
}

pub fn issue_token_pair(
    cfg: &AuthnConfig,
    user_id: Uuid,
    username: &str,
) -> Result<TokenPair, AuthnError> {
    Ok(TokenPair {
        access: issue_access_token(cfg, user_id, username)?,
        refresh: issue_refresh_token(cfg, user_id, username)?,
    })
}

/// Decode a token of the expected kind. Signature and expiry are validated.
pub fn decode_token(
    cfg: &AuthnConfig,
    token: &str,
    expected: TokenKind,
) -> Result<Claims, AuthnError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthnError::InvalidToken)?;

    if data.claims.token_type != expected {
        return Err(AuthnError::WrongTokenType {
            expected: match expected {
                TokenKind::Access => "access",
                TokenKind::Refresh => "refresh",
            },
        });
    }
    Ok(data.claims)
}

/// Exchange a valid refresh token for a fresh access token.
pub fn refresh_access_token(cfg: &AuthnConfig, refresh: &str) -> Result<String, AuthnError> {
    let claims = decode_token(cfg, refresh, TokenKind::Refresh)?;
    let user_id: Uuid = claims.sub.parse().map_err(|_| AuthnError::InvalidSubject)?;
    issue_access_token(cfg, user_id, &claims.username)
}

/// Resolve the acting identity from a raw `Authorization` header value.
///
/// Only `Bearer <access token>` is accepted.
pub fn authenticate_bearer(
    cfg: &AuthnConfig,
    authorization: Option<&str>,
) -> Result<CurrentUser, AuthnError> {
    let header = authorization.ok_or(AuthnError::MissingCredentials)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthnError::MissingCredentials)?;

    let claims = decode_token(cfg, token, TokenKind::Access)?;
    let id: Uuid = claims.sub.parse().map_err(|_| AuthnError::InvalidSubject)?;
    Ok(CurrentUser {
        id,
        username: claims.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cfg() -> AuthnConfig {
        AuthnConfig {
            jwt_secret: "test-secret-key-minimum-32-chars!!".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 86400,
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let cfg = test_cfg();
        let user_id = Uuid::new_v4();
        let token = issue_access_token(&cfg, user_id, "alice").expect("encode should succeed");

        let claims = decode_token(&cfg, &token, TokenKind::Access).expect("decode should succeed");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let cfg = test_cfg();
        let refresh = issue_refresh_token(&cfg, Uuid::new_v4(), "bob").unwrap();

        let result = authenticate_bearer(&cfg, Some(&format!("Bearer {refresh}")));
        assert!(result.is_err(), "refresh token must not authenticate");
    }

    #[test]
    fn refresh_flow_issues_new_access_token() {
        let cfg = test_cfg();
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(&cfg, user_id, "carol").unwrap();

        let access = refresh_access_token(&cfg, &pair.refresh).expect("refresh should succeed");
        let user = authenticate_bearer(&cfg, Some(&format!("Bearer {access}"))).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "carol");

        // An access token cannot be used to refresh.
        assert!(refresh_access_token(&cfg, &pair.access).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let cfg = test_cfg();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: "dora".to_string(),
            token_type: TokenKind::Access,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&cfg, &token, TokenKind::Access).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let cfg = test_cfg();
        let token = issue_access_token(&cfg, Uuid::new_v4(), "eve").unwrap();

        let other = AuthnConfig {
            jwt_secret: "another-secret-also-32-chars-long!".to_string(),
            ..test_cfg()
        };
        assert!(decode_token(&other, &token, TokenKind::Access).is_err());
    }

    #[test]
    fn malformed_header_rejected() {
        let cfg = test_cfg();
        assert!(authenticate_bearer(&cfg, None).is_err());
        assert!(authenticate_bearer(&cfg, Some("not-bearer")).is_err());
        assert!(authenticate_bearer(&cfg, Some("Bearer not.a.jwt")).is_err());
    }
}
