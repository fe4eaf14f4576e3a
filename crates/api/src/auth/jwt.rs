//! JWT access-token generation/validation and refresh-token helpers.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload with a
//! fixed issuer and audience. Refresh tokens are opaque random strings; only
//! their SHA-256 hash is stored server-side so a database leak does not
//! compromise active sessions.

use std::collections::BTreeMap;

use fintrack_core::types::DbId;
use fintrack_db::models::user::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// Unique token identifier (UUID v4).
    pub jti: String,
    pub email: String,
    /// Display name (`first last`).
    pub name: String,
    pub roles: Vec<String>,
    /// The user's security stamp at issue time. A token whose stamp no
    /// longer matches the stored one is rejected.
    pub stamp: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Per-user custom claims.
    #[serde(flatten)]
    pub custom: BTreeMap<String, String>,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in minutes (default: 7 days).
    pub refresh_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in minutes.
const DEFAULT_REFRESH_EXPIRY_MINS: i64 = 7 * 24 * 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default           |
    /// |----------------------------|----------|-------------------|
    /// | `JWT_SECRET`               | **yes**  | --                |
    /// | `JWT_ISSUER`               | no       | `fintrack`        |
    /// | `JWT_AUDIENCE`             | no       | `fintrack-clients`|
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`              |
    /// | `JWT_REFRESH_EXPIRY_MINS`  | no       | `10080`           |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fintrack".into());
        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fintrack-clients".into());

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_mins: i64 = std::env::var("JWT_REFRESH_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            issuer,
            audience,
            access_token_expiry_mins,
            refresh_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for `user`.
pub fn generate_access_token(
    user: &User,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: user.id.clone(),
        jti: Uuid::new_v4().to_string(),
        email: user.email.clone(),
        name: user.full_name(),
        roles: user.roles.clone(),
        stamp: user.security_stamp.clone(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        iat: now,
        exp,
        custom: user.claims.0.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

fn validation(config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_audience(&[config.audience.as_str()]);
    validation
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks signature, expiry, issuer and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation(config),
    )?;
    Ok(token_data.claims)
}

/// Decode an access token that may already have expired.
///
/// The signature, issuer and audience are still enforced; only the expiry is
/// ignored. Used by the refresh flow, which by definition runs after the
/// access token has lapsed.
pub fn decode_expired_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = validation(config);
    validation.validate_exp = false;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Generate a cryptographically random refresh token.
///
/// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext is
/// sent to the client; only the hash should be persisted server-side.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: "fintrack".to_string(),
            audience: "fintrack-clients".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_mins: 60,
        }
    }

    fn test_user() -> User {
        User {
            id: "user-42".into(),
            user_name: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password_hash: String::new(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            roles: vec!["User".into()],
            claims: Json(BTreeMap::from([("tier".to_string(), "gold".to_string())])),
            security_stamp: "stamp-1".into(),
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn expired_token(config: &JwtConfig) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".into(),
            jti: Uuid::new_v4().to_string(),
            email: "old@example.com".into(),
            name: "Old Token".into(),
            roles: vec![],
            stamp: "s".into(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now - 600,
            // Well past the default 60-second leeway.
            exp: now - 300,
            custom: BTreeMap::new(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token(&test_user(), &config).expect("token should encode");

        let claims = validate_token(&token, &config).expect("token should validate");
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.email, "jdoe@example.com");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.roles, vec!["User".to_string()]);
        assert_eq!(claims.stamp, "stamp-1");
        assert_eq!(claims.custom.get("tier").map(String::as_str), Some("gold"));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expired_token_fails_validation_but_decodes_for_refresh() {
        let config = test_config();
        let token = expired_token(&config);

        assert!(validate_token(&token, &config).is_err());
        let claims = decode_expired_token(&token, &config).expect("expiry is ignored");
        assert_eq!(claims.email, "old@example.com");
    }

    #[test]
    fn test_wrong_audience_fails() {
        let config = test_config();
        let token = generate_access_token(&test_user(), &config).unwrap();

        let other = JwtConfig {
            audience: "someone-else".into(),
            ..test_config()
        };
        assert!(validate_token(&token, &other).is_err());
        assert!(decode_expired_token(&token, &other).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = generate_access_token(&test_user(), &test_config()).unwrap();
        let other = JwtConfig {
            secret: "secret-bravo".into(),
            ..test_config()
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_refresh_token_hash_matches() {
        let (plaintext, hash) = generate_refresh_token();
        assert_eq!(hash, hash_refresh_token(&plaintext));
        assert_eq!(hash.len(), 64);
    }
}
