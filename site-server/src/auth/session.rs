//! Session token service
//!
//! The browser signs in against the identity provider directly; this
//! server only ever sees the resulting identity token, verifies it once,
//! and hands back a longer-lived session as an httpOnly cookie. The
//! cookie value is an HS256 JWT minted and validated here.

use chrono::{Duration, Utc};
use http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session cookie name
pub const SESSION_COOKIE: &str = "taproom_session";

/// Session configuration
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SESSION_SECRET | generated in development | HS256 secret, at least 32 chars |
/// | SESSION_TTL_DAYS | 5 | Session cookie lifetime |
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Cookie lifetime in days
    pub ttl_days: i64,
    /// Token issuer
    pub issuer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let secret = match load_session_secret() {
            Ok(secret) => secret,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("Session configuration error: {}, using generated key", e);
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: SESSION_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "site-server".to_string()),
        }
    }
}

/// Claims carried by the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id (identity provider uid)
    pub sub: String,
    /// Verified email at sign-in time
    pub email: String,
    /// Token type, always "session"
    pub token_type: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Session token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Load the session secret from the environment.
///
/// Development builds generate a temporary secret when unset; production
/// builds refuse to start without one.
fn load_session_secret() -> Result<String, SessionError> {
    match std::env::var("SESSION_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(SessionError::ConfigError(
                    "SESSION_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "SESSION_SECRET not set! Generating temporary key for development."
                );
                Ok(generate_printable_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(SessionError::ConfigError(
                    "SESSION_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// Generate a printable random secret (development fallback)
fn generate_printable_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "TaproomDevelopmentFallbackSecret2024!ReplaceMe".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// Session token service
#[derive(Debug, Clone)]
pub struct SessionService {
    pub config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Mint a session token for a verified identity
    pub fn mint(&self, uid: &str, email: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let expiration = now + Duration::days(self.config.ttl_days);

        let claims = SessionClaims {
            sub: uid.to_string(),
            email: email.to_string(),
            token_type: "session".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a session token
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => SessionError::ExpiredToken,
                    ErrorKind::InvalidSignature => SessionError::InvalidSignature,
                    _ => SessionError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Build the Set-Cookie header establishing the session
    pub fn cookie(&self, token: &str) -> HeaderValue {
        let max_age = self.config.ttl_days * 24 * 60 * 60;
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE}={token}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={max_age}"
        ))
        .unwrap_or_else(|_| clear_cookie())
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the Set-Cookie header that clears the session
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "taproom_session=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=Lax; Path=/",
    )
}

/// Extract the session token from a request's Cookie header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(SESSION_COOKIE)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> SessionService {
        SessionService::with_config(SessionConfig {
            secret: "unit-test-session-secret-0123456789abcdef".to_string(),
            ttl_days: 5,
            issuer: "site-server".to_string(),
        })
    }

    #[test]
    fn mint_and_validate_round_trip() {
        let service = test_service();
        let token = service
            .mint("uid123", "jane@example.com")
            .expect("Failed to mint session token");

        let claims = service
            .validate(&token)
            .expect("Failed to validate session token");

        assert_eq!(claims.sub, "uid123");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.token_type, "session");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_garbage_token() {
        let service = test_service();
        assert!(service.validate("not-a-jwt").is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let service = test_service();
        let other = SessionService::with_config(SessionConfig {
            secret: "another-session-secret-0123456789abcdef!".to_string(),
            ttl_days: 5,
            issuer: "site-server".to_string(),
        });
        let token = other.mint("uid123", "jane@example.com").unwrap();
        assert!(matches!(
            service.validate(&token),
            Err(SessionError::InvalidSignature)
        ));
    }

    #[test]
    fn cookie_attributes() {
        let service = test_service();
        let token = service.mint("uid123", "jane@example.com").unwrap();
        let cookie = service.cookie(&token);
        let s = cookie.to_str().unwrap();
        assert!(s.starts_with("taproom_session="));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Secure"));
        assert!(s.contains("Path=/"));
        assert!(s.contains("Max-Age=432000"));
    }

    #[test]
    fn extracts_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; taproom_session=abc.def.ghi; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&empty), None);
    }
}
