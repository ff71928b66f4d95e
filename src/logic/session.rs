//! Session Service
//!
//! Login, logout and session checks for the analyst. One analyst account
//! from configuration, HS256 session tokens, and a revocation list holding
//! SHA-256 digests of logged-out tokens until those tokens would have expired.

use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::SessionClaims;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("session token expired")]
    TokenExpired,
    #[error("session token invalid")]
    TokenInvalid,
    #[error("session has been closed")]
    Revoked,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Issued on successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionService {
    username: String,
    password_hash: String,
    jwt_secret: String,
    expiration_hours: u64,
    /// token digest -> `exp` of the revoked token
    revoked: Mutex<HashMap<String, usize>>,
}

impl SessionService {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        jwt_secret: impl Into<String>,
        expiration_hours: u64,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            jwt_secret: jwt_secret.into(),
            expiration_hours,
            revoked: Mutex::new(HashMap::new()),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username != self.username {
            tracing::warn!(username, "Login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        }

        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiration_hours as i64);
        let claims = SessionClaims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|_| AuthError::TokenInvalid)?;

        tracing::info!(user = username, "Analyst logged in");
        Ok(Session {
            token,
            user: username.to_string(),
            expires_at,
        })
    }

    /// Decode a live session token
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        if self.revoked.lock().contains_key(&digest(token)) {
            return Err(AuthError::Revoked);
        }

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })
    }

    pub fn is_authenticated(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Close the session behind `token`. Returns the user it belonged to.
    pub fn logout(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.verify(token)?;

        let now = Utc::now().timestamp() as usize;
        let mut revoked = self.revoked.lock();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(digest(token), claims.exp);
        drop(revoked);

        tracing::info!(user = %claims.sub, "Analyst logged out");
        Ok(claims.sub)
    }
}

/// Argon2 PHC string for a plaintext password
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
