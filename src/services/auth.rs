use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;
use uuid::Uuid;

const HASH_SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = 32;

/// Errors that can occur while issuing or checking credentials
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Token subject is not a donor id")]
    InvalidSubject,

    #[error("Iteration count must be positive")]
    InvalidIterations,

    #[error("Random number generator failure")]
    Rng,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, donor_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: donor_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the donor id
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

/// Salted PBKDF2-HMAC-SHA256 password hashing
///
/// Encoded as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with base64 parts.
pub struct PasswordHasher {
    iterations: NonZeroU32,
    rng: SystemRandom,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self, AuthError> {
        Ok(Self {
            iterations: NonZeroU32::new(iterations).ok_or(AuthError::InvalidIterations)?,
            rng: SystemRandom::new(),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt).map_err(|_| AuthError::Rng)?;

        let mut credential = [0u8; CREDENTIAL_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut credential,
        );

        Ok(format!(
            "{}${}${}${}",
            HASH_SCHEME,
            self.iterations,
            STANDARD.encode(salt),
            STANDARD.encode(credential)
        ))
    }

    /// Compare a password against a stored hash; malformed hashes never match
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(credential), None) =
            (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        if scheme != HASH_SCHEME {
            return false;
        }

        let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
            return false;
        };
        let (Ok(salt), Ok(credential)) = (STANDARD.decode(salt), STANDARD.decode(credential)) else {
            return false;
        };

        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &salt,
            password.as_bytes(),
            &credential,
        )
        .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new("test-secret", 1);
        let donor_id = Uuid::new_v4();

        let token = tokens.issue(donor_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), donor_id);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = TokenService::new("one", 1).issue(Uuid::new_v4()).unwrap();
        assert!(TokenService::new("two", 1).verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Beyond the default 60s validation leeway
        let tokens = TokenService::new("test-secret", -1);
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = PasswordHasher::new(1_000).unwrap();
        let encoded = hasher.hash("hunter22").unwrap();

        assert!(encoded.starts_with("pbkdf2-sha256$1000$"));
        assert!(hasher.verify("hunter22", &encoded));
        assert!(!hasher.verify("hunter23", &encoded));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(1_000).unwrap();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = PasswordHasher::new(1_000).unwrap();
        assert!(!hasher.verify("x", ""));
        assert!(!hasher.verify("x", "bcrypt$10$abc$def"));
        assert!(!hasher.verify("x", "pbkdf2-sha256$0$AAAA$AAAA"));
        assert!(!hasher.verify("x", "pbkdf2-sha256$1000$***$AAAA"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(PasswordHasher::new(0), Err(AuthError::InvalidIterations)));
    }
}
