pub mod password;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password};

const RESET_PURPOSE: &str = "password_reset";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    #[default]
    Customer,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Admin, Role::Seller, Role::Customer];
    pub const NAMES: &'static [&'static str] = &["admin", "seller", "customer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The authenticated identity attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self { id: claims.sub, role: claims.role }
    }
}

/// How a request proves who it is; each route picks one
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Email and password checked against the stored hash
    Local { email: String, password: String },
    /// Bearer access token
    Jwt { token: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: i64,
    pub purpose: String,
    /// Fingerprint of the password hash the token was issued against
    pub fp: String,
    pub iat: i64,
    pub exp: i64,
}

impl ResetClaims {
    /// False once the password has changed since the token was issued
    pub fn issued_for(&self, password_hash: &str) -> bool {
        self.fp == password_fingerprint(password_hash)
    }
}

/// Short digest of a stored password hash; ties a reset token to one password
pub fn password_fingerprint(password_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password_hash.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

/// Signs and verifies access and password-reset tokens
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
    access_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_minutes: i64, reset_ttl_minutes: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            access_ttl: Duration::minutes(access_ttl_minutes),
            reset_ttl: Duration::minutes(reset_ttl_minutes),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            security.jwt_expiry_minutes,
            security.reset_token_expiry_minutes,
        )
    }

    pub fn sign(&self, user_id: i64, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        self.encode(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode::<Claims>(token)
    }

    pub fn sign_reset(&self, user_id: i64, password_hash: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = ResetClaims {
            sub: user_id,
            purpose: RESET_PURPOSE.to_string(),
            fp: password_fingerprint(password_hash),
            iat: now.timestamp(),
            exp: (now + self.reset_ttl).timestamp(),
        };
        self.encode(&claims)
    }

    /// Claims of a valid password-reset token; the caller still checks [`ResetClaims::issued_for`]
    pub fn verify_reset(&self, token: &str) -> Result<ResetClaims, AuthError> {
        let claims = self.decode::<ResetClaims>(token)?;
        if claims.purpose != RESET_PURPOSE {
            return Err(AuthError::InvalidToken("token is not a password reset token".to_string()));
        }
        Ok(claims)
    }

    fn encode<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<T>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish_non_exhaustive()
    }
}
