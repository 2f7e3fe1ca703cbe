//! Authentication Service
//!
//! Credential verification and JWT access/refresh token management.

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::UserRepository;

/// `typ` claim value carried by access tokens.
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// `typ` claim value carried by refresh tokens.
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify a credential pair and issue an access/refresh token pair
    async fn obtain_tokens(&self, username: &str, password: &str)
        -> Result<AuthTokens, AuthError>;

    /// Issue a fresh access token from a valid refresh token
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken, AuthError>;

    /// Check that a token (of either type) is valid and unexpired
    async fn verify_token(&self, token: &str) -> Result<(), AuthError>;
}

/// Access/refresh token pair issued on login
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// A lone access token issued on refresh
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Token type: "access" or "refresh"
    pub typ: String,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AuthService implementation
///
/// Refresh is stateless: a refresh token is a signed JWT with
/// `typ = "refresh"`; no server-side session store and no rotation.
pub struct AuthServiceImpl<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    jwt_settings: JwtSettings,
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(user_repo: Arc<U>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            jwt_settings,
        }
    }

    /// Verify a password against its Argon2 hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Sign a token of the given type with the given lifetime
    fn encode_token(&self, user_id: i64, typ: &str, lifetime: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            typ: typ.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Decode a token, mapping expiry separately from other failures
    fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository + 'static,
{
    async fn obtain_tokens(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthTokens, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_lifetime = Duration::minutes(self.jwt_settings.access_token_expiry_minutes);
        let refresh_lifetime = Duration::days(self.jwt_settings.refresh_token_expiry_days);

        Ok(AuthTokens {
            access_token: self.encode_token(user.id, TOKEN_TYPE_ACCESS, access_lifetime)?,
            refresh_token: self.encode_token(user.id, TOKEN_TYPE_REFRESH, refresh_lifetime)?,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let claims = self.decode_token(refresh_token)?;

        if claims.typ != TOKEN_TYPE_REFRESH {
            return Err(AuthError::InvalidToken);
        }

        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        let access_lifetime = Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        Ok(AccessToken {
            access_token: self.encode_token(user_id, TOKEN_TYPE_ACCESS, access_lifetime)?,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    async fn verify_token(&self, token: &str) -> Result<(), AuthError> {
        self.decode_token(token).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::InMemoryUserRepository;
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-that-is-long-enough!".into(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn service_with_user(username: &str, password: &str) -> AuthServiceImpl<InMemoryUserRepository> {
        let repo = InMemoryUserRepository::new();
        repo.insert(username, &hash(password));
        AuthServiceImpl::new(Arc::new(repo), jwt_settings())
    }

    #[tokio::test]
    async fn test_obtain_tokens_with_valid_credentials() {
        let service = service_with_user("alice", "correct horse");

        let tokens = service.obtain_tokens("alice", "correct horse").await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 15 * 60);
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let service = service_with_user("alice", "correct horse");

        let result = service.obtain_tokens("alice", "battery staple").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let service = service_with_user("alice", "correct horse");

        let result = service.obtain_tokens("bob", "whatever").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_accepts_refresh_token_only() {
        let service = service_with_user("alice", "pw");
        let tokens = service.obtain_tokens("alice", "pw").await.unwrap();

        let refreshed = service.refresh_access_token(&tokens.refresh_token).await;
        assert!(refreshed.is_ok());

        // An access token must not pass as a refresh token
        let result = service.refresh_access_token(&tokens.access_token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_verify_accepts_both_token_types() {
        let service = service_with_user("alice", "pw");
        let tokens = service.obtain_tokens("alice", "pw").await.unwrap();

        assert!(service.verify_token(&tokens.access_token).await.is_ok());
        assert!(service.verify_token(&tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let service = service_with_user("alice", "pw");

        let result = service.verify_token("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_tokens_carry_type_claims() {
        let service = service_with_user("alice", "pw");
        let tokens = service.obtain_tokens("alice", "pw").await.unwrap();

        let access = service.decode_token(&tokens.access_token).unwrap();
        let refresh = service.decode_token(&tokens.refresh_token).unwrap();

        assert_eq!(access.typ, TOKEN_TYPE_ACCESS);
        assert_eq!(refresh.typ, TOKEN_TYPE_REFRESH);
        assert_eq!(access.sub, refresh.sub);
    }
}
