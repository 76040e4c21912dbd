//! Authentication service - JWT pair issuance and account registration.
//!
//! Mirrors the token contract the frontend expects: login returns an
//! `{access, refresh}` pair, the refresh endpoint exchanges a refresh
//! token for a new access token (refresh rotation is disabled), and both
//! tokens are HS256-signed with the process secret key.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{EmailMessage, Mailer, Persistence};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// "access" or "refresh"
    pub token_type: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
    /// Unique token identifier
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,
    /// Long-lived refresh token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
}

/// Response of the refresh endpoint (rotation disabled: no new refresh)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshedToken {
    /// Newly issued access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,
}

/// Registration data collected by the handler
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Authenticate by username and issue a token pair
    async fn login(&self, username: String, password: String) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: String) -> AppResult<RefreshedToken>;

    /// Verify an access token and extract its claims
    fn verify_access(&self, token: &str) -> AppResult<Claims>;
}

fn sign(claims: &Claims, config: &Config) -> AppResult<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret_key_bytes()),
    )?;
    Ok(token)
}

fn build_claims(user: &User, token_type: &str, lifetime: Duration) -> Claims {
    let now = Utc::now();
    Claims {
        token_type: token_type.to_string(),
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        jti: Uuid::new_v4(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    }
}

/// Issue an access+refresh pair for a user
fn generate_pair(user: &User, config: &Config) -> AppResult<TokenPair> {
    let access = sign(
        &build_claims(user, TOKEN_TYPE_ACCESS, Duration::hours(config.access_token_hours)),
        config,
    )?;
    let refresh = sign(
        &build_claims(user, TOKEN_TYPE_REFRESH, Duration::days(config.refresh_token_days)),
        config,
    )?;
    Ok(TokenPair { access, refresh })
}

/// Verify signature and expiry, returning claims of either token type
fn decode_claims(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator<P: Persistence> {
    persistence: Arc<P>,
    config: Config,
    mailer: Mailer,
}

impl<P: Persistence> Authenticator<P> {
    /// Create new auth service instance
    pub fn new(persistence: Arc<P>, config: Config, mailer: Mailer) -> Self {
        Self {
            persistence,
            config,
            mailer,
        }
    }
}

#[async_trait]
impl<P: Persistence> AuthService for Authenticator<P> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        // Input format is validated by the handler's ValidatedJson extractor
        let users = self.persistence.users();

        if users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username"));
        }
        if users.find_by_email(&registration.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = users
            .create(
                registration.username,
                registration.email,
                password_hash,
                registration.full_name,
            )
            .await?;

        self.mailer.send(EmailMessage::new(
            user.email.clone(),
            "Welcome to the Student Portal",
            format!(
                "Hi {}, your account {} is ready.",
                user.full_name, user.username
            ),
        ));

        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenPair> {
        let user_result = self.persistence.users().find_by_username(&username).await?;

        // Verify against a dummy hash when the user is unknown so response
        // timing cannot be used to enumerate valid usernames.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let user = match user_result {
            Some(user) => {
                let password_valid =
                    Password::from_hash(user.password_hash.clone()).verify(&password);
                (password_valid && user.is_active).then_some(user)
            }
            None => {
                let _ = Password::from_hash(dummy_hash.to_string()).verify(&password);
                None
            }
        };

        let user = user.ok_or(AppError::InvalidCredentials)?;
        generate_pair(&user, &self.config)
    }

    async fn refresh(&self, refresh_token: String) -> AppResult<RefreshedToken> {
        let claims = decode_claims(&refresh_token, &self.config)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Unauthorized);
        }

        // The account must still exist and be active
        let user = self
            .persistence
            .users()
            .find_by_id(claims.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::Unauthorized)?;

        let access = sign(
            &build_claims(
                &user,
                TOKEN_TYPE_ACCESS,
                Duration::hours(self.config.access_token_hours),
            ),
            &self.config,
        )?;

        Ok(RefreshedToken { access })
    }

    fn verify_access(&self, token: &str) -> AppResult<Claims> {
        let claims = decode_claims(token, &self.config)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{
        MockReportRepository, MockStudentRepository, MockUserRepository, ReportRepository,
        StudentRepository, UserRepository,
    };

    /// Repositories that panic when touched; token-type checks must
    /// reject before any lookup happens.
    struct StubPersistence;

    impl Persistence for StubPersistence {
        fn users(&self) -> Arc<dyn UserRepository> {
            Arc::new(MockUserRepository::new())
        }

        fn students(&self) -> Arc<dyn StudentRepository> {
            Arc::new(MockStudentRepository::new())
        }

        fn reports(&self) -> Arc<dyn ReportRepository> {
            Arc::new(MockReportRepository::new())
        }
    }

    fn authenticator() -> Authenticator<StubPersistence> {
        let config = Config::for_tests();
        let mailer = Mailer::from_config(&config);
        Authenticator::new(Arc::new(StubPersistence), config, mailer)
    }

    fn test_user() -> User {
        let mut user = User::new(
            Uuid::new_v4(),
            "jdoe".into(),
            "jdoe@example.edu".into(),
            "hash".into(),
            "John Doe".into(),
        );
        user.role = UserRole::Student;
        user
    }

    #[test]
    fn pair_contains_both_token_types() {
        let config = Config::for_tests();
        let user = test_user();

        let pair = generate_pair(&user, &config).unwrap();

        let access = decode_claims(&pair.access, &config).unwrap();
        let refresh = decode_claims(&pair.refresh, &config).unwrap();
        assert_eq!(access.token_type, TOKEN_TYPE_ACCESS);
        assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
        assert_eq!(access.user_id, user.id);
        assert_eq!(access.username, "jdoe");
    }

    #[test]
    fn refresh_outlives_access() {
        let config = Config::for_tests();
        let user = test_user();

        let pair = generate_pair(&user, &config).unwrap();
        let access = decode_claims(&pair.access, &config).unwrap();
        let refresh = decode_claims(&pair.refresh, &config).unwrap();

        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let config = Config::for_tests();
        let user = test_user();

        let pair = generate_pair(&user, &config).unwrap();
        let mut tampered = pair.access.clone();
        tampered.push('x');

        assert!(decode_claims(&tampered, &config).is_err());
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let auth = authenticator();
        let pair = generate_pair(&test_user(), &auth.config).unwrap();

        let result = auth.refresh(pair.access).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_access_rejects_refresh_tokens() {
        let auth = authenticator();
        let pair = generate_pair(&test_user(), &auth.config).unwrap();

        assert!(matches!(
            auth.verify_access(&pair.refresh),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn jti_is_unique_per_token() {
        let user = test_user();
        let a = build_claims(&user, TOKEN_TYPE_ACCESS, Duration::hours(1));
        let b = build_claims(&user, TOKEN_TYPE_ACCESS, Duration::hours(1));
        assert_ne!(a.jti, b.jti);
    }
}
