//! Registration, email verification, and login.
//!
//! Registration is two-phase: the account and a 6-digit code are staged in
//! the cache with short TTLs, and the user row is only written once the code
//! is presented back. Unverified registrations expire on their own.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::email_job::EmailJob;
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{pending_user_key, verification_code_key, CacheService};
use crate::utils::jwt::JwtManager;
use crate::utils::token_generator::TokenGenerator;

/// TTL for the staged registration payload, in seconds.
const PENDING_USER_TTL: u64 = 600;

/// TTL for the verification code, in seconds.
const VERIFICATION_CODE_TTL: u64 = 120;

/// Input for starting a registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// A verified or logged-in session: the user plus a fresh access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub access_token: String,
}

/// Service for account registration and authentication.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheService>,
    jwt: Arc<JwtManager>,
    tokens: Arc<TokenGenerator>,
    email_queue: mpsc::Sender<EmailJob>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheService>,
        jwt: Arc<JwtManager>,
        tokens: Arc<TokenGenerator>,
        email_queue: mpsc::Sender<EmailJob>,
    ) -> Self {
        Self {
            users,
            cache,
            jwt,
            tokens,
            email_queue,
        }
    }

    /// Stages a registration and queues the verification email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email already belongs to a
    /// verified account, [`AppError::Validation`] when the password is too
    /// weak.
    pub async fn register(&self, input: RegisterInput) -> Result<(), AppError> {
        validate_password(&input.password)?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let hashed = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

        let pending = NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email.clone(),
            password: hashed,
        };
        let payload = serde_json::to_string(&pending)
            .map_err(|e| AppError::internal(format!("Failed to serialize pending user: {e}")))?;

        // The cache is authoritative for the staged state, so failures here
        // must surface instead of failing open.
        self.cache
            .set(&pending_user_key(&input.email), &payload, PENDING_USER_TTL)
            .await
            .map_err(|e| AppError::internal(format!("Failed to stage registration: {e}")))?;

        let code = self.tokens.generate_verification_code();
        self.cache
            .set(
                &verification_code_key(&input.email),
                &code,
                VERIFICATION_CODE_TTL,
            )
            .await
            .map_err(|e| AppError::internal(format!("Failed to store verification code: {e}")))?;

        if let Err(e) = self
            .email_queue
            .try_send(EmailJob::verification(&input.email, &code))
        {
            warn!(email = %input.email, error = %e, "failed to queue verification email");
        }

        Ok(())
    }

    /// Completes a registration: checks the code, persists the user, and
    /// issues an access token.
    pub async fn verify(&self, email: &str, code: &str) -> Result<AuthenticatedSession, AppError> {
        let stored_code = self
            .cache
            .get(&verification_code_key(email))
            .await
            .map_err(|e| AppError::internal(format!("Failed to read verification code: {e}")))?;

        if stored_code.as_deref() != Some(code) {
            return Err(AppError::bad_request("Invalid or expired verification code"));
        }

        let payload = self
            .cache
            .get(&pending_user_key(email))
            .await
            .map_err(|e| AppError::internal(format!("Failed to read pending registration: {e}")))?
            .ok_or_else(|| AppError::bad_request("No pending registration for this email"))?;

        let pending: NewUser = serde_json::from_str(&payload)
            .map_err(|e| AppError::internal(format!("Corrupt pending registration: {e}")))?;

        let user = match self.users.create(pending).await {
            Err(AppError::Conflict { .. }) => {
                return Err(AppError::conflict("Email is already registered"))
            }
            other => other?,
        };

        if let Err(e) = self.cache.delete(&verification_code_key(email)).await {
            warn!(email, error = %e, "failed to clear verification code");
        }
        if let Err(e) = self.cache.delete(&pending_user_key(email)).await {
            warn!(email, error = %e, "failed to clear pending registration");
        }

        let access_token = self.jwt.issue(user.id, &user.email)?;
        Ok(AuthenticatedSession { user, access_token })
    }

    /// Authenticates with email and password.
    ///
    /// Unknown email and wrong password return the same message, so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedSession, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        let matches = bcrypt::verify(password, &user.password)
            .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))?;
        if !matches {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let access_token = self.jwt.issue(user.id, &user.email)?;
        Ok(AuthenticatedSession { user, access_token })
    }
}

/// Password policy: at least 6 characters with one lowercase letter and one
/// digit.
fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::bad_request(
            "Password must contain a lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::bad_request("Password must contain a digit"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::cache::MockCacheService;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn service(
        users: MockUserRepository,
        cache: MockCacheService,
    ) -> (AuthService, mpsc::Receiver<EmailJob>) {
        let (tx, rx) = mpsc::channel(16);
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(cache),
            Arc::new(JwtManager::new("test-secret", 3600)),
            Arc::new(TokenGenerator::from_seed(1)),
            tx,
        );
        (service, rx)
    }

    fn stored_user(email: &str, password_hash: &str) -> User {
        User {
            id: 42,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("abc1").is_err());
        assert!(validate_password("NOLOWER1").is_err());
        assert!(validate_password("nodigits").is_err());
    }

    #[tokio::test]
    async fn test_register_stages_user_and_queues_email() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("ada@example.com"))
            .returning(|_| Ok(None));

        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .withf(|key, _, ttl| key == "register:user:ada@example.com" && *ttl == 600)
            .times(1)
            .returning(|_, _, _| Ok(()));
        cache
            .expect_set()
            .withf(|key, code, ttl| {
                key == "register:code:ada@example.com" && code.len() == 6 && *ttl == 120
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (service, mut rx) = service(users, cache);
        service.register(register_input()).await.unwrap();

        let job = rx.try_recv().unwrap();
        assert_eq!(job.to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_register_fails_loudly_when_staging_cannot_be_persisted() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let mut cache = MockCacheService::new();
        cache.expect_set().returning(|_, _, _| {
            Err(crate::infrastructure::cache::CacheError::OperationError(
                "backend unavailable".to_string(),
            ))
        });

        let (service, mut rx) = service(users, cache);
        let result = service.register(register_input()).await;

        // 5xx, not a silent 201 with an unverifiable code.
        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_register_existing_email_is_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "hash"))));

        let (service, _rx) = service(users, MockCacheService::new());
        let result = service.register(register_input()).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_verify_wrong_code_is_rejected() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .with(eq("register:code:ada@example.com"))
            .returning(|_| Ok(Some("111111".to_string())));

        let (service, _rx) = service(MockUserRepository::new(), cache);
        let result = service.verify("ada@example.com", "222222").await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_verify_creates_user_and_issues_token() {
        let pending = NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "hash".to_string(),
        };
        let payload = serde_json::to_string(&pending).unwrap();

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .with(eq("register:code:ada@example.com"))
            .returning(|_| Ok(Some("123456".to_string())));
        cache
            .expect_get()
            .with(eq("register:user:ada@example.com"))
            .returning(move |_| Ok(Some(payload.clone())));
        cache.expect_delete().times(2).returning(|_| Ok(()));

        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .times(1)
            .returning(|new_user| Ok(stored_user(&new_user.email, &new_user.password)));

        let (service, _rx) = service(users, cache);
        let session = service.verify("ada@example.com", "123456").await.unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let hash = bcrypt::hash("secret1", 4).unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |email| Ok(Some(stored_user(email, &hash))));

        let (service, _rx) = service(users, MockCacheService::new());
        let session = service.login("ada@example.com", "secret1").await.unwrap();
        assert_eq!(session.user.id, 42);
        assert!(!session.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let hash = bcrypt::hash("secret1", 4).unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |email| Ok(Some(stored_user(email, &hash))));

        let (service, _rx) = service(users, MockCacheService::new());
        let result = service.login("ada@example.com", "wrong99").await;
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let (service, _rx) = service(users, MockCacheService::new());
        let result = service.login("ghost@example.com", "secret1").await;
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }
}
