use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::auth::JwtAuth;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, User,
    UserResponse,
};
use crate::repository::UserRepository;

/// Service layer for user identity and credentials
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Register a new user with a hashed password
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self
            .repository
            .username_or_email_exists(&input.username, &input.email)
            .await?
        {
            return Err(UserError::Duplicate);
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.username, input.email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Verify credentials and issue an access + refresh token pair.
    ///
    /// Unknown email and wrong password produce the same error, so the
    /// response does not reveal which accounts exist.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<LoginResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let tokens = self
            .jwt
            .create_token_pair(&user.id.to_string(), &user.email, &user.username)
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            user: user.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Re-issue an access token from a valid refresh token
    #[instrument(skip(self, input))]
    pub async fn refresh_token(&self, input: RefreshRequest) -> UserResult<RefreshResponse> {
        let claims = self
            .jwt
            .verify_refresh_token(&input.refresh_token)
            .map_err(|e| {
                tracing::debug!("Refresh token rejected: {}", e);
                UserError::InvalidRefreshToken
            })?;

        let access_token = self
            .jwt
            .create_access_token(&claims.sub, &claims.email, &claims.name)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(RefreshResponse { access_token })
    }

    /// Get a user by ID (password-free projection)
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// List all users (password-free projections)
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use core_config::jwt::JwtConfig;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
        })
    }

    fn register_input() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Password1!".to_string(),
        }
    }

    fn stored_user(password: &str) -> User {
        // Hash once with the real algorithm so verification paths are honest
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();
        User::new("alice".to_string(), "alice@example.com".to_string(), hash)
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_or_email_exists()
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|user| {
                user.password_hash.starts_with("$argon2") && user.password_hash != "Password1!"
            })
            .returning(|user| Ok(user));

        let service = UserService::new(repo, jwt());
        let response = service.register(register_input()).await.unwrap();
        assert_eq!(response.username, "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_or_email_exists()
            .returning(|_, _| Ok(true));
        // No create expectation: persisting a duplicate would panic the mock

        let service = UserService::new(repo, jwt());
        let result = service.register(register_input()).await;
        assert!(matches!(result, Err(UserError::Duplicate)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("Password1!"))));

        let service = UserService::new(repo, jwt());
        let result = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "WrongPassword1!".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_same_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(None));

        let service = UserService::new(repo, jwt());
        let result = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "Password1!".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_tokens() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("Password1!"))));

        let auth = jwt();
        let service = UserService::new(repo, auth.clone());
        let response = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "Password1!".to_string(),
            })
            .await
            .unwrap();

        let claims = auth.verify_access_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, response.user.id.to_string());
        assert!(auth.verify_refresh_token(&response.refresh_token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_with_tampered_token_is_rejected() {
        let repo = MockUserRepository::new();
        let auth = jwt();
        let service = UserService::new(repo, auth.clone());

        let pair = auth
            .create_token_pair("user-1", "alice@example.com", "alice")
            .unwrap();
        let mut tampered = pair.refresh_token.clone();
        tampered.pop();
        tampered.push('x');

        let result = service
            .refresh_token(RefreshRequest {
                refresh_token: tampered,
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let repo = MockUserRepository::new();
        let auth = jwt();
        let service = UserService::new(repo, auth.clone());

        let pair = auth
            .create_token_pair("user-1", "alice@example.com", "alice")
            .unwrap();

        // An access token must not pass as a refresh token
        let result = service
            .refresh_token(RefreshRequest {
                refresh_token: pair.access_token,
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_refresh_reissues_access_token() {
        let repo = MockUserRepository::new();
        let auth = jwt();
        let service = UserService::new(repo, auth.clone());

        let pair = auth
            .create_token_pair("user-1", "alice@example.com", "alice")
            .unwrap();

        let response = service
            .refresh_token(RefreshRequest {
                refresh_token: pair.refresh_token,
            })
            .await
            .unwrap();

        let claims = auth.verify_access_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = UserService::new(repo, jwt());
        let id = Uuid::new_v4();
        let result = service.get_user(id).await;
        assert!(matches!(result, Err(UserError::NotFound(found)) if found == id));
    }
}
