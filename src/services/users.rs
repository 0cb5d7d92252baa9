//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        audit::AuditAction,
        user::{RegisterUser, Role, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password, returning a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create the initial admin account if no user with the configured
    /// username exists yet. Called once at startup so a fresh database has
    /// an account that can manage roles.
    pub async fn ensure_initial_admin(&self) -> AppResult<()> {
        let username = self.config.admin_username.clone();
        if self.repository.users.get_by_username(&username).await?.is_some() {
            return Ok(());
        }

        let hash = self.hash_password(&self.config.admin_password)?;
        match self.repository.users.create(&username, &hash, Role::Admin).await {
            Ok(user) => {
                tracing::warn!(
                    username = %user.username,
                    "Created initial admin account with configured credentials; change the password"
                );
                Ok(())
            }
            // Another instance created it between the check and the insert.
            Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Register a new student account
    pub async fn register_student(&self, request: &RegisterUser) -> AppResult<User> {
        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(&request.username, &hash, Role::Student)
            .await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users (admin)
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Change a user's role (admin)
    pub async fn update_role(&self, actor_id: i32, user_id: i32, role: Role) -> AppResult<User> {
        let user = self.repository.users.update_role(user_id, role).await?;

        if let Err(e) = self
            .repository
            .audit
            .record(
                actor_id,
                AuditAction::RoleChanged,
                &user_id.to_string(),
                Some(role.as_str()),
            )
            .await
        {
            tracing::error!("Failed to write audit entry for user {}: {}", user_id, e);
        }

        Ok(user)
    }

    /// List audit log entries (admin)
    pub async fn list_audit(
        &self,
        query: &crate::models::audit::AuditQuery,
    ) -> AppResult<Vec<crate::models::audit::AuditEntry>> {
        self.repository.audit.list(query).await
    }

    /// Create a JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
