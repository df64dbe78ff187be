//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use zine_common::{AppError, AppResult, IdGenerator};
use zine_db::{entities::user, repositories::UserRepository};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new user account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if !is_valid_username(&input.username) {
            return Err(AppError::Validation(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }

        // Check if username is taken
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let username_lower = input.username.to_lowercase();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            username_lower: Set(username_lower),
            password_hash: Set(password_hash),
            token: Set(self.id_gen.generate_token()),
            name: Set(input.name),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Regenerate a user's bearer token, invalidating the previous one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut model: user::ActiveModel = user.into();
        model.token = Set(new_token.clone());
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(model).await?;

        Ok(new_token)
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: hash_password("correct horse").unwrap(),
            token: format!("token-{id}"),
            name: None,
            bio: None,
            is_admin: false,
            posts_count: 0,
            followers_count: 0,
            following_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("alice_99"));
        assert!(!is_valid_username("alice smith"));
        assert!(!is_valid_username("alice@host"));
    }

    #[tokio::test]
    async fn test_create_rejects_taken_username() {
        let existing = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .create(CreateUserInput {
                username: "alice".to_string(),
                password: "longenough".to_string(),
                name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .create(CreateUserInput {
                username: "bob".to_string(),
                password: "short".to_string(),
                name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate("alice", "not the password").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unknown() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
