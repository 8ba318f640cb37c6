use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserResponse};
use crate::password;
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with password hashing
    ///
    /// Required fields are checked in order (name, email, password) before anything
    /// is hashed or written.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        validate_create(&input)?;

        let password_hash = password::hash_password(&input.password)?;

        if self.repository.email_exists(&input.email).await? {
            warn!("Email already in use");
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::new(input.name, input.email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Get a user by ID
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> UserResult<UserResponse> {
        Ok(self.load(id).await?.into())
    }

    /// All users in store order
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.get_all().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Update a user
    ///
    /// A present `name` or `email` overwrites the stored value, even when empty. Omitted
    /// fields are kept; a non-empty password is re-hashed.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self.load(id).await?;

        let new_password_hash = match input.password.as_deref() {
            Some(plain) if !plain.is_empty() => Some(password::hash_password(plain)?),
            _ => None,
        };

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let uuid = parse_id(id)?;

        if !self.repository.delete(uuid).await? {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    /// Search users by case-insensitive substring of name OR email
    ///
    /// At least one query must be non-empty. An empty result is `NoResults`.
    #[instrument(skip(self))]
    pub async fn search_users(
        &self,
        name_query: &str,
        email_query: &str,
    ) -> UserResult<Vec<UserResponse>> {
        if name_query.is_empty() && email_query.is_empty() {
            return Err(UserError::Validation(
                "At least one query parameter (name or email) is required".to_string(),
            ));
        }

        let matches: Vec<UserResponse> = self
            .repository
            .get_all()
            .await?
            .into_iter()
            .filter(|u| u.matches(name_query, email_query))
            .map(UserResponse::from)
            .collect();

        if matches.is_empty() {
            return Err(UserError::NoResults);
        }

        tracing::debug!(count = matches.len(), "Search matched users");
        Ok(matches)
    }

    /// Check a plaintext password against the stored hash of a user
    #[instrument(skip(self, password), fields(user_id = %id))]
    pub async fn verify_password(&self, id: &str, password: &str) -> UserResult<bool> {
        let user = self.load(id).await?;
        password::verify_password(password, &user.password_hash)
    }

    async fn load(&self, id: &str) -> UserResult<User> {
        let uuid = parse_id(id)?;

        self.repository
            .get_by_id(uuid)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// A string that is not a UUID cannot name a stored user.
fn parse_id(id: &str) -> UserResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| UserError::NotFound(id.to_string()))
}

fn validate_create(input: &CreateUser) -> UserResult<()> {
    let required = [
        (&input.name, "Name is required"),
        (&input.email, "Email is required"),
        (&input.password, "Password is required"),
    ];

    for (value, message) in required {
        if value.is_empty() {
            warn!(reason = message, "Rejected user input");
            return Err(UserError::Validation(message.to_string()));
        }
    }

    Ok(())
}
