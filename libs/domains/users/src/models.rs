use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// User entity as persisted in the store
///
/// Stored as JSON under its hyphenated id. The hash is written under the
/// `password` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned on creation and never changed
    pub id: Uuid,
    /// User display name
    pub name: String,
    /// User email (unique, compared case-sensitively)
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// User response DTO (without password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// DTO for creating a new user
///
/// Missing fields decode as empty strings so the service can report which one is
/// required.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateUser {
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 128))]
    pub password: String,
}

/// DTO for updating an existing user
///
/// Omitted fields keep their stored value; a present `name` or `email` replaces it,
/// even when empty.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

/// Query parameters for searching users
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the user name
    pub name: Option<String>,
    /// Case-insensitive substring of the user email
    pub email: Option<String>,
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl User {
    /// Create a new user (password must already be hashed by the service layer)
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
        }
    }

    /// Apply updates (password should already be hashed if provided)
    pub fn apply_update(&mut self, update: UpdateUser, new_password_hash: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
    }

    /// True when either non-empty query is a case-insensitive substring of the
    /// matching field.
    pub fn matches(&self, name_query: &str, email_query: &str) -> bool {
        let contains = |field: &str, query: &str| {
            !query.is_empty() && field.to_lowercase().contains(&query.to_lowercase())
        };

        contains(&self.name, name_query) || contains(&self.email, email_query)
    }
}
