use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub contact_number: Option<String>,
    /// None for Google-created accounts.
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub contact_number: Option<String>,

    #[validate(length(min = 8, message = "Must be at least 8 characters"))]
    pub password: String,
}

impl NewUser {
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            username: self.username.clone(),
            email: self.email.clone(),
            contact_number: self.contact_number.clone(),
            password_hash: Some(password_hash),
            google_id: None,
            picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Login accepts an email address or a username in the `email` field,
/// matching the registration form's combined identifier box.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUser {
    #[validate(length(min = 1, message = "Email/username is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            contact_number: user.contact_number,
            picture: user.picture,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewUserResponse {
    pub message: String,
    pub user_id: Uuid,
}
