use serde::{Serialize, Deserialize};

use crate::entities::user::UserResponse;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(token: String, user: UserResponse) -> Self {
        AuthResponse { token, user }
    }
}
