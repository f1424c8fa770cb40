use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};

use crate::entities::token::Claims;
use crate::entities::user::User;
use crate::errors::AuthError;
use crate::repositories::token::TokenService;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::hours(config.jwt_expiration_hours),
        }
    }
}

impl TokenService for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: (now + self.expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &Validation::new(JWT_ALGORITHM))
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_config() -> AppConfig {
        // deserialize defaults, then fill the secrets directly
        let mut config: AppConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        config.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        config.jwt_expiration_hours = 7;
        config
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            contact_number: None,
            password_hash: Some("hash".to_string()),
            google_id: None,
            picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_claims() {
        let service = JwtService::new(&test_config());
        let user = test_user();

        let token = service.create_jwt(&user).unwrap();
        let decoded = service.decode_jwt(&token).unwrap();

        assert_eq!(decoded.claims.sub, user.id.to_string());
        assert_eq!(decoded.claims.email, user.email);
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn rejects_a_tampered_token() {
        let service = JwtService::new(&test_config());
        let token = service.create_jwt(&test_user()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(service.decode_jwt(&tampered).is_err());
    }
}
