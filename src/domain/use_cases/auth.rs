use validator::Validate;

use crate::auth::google::GoogleVerifier;
use crate::domain::password::validate_password_strength;
use crate::entities::token::AuthResponse;
use crate::entities::user::{GoogleAuthRequest, LoginUser, NewUser, NewUserResponse, User, UserInsert};
use crate::errors::{AppError, AuthError, FieldError};
use crate::infrastructure::auth::password::verify_password;
use crate::infrastructure::auth::password::hash_password;
use crate::repositories::token::TokenService;
use crate::repositories::user::UserRepository;

pub struct AuthHandler<R, T, G>
where
    R: UserRepository,
    T: TokenService,
    G: GoogleVerifier,
{
    pub user_repo: R,
    pub token_service: T,
    pub google_verifier: G,
}

impl<R, T, G> AuthHandler<R, T, G>
where
    R: UserRepository,
    T: TokenService,
    G: GoogleVerifier,
{
    pub fn new(user_repo: R, token_service: T, google_verifier: G) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            google_verifier,
        }
    }

    /// Registers a new user after validation and password hashing.
    pub async fn register(&self, request: NewUser) -> Result<NewUserResponse, AppError> {
        request.validate()?;
        validate_password_strength(&request.password).map_err(|e| {
            AppError::ValidationError(vec![FieldError {
                field: "password".to_string(),
                message: e
                    .message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Password is too weak".to_string()),
            }])
        })?;

        if self
            .user_repo
            .find_by_email_or_username(&request.email)
            .await?
            .is_some()
            || self
                .user_repo
                .find_by_email_or_username(&request.username)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);
        let user_id = self.user_repo.create_user(&user_insert).await?;

        Ok(NewUserResponse {
            message: "User registered successfully".to_string(),
            user_id,
        })
    }

    /// Logs in via email or username plus password, returning a JWT.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let user = self
            .user_repo
            .find_by_email_or_username(&request.email)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        // Google-created accounts carry no password and cannot log in here
        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid =
            verify_password(&request.password, password_hash).map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!("User logged in successfully");
        Ok(response)
    }

    /// Exchanges a verified Google ID token for an application JWT,
    /// creating a passwordless account on first sight.
    pub async fn google_auth(&self, request: GoogleAuthRequest) -> Result<AuthResponse, AuthError> {
        if request.token.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let profile = self.google_verifier.verify(&request.token).await?;

        let user = match self
            .user_repo
            .find_by_email_or_username(&profile.email)
            .await?
        {
            Some(user) => user,
            None => {
                let insert = UserInsert {
                    username: profile.name.clone(),
                    email: profile.email.clone(),
                    contact_number: None,
                    password_hash: None,
                    google_id: Some(profile.subject.clone()),
                    picture: profile.picture.clone(),
                    created_at: chrono::Utc::now(),
                    updated_at: chrono::Utc::now(),
                };
                let id = self.user_repo.create_user(&insert).await?;
                self.user_repo
                    .find_by_id(&id)
                    .await?
                    .ok_or(AuthError::AuthenticationFailed)?
            }
        };

        self.create_auth_response(&user)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(user).map_err(|e| {
            tracing::warn!("Failed to create JWT: {}", e);
            AuthError::TokenCreation
        })?;

        Ok(AuthResponse::new(token, user.clone().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::google::{GoogleProfile, MockGoogleVerifier};
    use crate::infrastructure::auth::jwt::JwtService;
    use crate::repositories::user::MockUserRepository;
    use crate::settings::AppConfig;
    use chrono::Utc;
    use uuid::Uuid;

    fn jwt_service() -> JwtService {
        let mut config: AppConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        config.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        JwtService::new(&config)
    }

    fn stored_user(password_hash: Option<String>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "asha".to_string(),
            email: "asha@example.com".to_string(),
            contact_number: None,
            password_hash,
            google_id: None,
            picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn register_rejects_a_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_or_username()
            .returning(|_| Ok(Some(stored_user(Some("hash".to_string())))));

        let handler = AuthHandler::new(repo, jwt_service(), MockGoogleVerifier::new());
        let result = handler
            .register(NewUser {
                username: "asha2".to_string(),
                email: "asha@example.com".to_string(),
                contact_number: None,
                password: "Tr0ub4dor&3xtra!".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn register_rejects_a_weak_password_before_touching_the_repo() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_or_username().never();
        repo.expect_create_user().never();

        let handler = AuthHandler::new(repo, jwt_service(), MockGoogleVerifier::new());
        let result = handler
            .register(NewUser {
                username: "asha".to_string(),
                email: "asha@example.com".to_string(),
                contact_number: None,
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn login_rejects_wrong_password_and_passwordless_accounts() {
        let hash = crate::auth::password::hash_password("Tr0ub4dor&3xtra!").unwrap();

        let mut repo = MockUserRepository::new();
        let hash_clone = hash.clone();
        repo.expect_find_by_email_or_username()
            .returning(move |identifier| {
                Ok(Some(if identifier == "google-only" {
                    stored_user(None)
                } else {
                    stored_user(Some(hash_clone.clone()))
                }))
            });

        let handler = AuthHandler::new(repo, jwt_service(), MockGoogleVerifier::new());

        let wrong = handler
            .login(LoginUser {
                email: "asha@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AuthError::WrongCredentials)));

        let passwordless = handler
            .login(LoginUser {
                email: "google-only".to_string(),
                password: "Tr0ub4dor&3xtra!".to_string(),
            })
            .await;
        assert!(matches!(passwordless, Err(AuthError::WrongCredentials)));
    }

    #[actix_rt::test]
    async fn google_auth_creates_a_passwordless_account_on_first_sight() {
        let user_id = Uuid::new_v4();

        let mut verifier = MockGoogleVerifier::new();
        verifier.expect_verify().returning(|_| {
            Ok(GoogleProfile {
                email: "new@example.com".to_string(),
                name: "New User".to_string(),
                picture: None,
                subject: "google-sub-1".to_string(),
                aud: "client-id".to_string(),
            })
        });

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_or_username().returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|insert| {
                insert.password_hash.is_none()
                    && insert.google_id.as_deref() == Some("google-sub-1")
            })
            .returning(move |_| Ok(user_id));
        repo.expect_find_by_id().returning(move |id| {
            let mut user = stored_user(None);
            user.id = *id;
            user.email = "new@example.com".to_string();
            Ok(Some(user))
        });

        let handler = AuthHandler::new(repo, jwt_service(), verifier);
        let response = handler
            .google_auth(GoogleAuthRequest {
                token: "id-token".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.email, "new@example.com");
    }
}
