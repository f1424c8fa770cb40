use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AuthError;

/// Profile claims extracted from a verified Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    /// Google's stable per-user id (`sub`).
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(default)]
    pub aud: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, AuthError>;
}

/// Verifies ID tokens against Google's tokeninfo endpoint and checks the
/// audience matches our configured client id.
pub struct GoogleTokenClient {
    http: reqwest::Client,
    client_id: Option<String>,
    endpoint: String,
}

impl GoogleTokenClient {
    pub fn new(client_id: Option<String>) -> Self {
        GoogleTokenClient {
            http: reqwest::Client::new(),
            client_id,
            endpoint: "https://oauth2.googleapis.com/tokeninfo".to_string(),
        }
    }

    pub fn with_endpoint(client_id: Option<String>, endpoint: String) -> Self {
        GoogleTokenClient {
            http: reqwest::Client::new(),
            client_id,
            endpoint,
        }
    }
}

#[async_trait]
impl GoogleVerifier for GoogleTokenClient {
    async fn verify(&self, id_token: &str) -> Result<GoogleProfile, AuthError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Google tokeninfo request failed: {}", e);
                AuthError::InvalidGoogleToken
            })?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidGoogleToken);
        }

        let profile: GoogleProfile = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidGoogleToken)?;

        if let Some(expected) = &self.client_id {
            if &profile.aud != expected {
                tracing::warn!("Google token audience mismatch");
                return Err(AuthError::InvalidGoogleToken);
            }
        }

        Ok(profile)
    }
}
