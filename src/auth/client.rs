use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::AuthConfig;
use crate::error::SessionError;

use super::session::AuthSession;

/// REST client for the identity provider (Firebase Identity Toolkit shape).
///
/// The provider owns credential storage, session tokens, password reset, and
/// OAuth; this client only issues a handful of request/response calls and
/// reports provider errors verbatim.
pub struct AuthClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    /// Lifetime of the id token in seconds, sent as a string
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AuthClient {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SessionError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let session = self.token_call("signInWithPassword", body).await?;
        info!("Signed in as {}", session.email);
        Ok(session)
    }

    /// Create a new email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, SessionError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let session = self.token_call("signUp", body).await?;
        info!("Created account for {}", session.email);
        Ok(session)
    }

    /// Exchange a Google-issued id token for a provider session.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthSession, SessionError> {
        let body = json!({
            "postBody": format!("id_token={id_token}&providerId=google.com"),
            "requestUri": "http://localhost",
            "returnSecureToken": true,
        });

        let session = self.token_call("signInWithIdp", body).await?;
        info!("Signed in with Google as {}", session.email);
        Ok(session)
    }

    /// Request a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), SessionError> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });

        self.post("sendOobCode", body).await?;
        info!("Password reset email requested for {}", email);
        Ok(())
    }

    async fn token_call(&self, action: &str, body: Value) -> Result<AuthSession, SessionError> {
        let response = self.post(action, body).await?;

        let token: TokenResponse = serde_json::from_value(response).map_err(|e| {
            error!("Unexpected provider response for {action}: {e}");
            SessionError::Auth("Unexpected response from authentication provider".to_string())
        })?;

        let lifetime_secs: i64 = token.expires_in.parse().unwrap_or(3600);

        Ok(AuthSession {
            local_id: token.local_id,
            email: token.email,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(lifetime_secs),
        })
    }

    async fn post(&self, action: &str, body: Value) -> Result<Value, SessionError> {
        let url = format!("{}/accounts:{}?key={}", self.endpoint, action, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Auth request {action} failed: {e}");
                SessionError::Auth(e.to_string())
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| {
                error!("Failed to read auth response for {action}: {e}");
                SessionError::Auth("Unexpected response from authentication provider".to_string())
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_error_message(status, &body);

        error!("Auth request {action} rejected: {message}");

        Err(SessionError::Auth(message))
    }
}

/// Surface the provider's own error message verbatim; fall back to the HTTP
/// status when the body is not the expected error shape.
fn provider_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| format!("Authentication failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_provider_error_message_passes_through_verbatim() {
        let body = r#"{"error":{"message":"EMAIL_NOT_FOUND"}}"#;

        assert_eq!(
            provider_error_message(StatusCode::BAD_REQUEST, body),
            "EMAIL_NOT_FOUND"
        );
    }

    #[test]
    fn test_unparseable_error_body_falls_back_to_the_status() {
        assert_eq!(
            provider_error_message(StatusCode::BAD_REQUEST, "<html>nope</html>"),
            "Authentication failed with status 400 Bad Request"
        );
    }

    #[test]
    fn test_empty_error_body_falls_back_to_the_status() {
        assert_eq!(
            provider_error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Authentication failed with status 500 Internal Server Error"
        );
    }
}
