//! reqwest implementation of [`AuthApi`]

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;

use super::{ApiError, AuthApi, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH, VERIFY_PATH};
use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::models::{ApiErrorBody, AuthResponse, LoginRequest, RegistrationData, User, VerifyResponse};

/// HTTP client for the auth service
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    base_url: String,
    client: Client,
}

impl HttpAuthClient {
    /// Build a client from configuration (base URL and request timeout)
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("rsvp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(&config.base_url, client))
    }

    /// Use a caller-supplied reqwest client
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into `ApiError::Status`, keeping the
    /// service's message when the body carries one
    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status));

        log::debug!("[auth:http] HTTP {} - {}", status, message);
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> std::result::Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::warn!("[auth:http] Failed to parse response: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn verify(&self, token: &str) -> std::result::Result<User, ApiError> {
        log::debug!("[auth:http] GET {}", VERIFY_PATH);

        let response = self
            .client
            .get(self.endpoint(VERIFY_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let body: VerifyResponse = Self::read_json(response).await?;
        Ok(body.user)
    }

    async fn login(&self, request: &LoginRequest) -> std::result::Result<AuthResponse, ApiError> {
        log::debug!("[auth:http] POST {}", LOGIN_PATH);

        let response = self
            .client
            .post(self.endpoint(LOGIN_PATH))
            .json(request)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn logout(&self, token: &str) -> std::result::Result<(), ApiError> {
        log::debug!("[auth:http] POST {}", LOGOUT_PATH);

        let response = self
            .client
            .post(self.endpoint(LOGOUT_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    async fn register(&self, data: &RegistrationData) -> std::result::Result<AuthResponse, ApiError> {
        log::debug!("[auth:http] POST {}", REGISTER_PATH);

        let response = self
            .client
            .post(self.endpoint(REGISTER_PATH))
            .json(data)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = HttpAuthClient::with_client("https://rsvp.example.com//", Client::new());
        assert_eq!(client.base_url(), "https://rsvp.example.com");
        assert_eq!(
            client.endpoint(VERIFY_PATH),
            "https://rsvp.example.com/api/auth/verify"
        );
    }

    #[test]
    fn test_new_from_config() {
        let config = AuthConfig {
            base_url: "http://localhost:3000/".to_string(),
            db_path: "/tmp/unused.db".into(),
            timeout: Duration::from_secs(3),
        };
        let client = HttpAuthClient::new(&config).unwrap();
        assert_eq!(client.endpoint(LOGIN_PATH), "http://localhost:3000/api/auth/login");
    }
}
