//! HTTP client for the auth endpoints.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use rollcall_core::{LoginInput, RegisterInput, UserProfile};

use crate::error::ApiError;

/// Path of the login endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "auth/login";
/// Path of the registration endpoint, relative to the base URL.
pub const REGISTER_PATH: &str = "users";

/// Successful login response.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Auth endpoints as seen by the session client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, input: &LoginInput) -> Result<LoginResponse, ApiError>;

    /// Create an account.
    async fn register(&self, input: &RegisterInput) -> Result<UserProfile, ApiError>;
}

/// Error body returned by the server.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: Url,
}

impl HttpAuthApi {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` does not parse.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "POST");

        let response = self.client.post(url).json(body).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, input: &LoginInput) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post(LOGIN_PATH, input).await?;
        if response.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response has an empty access_token".to_owned(),
            ));
        }
        Ok(response)
    }

    async fn register(&self, input: &RegisterInput) -> Result<UserProfile, ApiError> {
        self.post(REGISTER_PATH, input).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let payload: ErrorPayload = serde_json::from_str(&body).unwrap_or_default();
    tracing::debug!(status = status.as_u16(), kind = ?payload.kind, "API error response");

    Err(ApiError::Server {
        status: status.as_u16(),
        kind: payload.kind,
        message: payload.message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://localhost:3000", "http://localhost:3000/auth/login")]
    #[case("http://localhost:3000/", "http://localhost:3000/auth/login")]
    #[case("https://api.example.com/v1", "https://api.example.com/v1/auth/login")]
    fn test_endpoint_joins_under_base(#[case] base: &str, #[case] expected: &str) {
        let api = HttpAuthApi::new(base).unwrap();
        assert_eq!(api.endpoint(LOGIN_PATH).unwrap().as_str(), expected);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpAuthApi::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_login_response_debug_redacts_token() {
        let response = LoginResponse {
            access_token: "eyJhbGciOi".to_owned(),
        };
        assert!(!format!("{response:?}").contains("eyJ"));
    }
}
