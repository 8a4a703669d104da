use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, header};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use shared::types::{
    AuthGrant, ClientConfig, ErrorResponse, LoginData, LoginResponse, RegistrationData,
    RegistrationResponse, UserProfile,
};
use tracing::{debug, warn};

use super::{AuthService, AuthenticationError};

/// Upper bound on one request/response exchange with the auth service.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks JSON over plain HTTP/1.1 to the auth server's `/auth/*` endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: Client<HttpConnector, Full<Bytes>>,
    config: ClientConfig,
}

impl HttpAuthService {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, config }
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        bearer: Option<&str>,
    ) -> Result<(StatusCode, Bytes), AuthenticationError> {
        let url = self.config.endpoint(path);

        let json = serde_json::to_vec(body).map_err(|e| {
            AuthenticationError::ServiceUnavailable(format!("failed to encode request: {}", e))
        })?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder.body(Full::new(Bytes::from(json))).map_err(|e| {
            AuthenticationError::ServiceUnavailable(format!("invalid request for {}: {}", url, e))
        })?;

        debug!("POST {}", url);

        let exchange = async {
            let response = self.client.request(request).await.map_err(|e| {
                AuthenticationError::ServiceUnavailable(format!("request to {} failed: {}", url, e))
            })?;

            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| {
                    AuthenticationError::ServiceUnavailable(format!(
                        "failed to read response from {}: {}",
                        url, e
                    ))
                })?
                .to_bytes();

            Ok::<_, AuthenticationError>((status, body))
        };

        let (status, body) = tokio::time::timeout(REQUEST_TIMEOUT, exchange)
            .await
            .map_err(|_| {
                AuthenticationError::ServiceUnavailable(format!("request to {} timed out", url))
            })??;

        debug!("{} answered {} ({} bytes)", url, status, body.len());
        Ok((status, body))
    }
}

fn unexpected(status: StatusCode, error: serde_json::Error) -> AuthenticationError {
    warn!("Unparseable auth service response ({}): {}", status, error);
    AuthenticationError::ServiceUnavailable(format!("unexpected response ({}): {}", status, error))
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, data: &LoginData) -> Result<AuthGrant, AuthenticationError> {
        let (status, body) = self.post_json("auth/login", data, None).await?;

        match serde_json::from_slice::<LoginResponse>(&body) {
            Ok(LoginResponse::Success {
                user,
                token,
                expires_in,
                ..
            }) => Ok(AuthGrant {
                user,
                token,
                expires_in,
            }),
            Ok(LoginResponse::Error { code, message }) => {
                Err(AuthenticationError::from_wire(code, message))
            }
            Err(e) => Err(unexpected(status, e)),
        }
    }

    async fn register(&self, data: &RegistrationData) -> Result<UserProfile, AuthenticationError> {
        let (status, body) = self.post_json("auth/register", data, None).await?;

        match serde_json::from_slice::<RegistrationResponse>(&body) {
            Ok(RegistrationResponse::Success { user, .. }) => Ok(user),
            Ok(RegistrationResponse::Error { code, message }) => {
                Err(AuthenticationError::from_wire(code, message))
            }
            Err(e) => Err(unexpected(status, e)),
        }
    }

    async fn logout(&self, token: &str) -> Result<(), AuthenticationError> {
        let (status, body) = self
            .post_json("auth/logout", &serde_json::json!({}), Some(token))
            .await?;

        if status.is_success() {
            return Ok(());
        }

        match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(err) => Err(AuthenticationError::from_wire(err.code, err.message)),
            Err(e) => Err(unexpected(status, e)),
        }
    }
}
