use std::convert::Infallible;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::{Method, Request, Response, StatusCode, header};
use tracing::{error, info};

use crate::AppState;
use crate::handlers::json_response::{deliver_error_json, internal_error};
use crate::handlers::{auth, health};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Logout,
    Health,
}

impl Endpoint {
    /// Endpoint served at `path` (query string ignored) and the method it
    /// accepts.
    pub fn resolve(path: &str) -> Option<(Method, Self)> {
        let clean = path.split('?').next().unwrap_or(path);
        match clean {
            LOGIN_PATH => Some((Method::POST, Self::Login)),
            REGISTER_PATH => Some((Method::POST, Self::Register)),
            LOGOUT_PATH => Some((Method::POST, Self::Logout)),
            HEALTH_PATH => Some((Method::GET, Self::Health)),
            _ => None,
        }
    }
}

/// `Bearer <token>` from an Authorization header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Route one request whose body has already been collected.
pub async fn dispatch(
    method: &Method,
    path: &str,
    bearer: Option<&str>,
    body: Bytes,
    state: &AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let Some((allowed, endpoint)) = Endpoint::resolve(path) else {
        return deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND);
    };

    if *method != allowed {
        return deliver_error_json(
            "METHOD_NOT_ALLOWED",
            &format!("{} only accepts {}", path, allowed),
            StatusCode::METHOD_NOT_ALLOWED,
        );
    }

    match endpoint {
        Endpoint::Login => auth::handle_login(body, state).await,
        Endpoint::Register => auth::handle_register(body, state).await,
        Endpoint::Logout => auth::handle_logout(bearer, state).await,
        Endpoint::Health => health::handle_health(state).await,
    }
}

pub async fn route(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    let body = req
        .into_body()
        .collect()
        .await
        .context("Failed to read request body")?
        .to_bytes();

    let response = dispatch(&method, &path, bearer.as_deref(), body, &state).await?;
    info!("{} {} -> {}", method, path, response.status());
    Ok(response)
}

/// Service entry point: never fails, turning handler errors into a 500.
pub async fn handle(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>, Infallible> {
    match route(req, state).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!("Request failed: {:#}", e);
            Ok(internal_error())
        }
    }
}
