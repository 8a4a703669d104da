use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Response, StatusCode};
use serde_json::json;
use shared::types::{
    LoginData, LoginError, LoginResponse, RegistrationData, RegistrationError,
    RegistrationResponse,
};
use tracing::{debug, info, warn};

use crate::AppState;
use crate::handlers::json_response::{deliver_error_json, deliver_serialized_json};

fn login_status(error: &LoginError) -> StatusCode {
    match error {
        LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        LoginError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        LoginError::InvalidEmail | LoginError::MissingField(_) => StatusCode::BAD_REQUEST,
    }
}

fn registration_status(error: &RegistrationError) -> StatusCode {
    match error {
        RegistrationError::EmailTaken => StatusCode::CONFLICT,
        RegistrationError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn invalid_body(error: serde_json::Error) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_json(
        "INVALID_REQUEST",
        &format!("Request body is not valid JSON: {}", error),
        StatusCode::BAD_REQUEST,
    )
}

// ---------------------------------------------------------------------------
// POST /api/auth/login
// ---------------------------------------------------------------------------

pub async fn handle_login(
    body: Bytes,
    state: &AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing login request");

    let data: LoginData = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => return invalid_body(e),
    };

    match state.directory.authenticate(&data).await {
        Ok(grant) => {
            info!("Issued credential for user ID {}", grant.user.id);
            deliver_serialized_json(&LoginResponse::success(grant), StatusCode::OK)
        }
        Err(error) => {
            warn!("Login rejected: {}", error.to_code());
            deliver_serialized_json(&error.to_response(), login_status(&error))
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/auth/register
// ---------------------------------------------------------------------------

pub async fn handle_register(
    body: Bytes,
    state: &AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing registration request");

    let data: RegistrationData = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => return invalid_body(e),
    };

    match state.directory.register(&data).await {
        Ok(user) => deliver_serialized_json(
            &RegistrationResponse::Success {
                user,
                message: "Registration successful".to_string(),
                redirect: "/login".to_string(),
            },
            StatusCode::CREATED,
        ),
        Err(error) => {
            warn!("Registration rejected: {}", error.to_code());
            deliver_serialized_json(&error.to_response(), registration_status(&error))
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/auth/logout
// ---------------------------------------------------------------------------

/// Credentials are stateless, so logout only records who left. It succeeds
/// whether or not the bearer token is still valid.
pub async fn handle_logout(
    bearer: Option<&str>,
    state: &AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    match bearer.map(|token| state.directory.codec().decode(token)) {
        Some(Ok(identity)) => info!("User logged out: {}", identity),
        Some(Err(e)) => debug!("Logout with unusable credential: {}", e),
        None => debug!("Logout without credential"),
    }

    deliver_serialized_json(
        &json!({
            "status": "success",
            "message": "Logged out successfully"
        }),
        StatusCode::OK,
    )
}
