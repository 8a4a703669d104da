mod directory;
mod remote;

pub use self::directory::DirectoryAuthService;
pub use self::remote::HttpAuthService;

use std::sync::Arc;

use async_trait::async_trait;
use shared::DecodeError;
use shared::types::{AuthGrant, LoginData, LoginError, RegistrationData, RegistrationError, UserProfile};
use thiserror::Error;

pub type DynAuthService = Arc<dyn AuthService>;

/// The remote (or in-process) party that checks passwords and issues
/// credentials. The session store is its only caller.
#[async_trait]
pub trait AuthService: Send + Sync + std::fmt::Debug {
    async fn login(&self, data: &LoginData) -> Result<AuthGrant, AuthenticationError>;

    async fn register(&self, data: &RegistrationData) -> Result<UserProfile, AuthenticationError>;

    /// Best-effort notification that `token` is no longer in use.
    async fn logout(&self, token: &str) -> Result<(), AuthenticationError>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a login or registration, surfaced to the caller for display.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("auth service rejected the request: {code}: {message}")]
    Rejected { code: String, message: String },

    #[error("auth service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("auth service returned an unusable credential: {0}")]
    InvalidCredential(DecodeError),

    #[error("failed to persist credential: {0}")]
    Storage(String),

    #[error("login discarded by a later logout")]
    Superseded,
}

impl AuthenticationError {
    pub fn to_code(&self) -> &str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Rejected { code, .. } => code.as_str(),
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Superseded => "SUPERSEDED",
        }
    }

    /// Message suitable for an inline form error.
    pub fn to_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::EmailTaken => "Email already exists".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::ServiceUnavailable(_) => {
                "The sign-in service is unavailable. Please try again.".to_string()
            }
            Self::InvalidCredential(_) => {
                "The sign-in service returned an invalid session. Please try again.".to_string()
            }
            Self::Storage(_) => "Could not save your session on this device.".to_string(),
            Self::Superseded => "You were signed out before sign-in completed.".to_string(),
        }
    }

    /// Map an error envelope `{code, message}` from the wire.
    pub fn from_wire(code: String, message: String) -> Self {
        match code.as_str() {
            "INVALID_CREDENTIALS" => Self::InvalidCredentials,
            "EMAIL_TAKEN" => Self::EmailTaken,
            "INVALID_EMAIL" | "MISSING_FIELD" | "INVALID_PASSWORD" | "PASSWORD_MISMATCH"
            | "INVALID_ROLE" | "COMPANY_REQUIRED" => Self::InvalidInput(message),
            "INTERNAL_ERROR" => Self::ServiceUnavailable(message),
            _ => Self::Rejected { code, message },
        }
    }
}

impl From<LoginError> for AuthenticationError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => Self::InvalidCredentials,
            LoginError::InternalError => Self::ServiceUnavailable(error.to_message()),
            other => Self::InvalidInput(other.to_message()),
        }
    }
}

impl From<RegistrationError> for AuthenticationError {
    fn from(error: RegistrationError) -> Self {
        match error {
            RegistrationError::EmailTaken => Self::EmailTaken,
            RegistrationError::InternalError => Self::ServiceUnavailable(error.to_message()),
            other => Self::InvalidInput(other.to_message()),
        }
    }
}
