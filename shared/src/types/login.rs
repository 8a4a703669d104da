use serde::{Deserialize, Serialize};

use super::role::Role;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

/// Public part of an account, returned alongside the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Successful / failed login response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    Success {
        user: UserProfile,
        /// Signed credential; the client persists this and nothing else.
        token: String,
        expires_in: u64,
        message: String,
    },
    Error {
        code: String,
        message: String,
    },
}

/// What a successful authentication hands back to the caller.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: UserProfile,
    pub token: String,
    pub expires_in: u64,
}

impl LoginResponse {
    pub fn success(grant: AuthGrant) -> Self {
        Self::Success {
            user: grant.user,
            token: grant.token,
            expires_in: grant.expires_in,
            message: "Login successful".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Login errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
    InvalidEmail,
    MissingField(String),
    InternalError,
}

impl LoginError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::InvalidEmail => "Please enter a valid email address".to_string(),
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::InternalError => "An internal error occurred".to_string(),
        }
    }

    pub fn to_response(&self) -> LoginResponse {
        LoginResponse::Error {
            code: self.to_code().to_string(),
            message: self.to_message(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Loose `local@domain.tld` check: no whitespace, something on each side of
/// the last `@`, and a dot with text on both sides in the domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_login(data: &LoginData) -> Result<(), LoginError> {
    if data.email.trim().is_empty() {
        return Err(LoginError::MissingField("email".to_string()));
    }

    if !is_valid_email(&data.email) {
        return Err(LoginError::InvalidEmail);
    }

    if data.password.is_empty() {
        return Err(LoginError::MissingField("password".to_string()));
    }

    Ok(())
}
