use serde::{Deserialize, Serialize};

use super::login::{UserProfile, is_valid_email};
use super::role::Role;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Signup form. Accepts the dashboard's camelCase field names as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub email: String,
    pub password: String,
    #[serde(default, alias = "confirmPassword", skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    pub role: Role,
    #[serde(default, alias = "companyName", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl RegistrationData {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Registration response codes
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationResponse {
    Success {
        user: UserProfile,
        message: String,
        redirect: String,
    },
    Error {
        code: String,
        message: String,
    },
}

/// Error codes for registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    EmailTaken,
    InvalidEmail,
    InvalidPassword,
    PasswordMismatch,
    InvalidRole,
    CompanyRequired,
    MissingField(String),
    InternalError,
}

impl RegistrationError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::InvalidRole => "INVALID_ROLE",
            Self::CompanyRequired => "COMPANY_REQUIRED",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::EmailTaken => "Email already exists".to_string(),
            Self::InvalidEmail => "Email is invalid".to_string(),
            Self::InvalidPassword => format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ),
            Self::PasswordMismatch => "Passwords do not match".to_string(),
            Self::InvalidRole => "Role must be admin, advertiser or viewer".to_string(),
            Self::CompanyRequired => "Company name is required for advertisers".to_string(),
            Self::MissingField(field) => format!("Missing required field: {}", field),
            Self::InternalError => "Failed to create account. Please try again.".to_string(),
        }
    }

    pub fn to_response(&self) -> RegistrationResponse {
        RegistrationResponse::Error {
            code: self.to_code().to_string(),
            message: self.to_message(),
        }
    }
}

/// Field checks run on both sides of the wire. Duplicate emails can only be
/// detected by the directory and are not checked here.
pub fn validate_registration(data: &RegistrationData) -> Result<(), RegistrationError> {
    if data.email.trim().is_empty() {
        return Err(RegistrationError::MissingField("email".to_string()));
    }

    if !is_valid_email(&data.email) {
        return Err(RegistrationError::InvalidEmail);
    }

    if data.password.is_empty() {
        return Err(RegistrationError::MissingField("password".to_string()));
    }

    if data.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::InvalidPassword);
    }

    if let Some(confirm) = &data.confirm_password {
        if confirm != &data.password {
            return Err(RegistrationError::PasswordMismatch);
        }
    }

    if data.first_name.trim().is_empty() {
        return Err(RegistrationError::MissingField("first_name".to_string()));
    }

    if data.last_name.trim().is_empty() {
        return Err(RegistrationError::MissingField("last_name".to_string()));
    }

    if !data.role.is_known() {
        return Err(RegistrationError::InvalidRole);
    }

    let has_company = data
        .company_name
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if data.role == Role::Advertiser && !has_company {
        return Err(RegistrationError::CompanyRequired);
    }

    Ok(())
}
