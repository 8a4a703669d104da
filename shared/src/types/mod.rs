pub mod app_config;
pub mod identity;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod register;
pub mod role;

pub use self::app_config::{AppConfig, AuthConfig, ClientConfig, ConfigError, ServerConfig};
pub use self::identity::Identity;
pub use self::json_error::ErrorResponse;
pub use self::jwt::CredentialClaims;
pub use self::login::{
    AuthGrant, LoginData, LoginError, LoginResponse, UserProfile, is_valid_email, validate_login,
};
pub use self::register::{
    RegistrationData, RegistrationError, RegistrationResponse, validate_registration,
};
pub use self::role::Role;
