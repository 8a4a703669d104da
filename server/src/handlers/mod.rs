pub mod auth;
pub mod health;
pub mod json_response;
