use serde::{Deserialize, Serialize};

use super::role::Role;

/// Claims embedded in every credential issued by the auth service.
///
/// Every field is required when decoding. A token missing any of them, or
/// carrying a `sub` that is not a decimal user id, is rejected as a whole
/// rather than producing a half-filled identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Standard JWT subject: the numeric user id as a decimal string.
    pub sub: String,

    pub email: String,

    /// Display name shown in the dashboard header.
    pub name: String,

    /// Wire role name. Unrecognised values decode to `Role::Unknown`.
    pub role: Role,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: u64,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,
}

impl CredentialClaims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
