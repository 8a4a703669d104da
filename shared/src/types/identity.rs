use std::fmt;

use serde::Serialize;

use super::role::Role;

/// The authenticated principal held by a session.
///
/// There is no public constructor: an `Identity` only comes out of a
/// successful [`crate::credential::CredentialCodec::decode`], so every
/// field is always populated from a verified credential.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    user_id: i64,
    email: String,
    name: String,
    role: Role,
    #[serde(skip_serializing)]
    token: String,
}

impl Identity {
    pub(crate) fn new(user_id: i64, email: String, name: String, role: Role, token: String) -> Self {
        Self {
            user_id,
            email,
            name,
            role,
            token,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The raw credential this identity was decoded from.
    pub fn token(&self) -> &str {
        &self.token
    }
}

// Neither impl prints the token.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user_id={}, email={}, role={}",
            self.user_id, self.email, self.role
        )
    }
}
