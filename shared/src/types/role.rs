use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role carried in every credential.
///
/// The set is closed. Any wire value that is not one of the three known
/// names decodes to [`Role::Unknown`], which the route guard never admits
/// onto a role-restricted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Administrator,
    Advertiser,
    Viewer,
    Unknown,
}

impl Role {
    /// Every role an account can actually hold.
    pub const KNOWN: [Role; 3] = [Role::Administrator, Role::Advertiser, Role::Viewer];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Administrator,
            "advertiser" => Self::Advertiser,
            "viewer" => Self::Viewer,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Advertiser => "advertiser",
            Self::Viewer => "viewer",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Default page after login when no destination was preserved.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Administrator => "/admin",
            Self::Advertiser => "/advertiser",
            Self::Viewer => "/viewer",
            Self::Unknown => "/",
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
