use std::sync::Arc;

use async_trait::async_trait;
use shared::UserDirectory;
use shared::types::{AuthGrant, LoginData, RegistrationData, UserProfile};
use tracing::debug;

use super::{AuthService, AuthenticationError};

/// Serves logins straight from an in-process [`UserDirectory`].
///
/// Used for offline runs and tests; behaves like the HTTP service minus the
/// network.
#[derive(Debug, Clone)]
pub struct DirectoryAuthService {
    directory: Arc<UserDirectory>,
}

impl DirectoryAuthService {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AuthService for DirectoryAuthService {
    async fn login(&self, data: &LoginData) -> Result<AuthGrant, AuthenticationError> {
        Ok(self.directory.authenticate(data).await?)
    }

    async fn register(&self, data: &RegistrationData) -> Result<UserProfile, AuthenticationError> {
        Ok(self.directory.register(data).await?)
    }

    async fn logout(&self, _token: &str) -> Result<(), AuthenticationError> {
        debug!("Directory logout: nothing to revoke");
        Ok(())
    }
}
