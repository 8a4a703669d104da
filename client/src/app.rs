use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use shared::config::load_config;
use shared::types::AppConfig;
use shared::{CredentialCodec, UserDirectory};
use tracing::{info, warn};

use crate::auth::{DirectoryAuthService, DynAuthService, HttpAuthService};
use crate::session::SessionStore;
use crate::store::{DynCredentialStore, FileCredentialStore};

/// Load `path`, or fall back to defaults (plus `JWT_SECRET`) when the file
/// does not exist.
pub fn resolve_config(path: &str) -> Result<AppConfig> {
    if Path::new(path).exists() {
        return load_config(path).with_context(|| format!("Failed to load config from {}", path));
    }
    warn!("Config file {} not found, using defaults", path);
    Ok(AppConfig::default())
}

/// Wire a session store from configuration. `offline` swaps the HTTP auth
/// service for an in-process directory seeded with the demo accounts.
pub async fn build_session_store(config: &AppConfig, offline: bool) -> Result<Arc<SessionStore>> {
    let codec = CredentialCodec::from_config(&config.auth)
        .context("Failed to build credential codec (set auth.jwt_secret or JWT_SECRET)")?;

    let auth: DynAuthService = if offline {
        info!("Offline mode: using the built-in demo directory");
        let directory = UserDirectory::with_demo_accounts(codec.clone())
            .await
            .map_err(|e| anyhow!("Failed to seed demo accounts: {}", e.to_message()))?;
        Arc::new(DirectoryAuthService::new(Arc::new(directory)))
    } else {
        info!("Using auth service at {}", config.client.service_url);
        Arc::new(HttpAuthService::new(config.client.clone()))
    };

    let credentials: DynCredentialStore =
        Arc::new(FileCredentialStore::new(&config.client.credential_path));

    Ok(Arc::new(SessionStore::new(auth, credentials, codec)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = resolve_config("/nonexistent.toml").unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
        assert_eq!(config.auth.token_expiry_minutes, 60);
        assert_eq!(config.client.service_url, "http://127.0.0.1:3000/api");
    }

    #[test]
    fn existing_but_invalid_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[auth\n").unwrap();
        assert!(resolve_config(file.path().to_str().unwrap()).is_err());
    }
}
