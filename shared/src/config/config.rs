use std::fs;
use tracing::{debug, error, info};

use crate::types::app_config::{AppConfig, ConfigError};

pub const MIN_SECRET_LEN: usize = 32;

/// Ten years.
pub const MAX_TOKEN_EXPIRY_MINUTES: u64 = 525_600 * 10;

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    parse_config(&contents)
}

/// Parse and validate a config document already in memory.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");
    debug!(
        "Config: server={}, service_url={}, credential_path={}",
        config.server.addr(),
        config.client.service_url,
        config.client.credential_path
    );

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.auth.token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
        return Err(ConfigError::InvalidConfig(format!(
            "token_expiry_minutes must be at most {}",
            MAX_TOKEN_EXPIRY_MINUTES
        )));
    }

    if config.client.credential_path.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "credential_path cannot be empty".into(),
        ));
    }

    if !config.client.service_url.starts_with("http://") {
        return Err(ConfigError::InvalidConfig(
            "service_url must be a plain http:// URL".into(),
        ));
    }

    // Client and server must agree on this key.
    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < MIN_SECRET_LEN => {
            return Err(ConfigError::InvalidConfig(format!(
                "jwt_secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SECRET_LINE: &str = r#"jwt_secret = "0123456789abcdef0123456789abcdef""#;

    fn with_auth(extra: &str) -> String {
        format!("[auth]\n{}\n{}\n", SECRET_LINE, extra)
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = parse_config(&with_auth("")).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:3000");
        assert_eq!(cfg.auth.token_expiry_minutes, 60);
        assert!(cfg.auth.enforce_expiry);
        assert_eq!(cfg.client.service_url, "http://127.0.0.1:3000/api");
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse_config("   \n"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_expiry_is_rejected() {
        let err = parse_config(&with_auth("token_expiry_minutes = 0")).unwrap_err();
        assert!(err.to_string().contains("token_expiry_minutes"));
    }

    #[test]
    fn oversized_expiry_is_rejected() {
        let err = parse_config(&with_auth("token_expiry_minutes = 9223372036854775807"))
            .unwrap_err();
        assert!(err.to_string().contains("at most"));

        let max = format!("token_expiry_minutes = {}", MAX_TOKEN_EXPIRY_MINUTES);
        assert!(parse_config(&with_auth(&max)).is_ok());
    }

    #[test]
    fn expiry_seconds_saturate() {
        let mut cfg = parse_config(&with_auth("")).unwrap();
        cfg.auth.token_expiry_minutes = u64::MAX;
        assert_eq!(cfg.auth.token_expiry_secs(), u64::MAX);
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = parse_config("[auth]\njwt_secret = \"short\"\n").unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn https_service_url_is_rejected() {
        let doc = format!(
            "{}[client]\nservice_url = \"https://auth.example.com/api\"\n",
            with_auth("")
        );
        assert!(parse_config(&doc).is_err());
    }

    #[test]
    fn malformed_toml_surfaces_parse_error() {
        assert!(matches!(
            parse_config("[auth\njwt_secret ="),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn load_config_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}[client]\ncredential_path = \"/tmp/cred\"\n",
            with_auth("token_expiry_minutes = 5")
        )
        .unwrap();

        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.auth.token_expiry_secs(), 300);
        assert_eq!(cfg.client.credential_path, "/tmp/cred");
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let cfg = parse_config(&with_auth("")).unwrap();
        assert_eq!(
            cfg.client.endpoint("/auth/login"),
            "http://127.0.0.1:3000/api/auth/login"
        );
    }
}
