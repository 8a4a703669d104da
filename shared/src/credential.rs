use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use thiserror::Error;
use tracing::debug;

use crate::types::{AuthConfig, CredentialClaims, Identity, Role};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a stored or received credential could not become an [`Identity`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no credential present")]
    Missing,

    #[error("malformed credential: {0}")]
    Malformed(String),

    #[error("credential has expired")]
    Expired,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("no signing secret configured")]
    MissingSecret,

    #[error("failed to sign credential: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Signs credentials for the auth service and turns them back into
/// identities for the session store. HS256 only.
#[derive(Clone)]
pub struct CredentialCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    enforce_expiry: bool,
}

impl fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("token_ttl", &self.token_ttl)
            .field("enforce_expiry", &self.enforce_expiry)
            .finish_non_exhaustive()
    }
}

impl CredentialCodec {
    pub fn new(secret: &str, token_ttl: Duration, enforce_expiry: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
            enforce_expiry,
        }
    }

    pub fn from_config(auth: &AuthConfig) -> Result<Self, CodecError> {
        let secret = auth.resolved_jwt_secret().ok_or(CodecError::MissingSecret)?;
        Ok(Self::new(
            &secret,
            Duration::from_secs(auth.token_expiry_secs()),
            auth.enforce_expiry,
        ))
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Sign a fresh credential valid for the configured TTL.
    pub fn issue(
        &self,
        user_id: i64,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<String, CodecError> {
        let iat = get_current_timestamp();
        let claims = CredentialClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            iat,
            exp: iat.saturating_add(self.token_ttl.as_secs()),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims as-is.
    pub fn sign(&self, claims: &CredentialClaims) -> Result<String, CodecError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Verify `raw` and build the identity it describes.
    ///
    /// Either every claim checks out and a complete identity is returned,
    /// or nothing is.
    pub fn decode(&self, raw: &str) -> Result<Identity, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DecodeError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = self.enforce_expiry;
        validation.leeway = 0;

        let claims = decode::<CredentialClaims>(raw, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DecodeError::Expired,
                _ => DecodeError::Malformed(e.to_string()),
            })?
            .claims;

        let user_id = claims
            .user_id()
            .ok_or_else(|| DecodeError::Malformed("subject is not a user id".to_string()))?;

        if claims.email.trim().is_empty() {
            return Err(DecodeError::Malformed("empty email claim".to_string()));
        }

        debug!("Decoded credential for user_id={}", user_id);

        Ok(Identity::new(
            user_id,
            claims.email,
            claims.name,
            claims.role,
            raw.to_string(),
        ))
    }
}
