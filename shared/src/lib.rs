//! Types and building blocks shared by the adboard client and auth server:
//! roles and identities, the credential codec, the in-memory user directory
//! and configuration loading.

pub mod config;
pub mod credential;
pub mod directory;
pub mod password;
pub mod types;

pub use self::credential::{CodecError, CredentialCodec, DecodeError};
pub use self::directory::UserDirectory;
