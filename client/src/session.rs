use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::CredentialCodec;
use shared::DecodeError;
use shared::types::{
    Identity, LoginData, RegistrationData, Role, UserProfile, validate_login,
    validate_registration,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticationError, DynAuthService};
use crate::store::DynCredentialStore;

// ---------------------------------------------------------------------------
// Session snapshot
// ---------------------------------------------------------------------------

/// Who, if anyone, is logged in, and whether startup restore is still
/// running.
#[derive(Debug, Clone)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
    // Bumped by every logout; pending logins and restores compare against it.
    epoch: u64,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            identity: None,
            loading: true,
            epoch: 0,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            identity: None,
            loading: false,
            epoch: 0,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
            epoch: 0,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(Identity::role)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owns the current [`Session`] and the persisted credential behind it.
///
/// Every mutation goes through the watch channel's write lock, and the
/// credential store is written or cleared inside that same critical section,
/// so the two never disagree once an operation returns. A logout always wins
/// over a login or restore that was already in flight.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<Session>,
    auth: DynAuthService,
    credentials: DynCredentialStore,
    codec: CredentialCodec,
    initialize_started: AtomicBool,
}

impl SessionStore {
    pub fn new(
        auth: DynAuthService,
        credentials: DynCredentialStore,
        codec: CredentialCodec,
    ) -> Self {
        Self {
            state: watch::Sender::new(Session::loading()),
            auth,
            credentials,
            codec,
            initialize_started: AtomicBool::new(false),
        }
    }

    /// Restore the persisted credential, if any. Runs once; later calls
    /// return the current snapshot untouched.
    pub async fn initialize(&self) -> Session {
        if self.initialize_started.swap(true, Ordering::SeqCst) {
            debug!("Session store already initialized");
            return self.current();
        }

        let epoch = self.state.borrow().epoch;

        let credentials = Arc::clone(&self.credentials);
        let raw = match tokio::task::spawn_blocking(move || credentials.read()).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Credential read task failed: {}", e);
                None
            }
        };

        let restored = match raw {
            Some(raw) => self.codec.decode(&raw),
            None => Err(DecodeError::Missing),
        };

        self.state.send_modify(|session| {
            session.loading = false;

            match restored {
                Ok(identity) if session.epoch != epoch => {
                    debug!("Discarding restored session for {}: logged out meanwhile", identity);
                }
                Ok(identity) if session.identity.is_some() => {
                    debug!("Discarding restored session for {}: login completed first", identity);
                }
                Ok(identity) => {
                    info!("Restored session for {}", identity);
                    session.identity = Some(identity);
                }
                Err(e) => {
                    match e {
                        DecodeError::Missing => debug!("No persisted credential"),
                        other => warn!("Discarding persisted credential: {}", other),
                    }
                    // A login that landed during the read owns the store now.
                    if session.identity.is_none() {
                        if let Err(e) = self.credentials.clear() {
                            warn!("Failed to clear persisted credential: {}", e);
                        }
                    }
                }
            }
        });

        self.current()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthenticationError> {
        let data = LoginData {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate_login(&data)?;

        let epoch = self.state.borrow().epoch;
        info!("Logging in {}", data.email);

        let grant = self.auth.login(&data).await.map_err(|e| {
            warn!("Login failed for {}: {}", data.email, e);
            e
        })?;

        let identity = self.codec.decode(&grant.token).map_err(|e| {
            warn!("Auth service returned an unusable credential: {}", e);
            AuthenticationError::InvalidCredential(e)
        })?;

        let mut outcome = Ok(());
        self.state.send_if_modified(|session| {
            if session.epoch != epoch {
                outcome = Err(AuthenticationError::Superseded);
                return false;
            }
            if let Err(e) = self.credentials.write(identity.token()) {
                outcome = Err(AuthenticationError::Storage(e.to_string()));
                return false;
            }
            session.identity = Some(identity.clone());
            true
        });

        match outcome {
            Ok(()) => {
                info!("Logged in {}", identity);
                Ok(identity)
            }
            Err(e) => {
                warn!("Discarding login for {}: {}", identity, e);
                Err(e)
            }
        }
    }

    /// Clear the session and the persisted credential, then tell the auth
    /// service. Never fails; calling it with no session is harmless.
    pub async fn logout(&self) {
        let mut previous = None;
        self.state.send_modify(|session| {
            session.epoch += 1;
            previous = session.identity.take();
            if let Err(e) = self.credentials.clear() {
                warn!("Failed to clear persisted credential: {}", e);
            }
        });

        let Some(identity) = previous else {
            debug!("Logout with no active session");
            return;
        };

        info!("Logged out {}", identity);
        if let Err(e) = self.auth.logout(identity.token()).await {
            warn!("Auth service logout failed for {}: {}", identity, e);
        }
    }

    /// Validates and forwards a signup. The session is left untouched.
    pub async fn register(&self, data: &RegistrationData) -> Result<UserProfile, AuthenticationError> {
        validate_registration(data)?;

        let profile = self.auth.register(data).await.map_err(|e| {
            warn!("Registration failed for {}: {}", data.email.trim(), e);
            e
        })?;

        info!("Registered {} as {}", profile.email, profile.role);
        Ok(profile)
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }
}
