use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::credential::CredentialCodec;
use crate::password::{hash_password, verify_password};
use crate::types::{
    AuthGrant, LoginData, LoginError, RegistrationData, RegistrationError, Role, UserProfile,
    validate_login, validate_registration,
};

/// Demo accounts the dashboard ships with: (email, password, role, name).
pub const DEMO_ACCOUNTS: [(&str, &str, Role, &str); 3] = [
    ("admin@example.com", "admin123", Role::Administrator, "Admin User"),
    (
        "advertiser@example.com",
        "advertiser123",
        Role::Advertiser,
        "Advertiser User",
    ),
    ("viewer@example.com", "viewer123", Role::Viewer, "Viewer User"),
];

#[derive(Debug, Clone)]
struct Account {
    id: i64,
    email: String,
    name: String,
    role: Role,
    company_name: Option<String>,
    password_hash: String,
}

impl Account {
    fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug)]
struct Accounts {
    rows: Vec<Account>,
    next_id: i64,
}

impl Accounts {
    fn find(&self, email: &str) -> Option<&Account> {
        let email = email.trim();
        self.rows.iter().find(|a| a.email.eq_ignore_ascii_case(email))
    }
}

/// In-memory account directory that plays the authentication service.
///
/// Passwords are stored as Argon2 hashes; successful logins are answered
/// with a credential signed by the directory's codec.
#[derive(Debug)]
pub struct UserDirectory {
    accounts: RwLock<Accounts>,
    codec: CredentialCodec,
}

impl UserDirectory {
    pub fn new(codec: CredentialCodec) -> Self {
        Self {
            accounts: RwLock::new(Accounts {
                rows: Vec::new(),
                next_id: 1,
            }),
            codec,
        }
    }

    /// A directory pre-populated with [`DEMO_ACCOUNTS`].
    pub async fn with_demo_accounts(codec: CredentialCodec) -> Result<Self, RegistrationError> {
        let directory = Self::new(codec);
        for (email, password, role, name) in DEMO_ACCOUNTS {
            let (first_name, last_name) = name.split_once(' ').unwrap_or((name, ""));
            directory
                .register(&RegistrationData {
                    email: email.to_string(),
                    password: password.to_string(),
                    confirm_password: None,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    role,
                    company_name: (role == Role::Advertiser).then(|| "Demo Ads".to_string()),
                })
                .await?;
        }
        Ok(directory)
    }

    pub fn codec(&self) -> &CredentialCodec {
        &self.codec
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn authenticate(&self, data: &LoginData) -> Result<AuthGrant, LoginError> {
        validate_login(data)?;

        info!("Attempting login for user: {}", data.email.trim());

        let account = {
            let accounts = self.accounts.read().await;
            accounts.find(&data.email).cloned()
        }
        .ok_or_else(|| {
            warn!("User not found: {}", data.email.trim());
            LoginError::InvalidCredentials
        })?;

        let password_valid =
            verify_password(&account.password_hash, &data.password).map_err(|e| {
                error!("Password verification error: {}", e);
                LoginError::InternalError
            })?;

        if !password_valid {
            warn!("Invalid password for user: {}", account.email);
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .codec
            .issue(account.id, &account.email, &account.name, account.role)
            .map_err(|e| {
                error!("Failed to issue credential: {}", e);
                LoginError::InternalError
            })?;

        info!(
            "Login successful for user: {} (ID: {})",
            account.email, account.id
        );

        Ok(AuthGrant {
            user: account.profile(),
            token,
            expires_in: self.codec.token_ttl().as_secs(),
        })
    }

    pub async fn register(&self, data: &RegistrationData) -> Result<UserProfile, RegistrationError> {
        validate_registration(data)?;

        let password_hash = hash_password(&data.password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            RegistrationError::InternalError
        })?;

        let mut accounts = self.accounts.write().await;
        if accounts.find(&data.email).is_some() {
            warn!("Registration with existing email: {}", data.email.trim());
            return Err(RegistrationError::EmailTaken);
        }

        let account = Account {
            id: accounts.next_id,
            email: data.email.trim().to_string(),
            name: data.display_name(),
            role: data.role,
            company_name: data
                .company_name
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            password_hash,
        };
        accounts.next_id += 1;

        info!(
            "Registered user: {} (ID: {}, role: {}, company: {:?})",
            account.email, account.id, account.role, account.company_name
        );

        let profile = account.profile();
        accounts.rows.push(account);
        Ok(profile)
    }
}
