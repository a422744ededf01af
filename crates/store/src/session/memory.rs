//! In-process identity provider for development, demos and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use shopmall_core::{Email, Identity, IdentityMetadata};
use tokio::sync::watch;
use uuid::Uuid;

use super::{AuthError, IdentityProvider};

/// Shortest password accepted by sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Accounts available in every demo build.
pub const DEMO_ACCOUNTS: [(&str, &str); 2] =
    [("admin@gmail.com", "0000"), ("test@test.com", "test123")];

struct Account {
    uid: String,
    password: SecretString,
    created_at: DateTime<Utc>,
}

/// Identity provider keeping accounts in memory.
///
/// Every successful sign-in, sign-up and sign-out is also pushed to
/// [`IdentityProvider::subscribe`] receivers, the same way a hosted provider
/// reports session changes.
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<Email, Account>>,
    current: watch::Sender<Option<Identity>>,
    unavailable: AtomicBool,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryIdentityProvider")
            .field("accounts", &self.accounts().len())
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl InMemoryIdentityProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create a provider seeded with [`DEMO_ACCOUNTS`].
    #[must_use]
    pub fn with_demo_accounts() -> Self {
        let provider = Self::new();
        let now = Utc::now();
        {
            let mut accounts = provider.accounts();
            for (email, password) in DEMO_ACCOUNTS {
                if let Ok(email) = Email::parse(email) {
                    accounts.insert(
                        email,
                        Account {
                            uid: format!("demo-{}", Uuid::new_v4()),
                            password: SecretString::from(password),
                            created_at: now,
                        },
                    );
                }
            }
        }
        provider
    }

    /// Make every subsequent call fail with [`AuthError::Unavailable`], or
    /// recover from that.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Push an identity change that no local operation started, such as a
    /// session restored or revoked elsewhere.
    pub fn push_external(&self, identity: Option<Identity>) {
        self.current.send_replace(identity);
    }

    /// The identity the provider currently considers signed in.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<Email, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), AuthError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("network request failed".to_string()));
        }
        Ok(())
    }

    fn signed_in(&self, uid: &str, email: &Email, created_at: DateTime<Utc>) -> Identity {
        let identity = Identity {
            uid: uid.to_string(),
            email: email.clone(),
            metadata: IdentityMetadata {
                created_at,
                last_sign_in_at: Utc::now(),
            },
        };
        self.current.send_replace(Some(identity.clone()));
        identity
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        self.check_available()?;

        let (uid, created_at) = {
            let accounts = self.accounts();
            let account = accounts
                .get(email)
                .filter(|account| {
                    account.password.expose_secret() == password.expose_secret()
                })
                .ok_or(AuthError::InvalidCredentials)?;
            (account.uid.clone(), account.created_at)
        };

        tracing::debug!(uid = %uid, "In-memory sign-in");
        Ok(self.signed_in(&uid, email, created_at))
    }

    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        self.check_available()?;

        let length = password.expose_secret().chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let uid = Uuid::new_v4().to_string();
        let now = Utc::now();
        {
            let mut accounts = self.accounts();
            if accounts.contains_key(email) {
                return Err(AuthError::UserAlreadyExists);
            }
            accounts.insert(
                email.clone(),
                Account {
                    uid: uid.clone(),
                    password: SecretString::from(password.expose_secret()),
                    created_at: now,
                },
            );
        }

        tracing::debug!(uid = %uid, "In-memory sign-up");
        Ok(self.signed_in(&uid, email, now))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.check_available()?;
        self.current.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
