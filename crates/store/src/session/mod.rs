//! Session bridge between an identity provider and the session slice.
//!
//! Two independent paths write the session slice:
//!
//! - explicit operations ([`SessionBridge::sign_in`], [`SessionBridge::sign_up`],
//!   [`SessionBridge::sign_out`]) drive the `loading`/`error` overlay and,
//!   on success, the identity
//! - provider push events ([`SessionBridge::on_external_identity_change`])
//!   overwrite the identity and nothing else
//!
//! Both are plain dispatches, so whichever is applied last decides the
//! identity.

mod error;
mod memory;

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use shopmall_core::{Email, Identity};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;

pub use error::AuthError;
pub use memory::{DEMO_ACCOUNTS, InMemoryIdentityProvider, MIN_PASSWORD_LENGTH};

use crate::action::{CredentialOperation, SessionAction};
use crate::store::Store;
use crate::telemetry;

/// A remote identity service.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authenticate an existing account.
    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Create an account and authenticate it.
    fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// End the provider-side session.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Receiver reporting the provider's current identity whenever it changes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Drives credential operations and provider pushes through the store.
pub struct SessionBridge<P> {
    store: Store,
    provider: Arc<P>,
}

impl<P> Clone for SessionBridge<P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> std::fmt::Debug for SessionBridge<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBridge")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<P: IdentityProvider> SessionBridge<P> {
    /// Create a bridge dispatching into `store`.
    #[must_use]
    pub fn new(store: Store, provider: P) -> Self {
        Self {
            store,
            provider: Arc::new(provider),
        }
    }

    /// The store this bridge dispatches into.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sign in with email and password.
    ///
    /// Failures are recorded in the session slice; the identity is left
    /// as it was. Returns the identity on success. Dropping the future
    /// before the provider answers only settles the loading flag.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Option<Identity> {
        self.credential(CredentialOperation::SignIn, email, password)
            .await
    }

    /// Create an account and sign in with it.
    ///
    /// Same lifecycle as [`Self::sign_in`].
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &SecretString) -> Option<Identity> {
        self.credential(CredentialOperation::SignUp, email, password)
            .await
    }

    /// Sign out locally, telling the provider on a best-effort basis.
    ///
    /// The identity is cleared even when the provider call fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed, signing out locally");
        }

        self.store.dispatch(SessionAction::SignedOut);
        telemetry::clear_sentry_user();
    }

    /// Record an identity pushed by the provider.
    ///
    /// Only the identity changes; an in-flight operation keeps its loading
    /// flag and the last error stays visible.
    pub fn on_external_identity_change(&self, identity: Option<Identity>) {
        tracing::debug!(
            signed_in = identity.is_some(),
            "External identity change"
        );
        telemetry::sync_sentry_user(identity.as_ref());
        self.store
            .dispatch(SessionAction::ExternalIdentityChanged(identity));
    }

    /// Forget the last credential error.
    pub fn clear_error(&self) {
        self.store.dispatch(SessionAction::ClearError);
    }

    /// Forward provider pushes into the store in a background task.
    ///
    /// The provider's current value is forwarded first, then every change,
    /// until the provider's channel closes or the returned handle is aborted.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn attach(&self) -> JoinHandle<()> {
        let bridge = self.clone();
        let mut rx = self.provider.subscribe();

        tokio::spawn(async move {
            let initial = rx.borrow_and_update().clone();
            bridge.on_external_identity_change(initial);

            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                bridge.on_external_identity_change(identity);
            }

            tracing::debug!("Identity provider closed, push forwarding stopped");
        })
    }

    async fn credential(
        &self,
        operation: CredentialOperation,
        email: &str,
        password: &SecretString,
    ) -> Option<Identity> {
        let pending = self.store.begin(
            SessionAction::CredentialRequested(operation),
            SessionAction::CredentialAbandoned,
        );

        let result = match Email::parse(email) {
            Ok(email) => match operation {
                CredentialOperation::SignIn => self.provider.sign_in(&email, password).await,
                CredentialOperation::SignUp => self.provider.sign_up(&email, password).await,
            },
            Err(e) => Err(AuthError::from(e)),
        };

        match result {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, ?operation, "Credential operation succeeded");
                telemetry::set_sentry_user(&identity);
                pending.settle(SessionAction::CredentialSucceeded(identity.clone()));
                Some(identity)
            }
            Err(e) => {
                tracing::warn!(error = %e, ?operation, "Credential operation failed");
                pending.settle(SessionAction::CredentialFailed(e.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::selectors;
    use crate::state::SessionStatus;

    fn bridge() -> SessionBridge<InMemoryIdentityProvider> {
        SessionBridge::new(Store::new(), InMemoryIdentityProvider::with_demo_accounts())
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let bridge = bridge();
        let identity = bridge
            .sign_in("admin@gmail.com", &secret("0000"))
            .await
            .unwrap();

        let state = bridge.store().state();
        assert_eq!(state.session.identity(), Some(&identity));
        assert_eq!(selectors::session_status(&state), SessionStatus::Authenticated);
        assert_eq!(state.session.error(), None);
    }

    #[tokio::test]
    async fn test_sign_in_failure_records_error() {
        let bridge = bridge();
        assert!(bridge.sign_in("admin@gmail.com", &secret("nope")).await.is_none());

        let state = bridge.store().state();
        assert!(state.session.identity().is_none());
        assert!(!state.session.is_loading());
        assert_eq!(state.session.error(), Some("invalid email or password"));
    }

    #[tokio::test]
    async fn test_invalid_email_fails_without_provider() {
        let bridge = bridge();
        assert!(bridge.sign_up("not-an-email", &secret("longpass")).await.is_none());
        assert_eq!(
            bridge.store().state().session.error(),
            Some("invalid email: email must contain an @ symbol")
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_provider_fails() {
        let bridge = bridge();
        bridge.sign_in("test@test.com", &secret("test123")).await.unwrap();
        bridge.provider().set_unavailable(true);

        bridge.sign_out().await;

        let state = bridge.store().state();
        assert!(state.session.identity().is_none());
        assert_eq!(state.session.error(), None);
    }

    #[tokio::test]
    async fn test_external_change_only_touches_identity() {
        let bridge = bridge();
        bridge.sign_in("admin@gmail.com", &secret("bad")).await;
        let pushed = Identity::new("ext-1", Email::parse("ext@shop.dev").unwrap(), Utc::now());

        bridge.on_external_identity_change(Some(pushed.clone()));

        let state = bridge.store().state();
        assert_eq!(state.session.identity(), Some(&pushed));
        assert_eq!(state.session.error(), Some("invalid email or password"));
        assert!(!state.session.is_loading());
    }

    #[tokio::test]
    async fn test_attach_forwards_pushes() {
        let bridge = bridge();
        let handle = bridge.attach();

        let pushed = Identity::new("ext-2", Email::parse("push@shop.dev").unwrap(), Utc::now());
        bridge.provider().push_external(Some(pushed.clone()));

        for _ in 0..100 {
            if bridge.store().state().session.identity().is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(bridge.store().state().session.identity(), Some(&pushed));

        handle.abort();
    }
}
