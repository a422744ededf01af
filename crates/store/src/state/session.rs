//! Session slice: who is signed in, plus the explicit-operation overlay.

use serde::Serialize;
use shopmall_core::Identity;

use crate::action::SessionAction;

/// Coarse view of the session for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No identity, nothing in flight.
    Anonymous,
    /// A sign-in or sign-up is in flight.
    Pending,
    /// An identity is present and nothing is in flight.
    Authenticated,
}

/// Identity plus the loading/error overlay of explicit credential operations.
///
/// The loading flag counts locally started sign-ins and sign-ups that have
/// not settled, so overlapping operations keep it set until the last one
/// finishes. `error` belongs to the most recent failure. Both are
/// independent of `identity`, which provider push events may overwrite at
/// any moment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    identity: Option<Identity>,
    in_flight: u32,
    error: Option<String>,
}

impl SessionState {
    /// The signed-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Whether a credential operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of credential operations that have not settled.
    #[must_use]
    pub const fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Message from the last failed credential operation.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pending wins over the identity: a sign-in started while already
    /// signed in still shows as pending.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.is_loading() {
            SessionStatus::Pending
        } else if self.identity.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// Apply a session action, returning the next state.
    #[must_use]
    pub fn reduce(&self, action: SessionAction) -> Self {
        let mut next = self.clone();

        match action {
            SessionAction::CredentialRequested(_) => {
                next.in_flight = next.in_flight.saturating_add(1);
                next.error = None;
            }
            SessionAction::CredentialSucceeded(identity) => {
                next.identity = Some(identity);
                next.in_flight = next.in_flight.saturating_sub(1);
            }
            SessionAction::CredentialFailed(message) => {
                next.in_flight = next.in_flight.saturating_sub(1);
                next.error = Some(message);
            }
            SessionAction::CredentialAbandoned => {
                next.in_flight = next.in_flight.saturating_sub(1);
            }
            SessionAction::SignedOut => {
                next.identity = None;
                next.error = None;
            }
            SessionAction::ExternalIdentityChanged(identity) => next.identity = identity,
            SessionAction::ClearError => next.error = None,
        }

        next
    }
}
