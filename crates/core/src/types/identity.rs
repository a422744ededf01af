//! Authenticated identity as reported by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;

/// Provider-side timestamps for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the current session was established.
    pub last_sign_in_at: DateTime<Utc>,
}

/// A signed-in user.
///
/// `uid` is opaque: it is only compared, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-issued identity reference.
    pub uid: String,
    /// Display email.
    pub email: Email,
    /// Session metadata.
    pub metadata: IdentityMetadata,
}

impl Identity {
    /// Create an identity whose account and session both start at `now`.
    #[must_use]
    pub fn new(uid: impl Into<String>, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            email,
            metadata: IdentityMetadata {
                created_at: now,
                last_sign_in_at: now,
            },
        }
    }
}
