//! Credential commands against the demo identity provider.
//!
//! # Usage
//!
//! ```bash
//! shopmall sign-in -e test@test.com -p test123
//! shopmall sign-up -e new@shop.dev -p hunter22
//! ```

use clap::Args;
use secrecy::SecretString;

use super::{CommandError, Context, print_session};

/// Email and password flags shared by the credential commands.
#[derive(Args)]
pub struct Credentials {
    /// Account email address
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

impl Credentials {
    fn secret(&self) -> SecretString {
        SecretString::from(self.password.as_str())
    }
}

/// Sign in and print the resulting session.
///
/// # Errors
///
/// Returns [`CommandError::Auth`] with the recorded session error.
pub async fn sign_in(ctx: &Context, credentials: &Credentials) -> Result<(), CommandError> {
    let identity = ctx
        .session
        .sign_in(&credentials.email, &credentials.secret())
        .await;
    finish(ctx, identity.is_some())
}

/// Create an account and print the resulting session.
///
/// # Errors
///
/// Returns [`CommandError::Auth`] with the recorded session error.
pub async fn sign_up(ctx: &Context, credentials: &Credentials) -> Result<(), CommandError> {
    let identity = ctx
        .session
        .sign_up(&credentials.email, &credentials.secret())
        .await;
    finish(ctx, identity.is_some())
}

fn finish(ctx: &Context, succeeded: bool) -> Result<(), CommandError> {
    let state = ctx.store.state();
    print_session(&state);

    if succeeded {
        return Ok(());
    }
    Err(CommandError::Auth(
        state
            .session
            .error()
            .unwrap_or("no identity returned")
            .to_string(),
    ))
}
