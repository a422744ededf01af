//! Sentry integration for the store.
//!
//! All functions are no-ops until the host application initializes a
//! Sentry client, so the library can call them unconditionally.

use shopmall_core::Identity;

/// Associate subsequent Sentry events with a signed-in identity.
pub fn set_sentry_user(identity: &Identity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(identity.uid.clone()),
            email: Some(identity.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Follow the session identity: set the user when present, clear it otherwise.
pub fn sync_sentry_user(identity: Option<&Identity>) {
    match identity {
        Some(identity) => set_sentry_user(identity),
        None => clear_sentry_user(),
    }
}

/// Leave a breadcrumb in the Sentry trail.
///
/// The store records every applied action under the `store` category with
/// the action's stable name (`cart/add_item`, `session/credential_failed`,
/// ...) as the message, so an error report shows the dispatches that led up
/// to it. Flows such as checkout add their own category and key/value data.
///
/// # Example
///
/// ```rust
/// shopmall_store::telemetry::add_breadcrumb("store", "catalog/select_category", None);
/// shopmall_store::telemetry::add_breadcrumb(
///     "checkout",
///     "checkout confirmed",
///     Some(&[("items", "3"), ("total", "$38.97")]),
/// );
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| ((*key).to_owned(), serde_json::Value::from(*value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        ty: "default".into(),
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}
