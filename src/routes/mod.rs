mod diagnostics;
mod health_check;
mod home;
mod not_found;
mod send_updates;
mod stats;
mod subscriptions;
mod unsubscribe;

pub use diagnostics::{test_db, test_github};
pub use health_check::health_check;
pub use home::home;
pub use not_found::{not_found, AVAILABLE_ROUTES};
pub use send_updates::send_updates;
pub use stats::stats;
pub use subscriptions::{handle_signup, signup_body_error};
pub use unsubscribe::{handle_unsubscribe, unsubscribe_body_error};

/// Formats an error followed by every cause in its source chain.
pub fn error_chain_fmt(
    err: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}", err)?;

    let mut current = err.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
