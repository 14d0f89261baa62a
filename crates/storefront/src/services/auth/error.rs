//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] yrush_core::EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The digest task failed to complete.
    #[error("password hashing error")]
    PasswordHash,
}

/// Returned by [`super::AuthService::require_auth`] when nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// Send the user to the login view.
    #[error("sign in required, redirecting to {location}")]
    RedirectToLogin {
        /// Configured login location.
        location: String,
    },
}
