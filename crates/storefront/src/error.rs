//! Unified error handling with Sentry integration.
//!
//! Layer APIs degrade quietly where the shop is expected to keep going
//! (storage fallbacks, unknown cart ids). `AppError` covers the operations
//! that do have a user-visible failure, and keeps internal detail out of the
//! message shown to the user.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::services::{AuthError, AuthRejection, OrderError};
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::RedirectToLogin { location } => Self::Unauthorized(location),
        }
    }
}

impl AppError {
    /// Message safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal error".to_string(),
            Self::Catalog(_) => "Catalog unavailable".to_string(),
            Self::Config(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                    "Invalid email or password".to_string()
                }
                AuthError::PasswordHash => "Authentication error".to_string(),
            },
            Self::Order(OrderError::EmptyCart) => "Your cart is empty".to_string(),
            Self::Order(OrderError::NotRecorded(StorageError::QuotaExceeded { .. })) => {
                "Storage is full, the order was not placed and your cart was kept".to_string()
            }
            Self::Order(OrderError::NotRecorded(_)) => {
                "The order could not be saved, your cart was kept".to_string()
            }
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(location) => format!("Please sign in ({location})"),
            Self::Forbidden(reason) => format!("Not allowed: {reason}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Whether this error indicates a fault rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Order(OrderError::NotRecorded(_))
                | Self::Catalog(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::PasswordHash)
        )
    }

    /// Log the error, capturing faults to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in shopper.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
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

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("DRAW-SHEET-999".to_string());
        assert_eq!(err.to_string(), "Not found: DRAW-SHEET-999");

        let err = AppError::BadRequest("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be a number");
    }

    #[test]
    fn test_auth_messages_do_not_leak_which_part_failed() {
        let wrong_password = AppError::from(AuthError::InvalidCredentials);
        let bad_email = AppError::from(AuthError::InvalidEmail(yrush_core::EmailError::MissingAtSymbol));
        assert_eq!(wrong_password.user_message(), "Invalid email or password");
        assert_eq!(bad_email.user_message(), wrong_password.user_message());
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err = AppError::from(OrderError::NotRecorded(StorageError::Unavailable(
            "/var/data: permission denied".to_string(),
        )));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("/var/data"));
        assert_eq!(err.user_message(), "The order could not be saved, your cart was kept");

        let err = AppError::from(OrderError::NotRecorded(StorageError::QuotaExceeded {
            key: "yrush_orders".to_string(),
            needed: 10,
            quota: 5,
        }));
        assert!(err.is_internal());
        assert_eq!(
            err.user_message(),
            "Storage is full, the order was not placed and your cart was kept"
        );
    }

    #[test]
    fn test_bad_request_shown_verbatim() {
        let err = AppError::BadRequest("delivery roll cannot be empty".to_string());
        assert!(!err.is_internal());
        assert_eq!(err.user_message(), "delivery roll cannot be empty");
    }

    #[test]
    fn test_rejection_becomes_unauthorized() {
        let err = AppError::from(AuthRejection::RedirectToLogin {
            location: "login.html".to_string(),
        });
        assert!(matches!(&err, AppError::Unauthorized(l) if l == "login.html"));
        assert!(!err.is_internal());
        assert_eq!(err.user_message(), "Please sign in (login.html)");
    }

    #[test]
    fn test_empty_cart_message() {
        assert_eq!(
            AppError::from(OrderError::EmptyCart).user_message(),
            "Your cart is empty"
        );
    }
}
