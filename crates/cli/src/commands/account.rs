//! Account and session commands.

use secrecy::SecretString;
use tracing::info;

use yrush_storefront::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use yrush_storefront::services::SeedOutcome;
use yrush_storefront::{AppError, Storefront};

/// Seed the demo accounts and list what exists.
///
/// # Errors
///
/// Returns `AppError::Auth` if a digest cannot be computed.
pub async fn seed(shop: &Storefront) -> Result<(), AppError> {
    match shop.auth().seed_users().await? {
        SeedOutcome::Seeded => info!("Demo accounts created"),
        SeedOutcome::AlreadySeeded => info!("Accounts already exist, nothing to do"),
        SeedOutcome::NotPersisted => {
            return Err(AppError::Internal("demo accounts could not be stored".to_string()));
        }
    }

    for user in shop.auth().users() {
        info!("{:<24} {:<8} {}", user.email, user.account_type, user.name);
    }
    Ok(())
}

/// Sign in, seeding the demo accounts first if needed.
///
/// # Errors
///
/// Returns `AppError::Auth` on bad credentials.
pub async fn login(shop: &Storefront, email: &str, password: SecretString) -> Result<(), AppError> {
    let auth = shop.auth();
    auth.seed_users().await?;

    let current = auth.login(email, &password).await?;
    let account_type = current.account_type.to_string();
    set_sentry_user(current.email.as_str());
    add_breadcrumb("auth", "Signed in", Some(&[("account_type", account_type.as_str())]));
    info!("Welcome, {} ({})", current.name, current.account_type);
    Ok(())
}

/// Print the signed-in account.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when nobody is signed in.
pub fn whoami(shop: &Storefront) -> Result<(), AppError> {
    let current = shop.auth().require_auth()?;
    info!(
        "{} <{}>, {} ({})",
        current.name, current.email, current.account_type, current.course
    );
    Ok(())
}

/// Sign out.
pub fn logout(shop: &Storefront) {
    shop.auth().sign_out();
    clear_sentry_user();
    info!("Signed out");
}
