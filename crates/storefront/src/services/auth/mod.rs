//! Authentication service.
//!
//! Seeds the demo accounts, checks passwords against stored digests and
//! tracks who is signed in for the current session.
//!
//! Session state machine: `anonymous -> authenticated` on a digest match,
//! `authenticated -> anonymous` on sign-out or when the session scope is
//! discarded. There is no expiry and no refresh.
//!
//! See [`digest`] for why none of this is production authentication.

pub mod digest;
mod error;

pub use error::{AuthError, AuthRejection};

use secrecy::SecretString;

use yrush_core::{AccountType, Email};

use crate::models::{CurrentUser, User};
use crate::storage::{JsonStore, keys};

use digest::digest_password;

/// Fixed demo account created by [`AuthService::seed_users`].
struct DemoAccount {
    email: &'static str,
    name: &'static str,
    account_type: AccountType,
    course: &'static str,
    password: &'static str,
}

const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "owner@yrush.local",
        name: "YRush Owner",
        account_type: AccountType::Owner,
        course: "NA",
        password: "admin123",
    },
    DemoAccount {
        email: "student@yrush.local",
        name: "YRush Student",
        account_type: AccountType::Student,
        course: "CSE",
        password: "student123",
    },
];

/// What [`AuthService::seed_users`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Accounts already existed; nothing was written.
    AlreadySeeded,
    /// The demo accounts were written.
    Seeded,
    /// The demo accounts were built but the write failed (logged).
    NotPersisted,
}

/// Authentication service.
///
/// Reads the user list from the durable scope and keeps the signed-in
/// identity in the session scope.
pub struct AuthService<'a> {
    durable: &'a JsonStore,
    session: &'a JsonStore,
    login_path: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(durable: &'a JsonStore, session: &'a JsonStore, login_path: &'a str) -> Self {
        Self {
            durable,
            session,
            login_path,
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Stored accounts (empty if none or if the list is unreadable).
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.durable.read(keys::USERS, Vec::new()).into_value()
    }

    /// Create the two demo accounts if no account exists yet.
    ///
    /// Idempotent: any non-empty JSON array under the users key is left
    /// alone, even if its entries are not valid accounts. Only a missing or
    /// empty list, or a value that is not a JSON array, is replaced.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if a digest cannot be computed.
    pub async fn seed_users(&self) -> Result<SeedOutcome, AuthError> {
        let existing = self
            .durable
            .read::<Vec<serde_json::Value>>(keys::USERS, Vec::new());
        if !existing.value().is_empty() {
            return Ok(SeedOutcome::AlreadySeeded);
        }
        if existing.is_corrupt() {
            tracing::warn!("Stored user list is unreadable, reseeding demo accounts");
        }

        let mut users = Vec::with_capacity(DEMO_ACCOUNTS.len());
        for account in &DEMO_ACCOUNTS {
            let password = SecretString::from(account.password);
            users.push(User {
                email: Email::parse(account.email)?,
                name: account.name.to_string(),
                account_type: account.account_type,
                course: account.course.to_string(),
                password_digest: digest_password(&password).await?,
            });
        }

        if !self.durable.write(keys::USERS, &users) {
            return Ok(SeedOutcome::NotPersisted);
        }
        tracing::info!(accounts = users.len(), "Seeded demo accounts");
        Ok(SeedOutcome::Seeded)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Check an email/password pair against the stored digests.
    ///
    /// Does not touch the session; see [`AuthService::login`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed, and
    /// `AuthError::InvalidCredentials` for an unknown account or a wrong
    /// password.
    pub async fn authenticate(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users().into_iter().find(|u| u.email == email) else {
            tracing::warn!(email = %email, "Login failed: unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        let supplied = digest_password(password).await?;
        if !user.password_digest.matches(&supplied) {
            tracing::warn!(email = %email, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Authenticate and, on success, start a session for the user.
    ///
    /// # Errors
    ///
    /// As [`AuthService::authenticate`]. A failed login leaves any existing
    /// session untouched.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<CurrentUser, AuthError> {
        let user = self.authenticate(email, password).await?;
        let current = self.set_current_user(&user);
        tracing::info!(email = %current.email, account_type = %current.account_type, "Signed in");
        Ok(current)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Record `user` as the session identity, public fields only.
    pub fn set_current_user(&self, user: &User) -> CurrentUser {
        let current = CurrentUser::from(user);
        self.session.write(keys::CURRENT_USER, &current);
        current
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.session
            .read::<Option<CurrentUser>>(keys::CURRENT_USER, None)
            .into_value()
    }

    /// Guard for views that need a signed-in user.
    ///
    /// This is a navigation guard only; nothing enforces it elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `AuthRejection::RedirectToLogin` when nobody is signed in.
    pub fn require_auth(&self) -> Result<CurrentUser, AuthRejection> {
        self.current_user()
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                location: self.login_path.to_string(),
            })
    }

    /// End the session.
    pub fn sign_out(&self) {
        if let Some(current) = self.current_user() {
            tracing::info!(email = %current.email, "Signed out");
        }
        self.session.remove(keys::CURRENT_USER);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Scope, StorageBackend};

    struct Stores {
        durable: JsonStore,
        session: JsonStore,
    }

    impl Stores {
        fn new() -> Self {
            Self {
                durable: JsonStore::new(MemoryStorage::new(), Scope::Durable),
                session: JsonStore::new(MemoryStorage::new(), Scope::Session),
            }
        }

        fn auth(&self) -> AuthService<'_> {
            AuthService::new(&self.durable, &self.session, "login.html")
        }
    }

    fn password(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[tokio::test]
    async fn test_seed_creates_two_accounts() {
        let stores = Stores::new();
        assert_eq!(stores.auth().seed_users().await.unwrap(), SeedOutcome::Seeded);

        let users = stores.auth().users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email.as_str(), "owner@yrush.local");
        assert_eq!(users[0].account_type, AccountType::Owner);
        assert_eq!(users[1].course, "CSE");
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let stores = Stores::new();
        stores.auth().seed_users().await.unwrap();
        let before = stores.auth().users();

        assert_eq!(
            stores.auth().seed_users().await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
        assert_eq!(stores.auth().users(), before);
    }

    #[tokio::test]
    async fn test_seed_never_overwrites_existing_users() {
        let stores = Stores::new();
        let custom = User {
            email: Email::parse("clerk@yrush.local").unwrap(),
            name: "Counter Clerk".to_string(),
            account_type: AccountType::Owner,
            course: "NA".to_string(),
            password_digest: digest_password(&password("counter1")).await.unwrap(),
        };
        stores.durable.write(keys::USERS, &vec![custom.clone()]);

        assert_eq!(
            stores.auth().seed_users().await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
        assert_eq!(stores.auth().users(), vec![custom]);
    }

    #[tokio::test]
    async fn test_seed_replaces_unparseable_list() {
        let durable = MemoryStorage::new();
        durable.set_item(keys::USERS, "[{\"email\":").unwrap();
        let stores = Stores {
            durable: JsonStore::new(durable, Scope::Durable),
            session: JsonStore::new(MemoryStorage::new(), Scope::Session),
        };

        assert_eq!(stores.auth().seed_users().await.unwrap(), SeedOutcome::Seeded);
        assert_eq!(stores.auth().users().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_keeps_nonconforming_list() {
        let raw = r#"[{"email":"admin@shop.com","name":"Admin","type":"admin","passHash":"x"}]"#;
        let durable = std::sync::Arc::new(MemoryStorage::new());
        durable.set_item(keys::USERS, raw).unwrap();
        let store = JsonStore::from_shared(durable.clone(), Scope::Durable);
        let session = JsonStore::new(MemoryStorage::new(), Scope::Session);
        let auth = AuthService::new(&store, &session, "login.html");

        assert_eq!(auth.seed_users().await.unwrap(), SeedOutcome::AlreadySeeded);
        assert_eq!(durable.get_item(keys::USERS).unwrap().as_deref(), Some(raw));
        assert!(auth.users().is_empty());
    }

    #[tokio::test]
    async fn test_stored_users_hold_no_plaintext() {
        let durable = std::sync::Arc::new(MemoryStorage::new());
        let store = JsonStore::from_shared(durable.clone(), Scope::Durable);
        let session = JsonStore::new(MemoryStorage::new(), Scope::Session);
        AuthService::new(&store, &session, "login.html")
            .seed_users()
            .await
            .unwrap();

        let raw = durable.get_item(keys::USERS).unwrap().unwrap();
        assert!(!raw.contains("admin123"));
        assert!(!raw.contains("student123"));
        assert!(raw.contains("passHash"));
    }

    #[tokio::test]
    async fn test_authenticate_success_and_failures() {
        let stores = Stores::new();
        stores.auth().seed_users().await.unwrap();

        let user = stores
            .auth()
            .authenticate("student@yrush.local", &password("student123"))
            .await
            .unwrap();
        assert_eq!(user.name, "YRush Student");

        assert!(matches!(
            stores
                .auth()
                .authenticate("student@yrush.local", &password("admin123"))
                .await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            stores
                .auth()
                .authenticate("ghost@yrush.local", &password("student123"))
                .await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            stores.auth().authenticate("ghost", &password("x")).await,
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_login_sets_session_without_hash() {
        let durable = JsonStore::new(MemoryStorage::new(), Scope::Durable);
        let session_backend = std::sync::Arc::new(MemoryStorage::new());
        let session = JsonStore::from_shared(session_backend.clone(), Scope::Session);
        let auth = AuthService::new(&durable, &session, "login.html");
        auth.seed_users().await.unwrap();

        let current = auth
            .login("owner@yrush.local", &password("admin123"))
            .await
            .unwrap();
        assert!(current.is_owner());
        assert_eq!(auth.require_auth().unwrap(), current);

        let raw = session_backend.get_item(keys::CURRENT_USER).unwrap().unwrap();
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let mut fields: Vec<&str> = record
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        fields.sort_unstable();
        assert_eq!(fields, vec!["course", "email", "name", "type"]);
    }

    #[tokio::test]
    async fn test_set_current_user_record_has_no_password_field() {
        let stores = Stores::new();
        let user = User {
            email: Email::parse("a@b.com").unwrap(),
            name: "A".to_string(),
            account_type: AccountType::Student,
            course: "CSE".to_string(),
            password_digest: digest_password(&password("pw")).await.unwrap(),
        };
        stores.auth().set_current_user(&user);

        let stored = stores
            .session
            .read::<serde_json::Value>(keys::CURRENT_USER, serde_json::Value::Null)
            .into_value();
        assert_eq!(stored["email"], "a@b.com");
        assert_eq!(stored["type"], "student");
        assert!(stored.get("passHash").is_none());
        assert!(stored.get("password").is_none());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let stores = Stores::new();
        stores.auth().seed_users().await.unwrap();
        stores
            .auth()
            .login("student@yrush.local", &password("student123"))
            .await
            .unwrap();

        assert!(
            stores
                .auth()
                .login("owner@yrush.local", &password("wrong"))
                .await
                .is_err()
        );
        let current = stores.auth().current_user().unwrap();
        assert_eq!(current.email.as_str(), "student@yrush.local");
    }

    #[test]
    fn test_require_auth_redirects_when_anonymous() {
        let stores = Stores::new();
        assert_eq!(
            stores.auth().require_auth(),
            Err(AuthRejection::RedirectToLogin {
                location: "login.html".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_anonymous() {
        let stores = Stores::new();
        stores.auth().seed_users().await.unwrap();
        stores
            .auth()
            .login("student@yrush.local", &password("student123"))
            .await
            .unwrap();

        stores.auth().sign_out();
        assert!(stores.auth().current_user().is_none());
        assert!(stores.auth().require_auth().is_err());
    }

    #[test]
    fn test_corrupt_session_reads_as_anonymous() {
        let session = MemoryStorage::new();
        session.set_item(keys::CURRENT_USER, "{}").unwrap();
        let stores = Stores {
            durable: JsonStore::new(MemoryStorage::new(), Scope::Durable),
            session: JsonStore::new(session, Scope::Session),
        };
        assert!(stores.auth().current_user().is_none());
    }
}
