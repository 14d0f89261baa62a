//! Session-related types.
//!
//! Types stored in the session scope for authentication state.

use serde::{Deserialize, Serialize};

use yrush_core::{AccountType, Email};

use super::User;

/// Session-stored user identity.
///
/// The public fields of a [`User`]; the password digest is never copied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account email.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Owner or student.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Course of study.
    pub course: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            account_type: user.account_type,
            course: user.course.clone(),
        }
    }
}

impl CurrentUser {
    /// Whether this identity belongs to the shop owner.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.account_type == AccountType::Owner
    }
}
