//! Stored account record.

use serde::{Deserialize, Serialize};

use yrush_core::{AccountType, Email, PasswordDigest};

/// An account in the durable user list.
///
/// Only the password digest is persisted, never the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Owner or student.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Course of study (`NA` for staff).
    pub course: String,
    /// Demo-grade password digest.
    #[serde(rename = "passHash")]
    pub password_digest: PasswordDigest,
}
