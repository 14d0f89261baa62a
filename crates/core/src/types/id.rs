//! Newtype identifiers for type-safe entity references.
//!
//! Use the `define_id!` macro to create string-backed ID wrappers that prevent
//! accidentally mixing identifiers from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]` (usable as a JSON map key)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use yrush_core::define_id;
/// define_id!(SkuId);
/// define_id!(ShelfId);
///
/// let sku = SkuId::new("DRAW-SHEET-001");
/// let shelf = ShelfId::new("A1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = shelf;
/// assert_eq!(sku.as_str(), "DRAW-SHEET-001");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);

/// Errors that can occur when parsing an [`OrderToken`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The input is not exactly six characters long.
    #[error("order token must be exactly 6 digits (got {0} characters)")]
    WrongLength(usize),
    /// The input contains something other than ASCII digits.
    #[error("order token must contain only digits")]
    NotNumeric,
    /// The input starts with a zero, which is outside 100000..=999999.
    #[error("order token cannot start with 0")]
    LeadingZero,
}

/// A six-digit order confirmation token.
///
/// Tokens are drawn independently at random, so two orders can share one.
/// The value is always in `100000..=999999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderToken(u32);

impl OrderToken {
    /// Smallest valid token.
    pub const MIN: u32 = 100_000;
    /// Largest valid token.
    pub const MAX: u32 = 999_999;
    /// The token with value [`OrderToken::MIN`].
    pub const FIRST: Self = Self(Self::MIN);

    /// Build a token from a number, or `None` if it has the wrong width.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Parse a token from its six-digit string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not six ASCII digits or starts with `0`.
    pub fn parse(s: &str) -> Result<Self, TokenError> {
        if s.len() != 6 {
            return Err(TokenError::WrongLength(s.chars().count()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::NotNumeric);
        }
        if s.starts_with('0') {
            return Err(TokenError::LeadingZero);
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| TokenError::NotNumeric)
    }

    /// The numeric value of the token.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderToken {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderToken> for String {
    fn from(token: OrderToken) -> Self {
        token.to_string()
    }
}
