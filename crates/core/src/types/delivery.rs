//! Where a delivery order goes on campus.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`DeliveryInfo`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryInfoError {
    /// A field is empty after trimming.
    #[error("delivery {0} cannot be empty")]
    Blank(&'static str),
}

/// Classroom, roll number and preferred time for a delivery.
///
/// All three are required and stored trimmed.
///
/// ```
/// use yrush_core::DeliveryInfo;
///
/// let info = DeliveryInfo::new(" CSE-B ", "42", "After 3rd period").unwrap();
/// assert_eq!(info.class(), "CSE-B");
/// assert!(DeliveryInfo::new("CSE-B", "", "12:30 PM").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDeliveryInfo")]
pub struct DeliveryInfo {
    class: String,
    roll: String,
    time: String,
}

impl DeliveryInfo {
    /// Build delivery details from form input.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryInfoError::Blank` naming the first empty field.
    pub fn new(class: &str, roll: &str, time: &str) -> Result<Self, DeliveryInfoError> {
        Ok(Self {
            class: required("class", class)?,
            roll: required("roll", roll)?,
            time: required("time", time)?,
        })
    }

    /// Classroom or section to deliver to.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Student roll number.
    #[must_use]
    pub fn roll(&self) -> &str {
        &self.roll
    }

    /// Preferred delivery time, free text.
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DeliveryInfoError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeliveryInfoError::Blank(field));
    }
    Ok(value.to_owned())
}

#[derive(Deserialize)]
struct RawDeliveryInfo {
    class: String,
    roll: String,
    time: String,
}

impl TryFrom<RawDeliveryInfo> for DeliveryInfo {
    type Error = DeliveryInfoError;

    fn try_from(raw: RawDeliveryInfo) -> Result<Self, Self::Error> {
        Self::new(&raw.class, &raw.roll, &raw.time)
    }
}
