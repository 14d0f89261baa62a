//! Order ledger records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yrush_core::{DeliveryInfo, Email, FulfillmentMethod, OrderToken, PaymentMethod, Price};

use super::LineItem;

/// A placed order. Appended to the ledger and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Six-digit confirmation token (not guaranteed unique).
    pub token: OrderToken,
    /// When checkout completed.
    pub placed_at: DateTime<Utc>,
    /// Who placed it.
    pub customer: Email,
    /// Priced lines at checkout time.
    pub lines: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: Price,
    /// Delivery fee (zero for pickup).
    pub delivery_fee: Price,
    /// Subtotal plus delivery fee.
    pub total: Price,
    /// Pickup or delivery.
    pub fulfillment: FulfillmentMethod,
    /// Where to deliver. Present exactly when `fulfillment` is delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryInfo>,
    /// Cash or UPI.
    pub payment: PaymentMethod,
}

/// How a checkout is handed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fulfillment {
    /// Collected at the counter.
    Pickup,
    /// Brought to the student's class.
    Delivery(DeliveryInfo),
}

impl Fulfillment {
    /// The method without its details.
    #[must_use]
    pub const fn method(&self) -> FulfillmentMethod {
        match self {
            Self::Pickup => FulfillmentMethod::Pickup,
            Self::Delivery(_) => FulfillmentMethod::Delivery,
        }
    }

    /// Delivery details, if any.
    #[must_use]
    pub fn into_delivery_info(self) -> Option<DeliveryInfo> {
        match self {
            Self::Pickup => None,
            Self::Delivery(info) => Some(info),
        }
    }
}

/// Ledger statistics for the owner's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSummary {
    /// Orders in the ledger.
    pub count: usize,
    /// Orders collected at the counter.
    pub pickup: usize,
    /// Orders delivered.
    pub delivery: usize,
    /// Sum of order totals.
    pub revenue: Price,
}
