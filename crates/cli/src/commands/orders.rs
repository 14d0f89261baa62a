//! Checkout and order history.

use tracing::info;

use yrush_core::{DeliveryInfo, PaymentMethod};
use yrush_storefront::error::add_breadcrumb;
use yrush_storefront::models::{Fulfillment, Order};
use yrush_storefront::{AppError, Storefront};

/// Delivery flags as given on the command line.
pub struct DeliveryArgs {
    /// `--class`
    pub class: Option<String>,
    /// `--roll`
    pub roll: Option<String>,
    /// `--time`
    pub time: Option<String>,
}

impl DeliveryArgs {
    /// Validate the flags into a delivery fulfillment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if any field is missing or blank.
    pub fn into_fulfillment(self) -> Result<Fulfillment, AppError> {
        DeliveryInfo::new(
            self.class.as_deref().unwrap_or_default(),
            self.roll.as_deref().unwrap_or_default(),
            self.time.as_deref().unwrap_or_default(),
        )
            .map(Fulfillment::Delivery)
            .map_err(|e| AppError::BadRequest(format!("Please fill all delivery fields: {e}")))
    }
}

/// Place an order for the current cart.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when nobody is signed in and
/// `AppError::Order` for an empty cart or a failed ledger write.
pub fn checkout(
    shop: &Storefront,
    fulfillment: Fulfillment,
    payment: PaymentMethod,
) -> Result<(), AppError> {
    let current = shop.auth().require_auth()?;
    let order = shop.orders().place_order(&current, fulfillment, payment)?;
    let token = order.token.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("token", token.as_str())]));

    info!("Order confirmed. Token: {}", order.token);
    if !order.delivery_fee.is_zero() {
        info!("Delivery fee: {}", order.delivery_fee.display());
    }
    if let Some(info) = &order.delivery {
        info!("Deliver to {} (roll {}) at {}", info.class(), info.roll(), info.time());
    }
    info!("Total: {} ({}, {})", order.total.display(), order.fulfillment, order.payment);
    Ok(())
}

/// List orders. Owners see every order unless `mine` is set.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when nobody is signed in.
pub fn list(shop: &Storefront, mine: bool) -> Result<(), AppError> {
    let current = shop.auth().require_auth()?;
    let orders = if mine || !current.is_owner() {
        shop.orders().orders_for(&current.email)
    } else {
        shop.orders().orders()
    };

    if orders.is_empty() {
        info!("No orders yet");
        return Ok(());
    }
    for order in &orders {
        print_order(order);
    }
    Ok(())
}

/// Owner dashboard counts.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when nobody is signed in and
/// `AppError::Forbidden` for a student account.
pub fn summary(shop: &Storefront) -> Result<(), AppError> {
    let current = shop.auth().require_auth()?;
    if !current.is_owner() {
        return Err(AppError::Forbidden("owner account required".to_string()));
    }

    let summary = shop.orders().summary();
    info!("Orders:   {}", summary.count);
    info!("Pickup:   {}", summary.pickup);
    info!("Delivery: {}", summary.delivery);
    info!("Revenue:  {}", summary.revenue.display());
    Ok(())
}

fn print_order(order: &Order) {
    info!(
        "#{} {} {} {:>10} {}/{} ({} lines)",
        order.token,
        order.placed_at.format("%Y-%m-%d %H:%M"),
        order.customer,
        order.total.display(),
        order.fulfillment,
        order.payment,
        order.lines.len()
    );
}
