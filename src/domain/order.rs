use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Payment lifecycle of an order. Orders start out `Pending`; the payment
/// provider's reconciliation callback moves them forward through the store's
/// update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// How the checkout session collects payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "CARD"),
        }
    }
}

/// An order header. The derived `amount` is the sum of the item prices
/// captured at creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a new order header.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

/// Payload for patching an order after creation.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub payment_status: Option<PaymentStatus>,
}

/// One line of an order: a book at the price it had when the order was
/// placed. Owned by the order header; immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub book_id: String,
    pub price: f64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting an order line.
#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub order_id: String,
    pub book_id: String,
    pub price: f64,
    pub quantity: u32,
}

/// Response to a successful order placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub payment_url: String,
}
