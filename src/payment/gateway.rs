use std::collections::BTreeMap;

use serde::Serialize;

use crate::payment::error::PaymentError;

/// One priced entry submitted to the payment provider. `unit_amount` is in
/// minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything the provider needs to host a checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Opaque bag echoed back by the provider's webhook for reconciliation.
    pub metadata: BTreeMap<String, String>,
}

/// A created hosted-checkout session: the id the webhook will reference and
/// the URL the customer is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Seam to the external payment provider. Implementations validate the
/// request and return the hosted session handle.
pub trait CheckoutGateway: Send + 'static {
    fn create_session(&mut self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError>;
}

/// In-process stand-in for a hosted checkout provider. Hands out sequential
/// session ids under a configured base URL.
pub struct HostedCheckout {
    base_url: String,
    next_session: u64,
}

impl HostedCheckout {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            next_session: 1,
        }
    }
}

impl CheckoutGateway for HostedCheckout {
    fn create_session(&mut self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError> {
        if request.line_items.is_empty() {
            return Err(PaymentError::SessionRejected(
                "no line items".to_string(),
            ));
        }
        if let Some(item) = request
            .line_items
            .iter()
            .find(|item| item.unit_amount <= 0 || item.quantity == 0)
        {
            return Err(PaymentError::SessionRejected(format!(
                "invalid line item: {}",
                item.name
            )));
        }

        let id = format!("cs_{}", self.next_session);
        self.next_session += 1;
        let url = format!("{}/pay/{}", self.base_url.trim_end_matches('/'), id);
        Ok(CheckoutSession { id, url })
    }
}
