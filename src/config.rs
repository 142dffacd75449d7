use std::env;

/// Checkout-flow configuration. Defaults are overridable from the
/// environment, mirroring how the tracing filter is configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// ISO currency code used for every checkout session.
    pub currency: String,
    /// Redirect target after a completed payment.
    pub success_url: String,
    /// Redirect target after an abandoned payment.
    pub cancel_url: String,
    /// Base URL under which hosted checkout pages live.
    pub checkout_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "usd".to_string(),
            success_url: "https://bookstore.example/payment/success".to_string(),
            cancel_url: "https://bookstore.example/payment/cancel".to_string(),
            checkout_base_url: "https://checkout.example.com".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var("CHECKOUT_CURRENCY") {
            config.currency = value;
        }
        if let Ok(value) = env::var("CHECKOUT_SUCCESS_URL") {
            config.success_url = value;
        }
        if let Ok(value) = env::var("CHECKOUT_CANCEL_URL") {
            config.cancel_url = value;
        }
        if let Ok(value) = env::var("CHECKOUT_BASE_URL") {
            config.checkout_base_url = value;
        }
        config
    }
}
