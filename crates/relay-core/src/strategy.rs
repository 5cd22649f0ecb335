//! # Gateway Strategy
//!
//! The `PaymentGateway` trait and the `FlowProfile` that configures one
//! run of the order flow.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 PaymentGateway (trait)                   │
//! │  ├── acquire_session_token()                             │
//! │  ├── submit_payment()                                    │
//! │  └── provider_name()                                     │
//! └──────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ NuveiGateway  │
//!                    └───────────────┘
//!
//!  FlowProfile ── checksum field set ── extraction mode ── defaults
//! ```

use crate::error::{RelayError, RelayResult};
use crate::order::{OrderDefaults, PaymentOrder, PaymentResult, RequestContext, SessionToken};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A payment gateway reachable through a session-token handshake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Obtain a single-use session token for this request context.
    ///
    /// Fails with `SessionAcquisitionFailed` when the gateway response
    /// carries no usable token.
    async fn acquire_session_token(&self, context: &RequestContext) -> RelayResult<SessionToken>;

    /// Submit the payment authorization signed with the given field set.
    ///
    /// Fails with `PaymentRejected` unless the gateway status is `SUCCESS`.
    /// Never retried.
    async fn submit_payment(
        &self,
        session: &SessionToken,
        order: &PaymentOrder,
        context: &RequestContext,
        checksum_fields: ChecksumFields,
        payment_method: &str,
    ) -> RelayResult<PaymentResult>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;

/// Which fields the payment checksum covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumFields {
    /// merchantId, merchantSiteId, clientRequestId, amount, currency, timeStamp, secret.
    /// Only for merchant sites configured without user tokens.
    Standard,
    /// Standard plus userTokenId before the timestamp
    #[default]
    WithUserToken,
}

impl std::str::FromStr for ChecksumFields {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ChecksumFields::Standard),
            "with-user-token" | "with_user_token" => Ok(ChecksumFields::WithUserToken),
            other => Err(RelayError::Configuration(format!(
                "unknown checksum field set: {} (expected standard or with-user-token)",
                other
            ))),
        }
    }
}

/// How the success response is turned into a `PaymentOutcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Bank transaction id if the redirect URL carries `orderId=`, else the URL
    #[default]
    Auto,
    /// Always return the redirect URL
    RedirectUrl,
    /// Require a bank transaction id in the redirect URL
    BankTransactionId,
}

/// Configuration for one order flow variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowProfile {
    /// Profile name (`paypal`, `bank-transfer`)
    pub name: String,
    /// Sent verbatim as `paymentOption.alternativePaymentMethod.method`
    pub payment_method: String,
    pub checksum_fields: ChecksumFields,
    pub extraction: ExtractionMode,
    /// Applied when the request omits amount/currency; `None` means both are required
    pub defaults: Option<OrderDefaults>,
    /// Whether a customer profile must accompany the request
    pub require_customer: bool,
}

impl FlowProfile {
    /// PayPal-style redirect completion. Amount and currency default to 100 USD.
    pub fn paypal() -> Self {
        Self {
            name: "paypal".to_string(),
            payment_method: "PayPal".to_string(),
            checksum_fields: ChecksumFields::WithUserToken,
            extraction: ExtractionMode::Auto,
            defaults: Some(OrderDefaults::new(Decimal::ONE_HUNDRED, "USD")),
            require_customer: false,
        }
    }

    /// Bank-transfer-style completion. Amount, currency and customer are required.
    pub fn bank_transfer() -> Self {
        Self {
            name: "bank-transfer".to_string(),
            payment_method: "BankTransfer".to_string(),
            checksum_fields: ChecksumFields::WithUserToken,
            extraction: ExtractionMode::Auto,
            defaults: None,
            require_customer: true,
        }
    }

    /// Look up a built-in profile by name
    pub fn from_name(name: &str) -> RelayResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "paypal" => Ok(Self::paypal()),
            "bank-transfer" | "bank_transfer" => Ok(Self::bank_transfer()),
            other => Err(RelayError::Configuration(format!(
                "unknown order flow: {} (expected paypal or bank-transfer)",
                other
            ))),
        }
    }

    /// Builder: override the payment method
    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    /// Builder: override the payment checksum field set
    pub fn with_checksum_fields(mut self, fields: ChecksumFields) -> Self {
        self.checksum_fields = fields;
        self
    }

    /// Builder: override the extraction mode
    pub fn with_extraction(mut self, extraction: ExtractionMode) -> Self {
        self.extraction = extraction;
        self
    }
}

impl Default for FlowProfile {
    fn default() -> Self {
        Self::paypal()
    }
}
