//! # Order Types
//!
//! Inbound payment request, per-request gateway context and the
//! payment result/outcome types for nuvei-relay.

use crate::customer::CustomerProfile;
use crate::error::{RelayError, RelayResult};
use crate::strategy::FlowProfile;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Gateway timestamp layout: YYYYMMDDHHMMSS, zero-padded, no separators
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Inbound order request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer: Option<CustomerProfile>,
}

impl PaymentRequest {
    /// Parse a raw JSON body
    pub fn from_slice(body: &[u8]) -> RelayResult<Self> {
        serde_json::from_slice(body).map_err(|e| RelayError::MalformedRequest(e.to_string()))
    }

    /// Apply the profile's defaulting policy and validate into an order.
    pub fn into_order(self, profile: &FlowProfile) -> RelayResult<PaymentOrder> {
        let defaults = profile.defaults.as_ref();

        let amount = self
            .amount
            .or_else(|| defaults.map(|d| d.amount))
            .ok_or_else(|| RelayError::MalformedRequest("amount is required".to_string()))?;

        let currency = self
            .currency
            .filter(|c| !c.trim().is_empty())
            .or_else(|| defaults.map(|d| d.currency.clone()))
            .ok_or_else(|| RelayError::MalformedRequest("currency is required".to_string()))?;

        if amount <= Decimal::ZERO {
            return Err(RelayError::MalformedRequest(format!(
                "amount must be positive, got {}",
                amount
            )));
        }

        match &self.customer {
            Some(customer) => customer.validate()?,
            None if profile.require_customer => {
                return Err(RelayError::MalformedRequest(
                    "customer is required".to_string(),
                ))
            }
            None => {}
        }

        Ok(PaymentOrder {
            amount,
            currency: currency.trim().to_uppercase(),
            customer: self.customer,
        })
    }
}

/// Amount/currency applied when a request omits them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDefaults {
    pub amount: Decimal,
    pub currency: String,
}

impl OrderDefaults {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// A validated order ready to be signed and submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub amount: Decimal,
    pub currency: String,
    pub customer: Option<CustomerProfile>,
}

impl PaymentOrder {
    /// Amount exactly as it is signed and sent (`100`, `10.5`)
    pub fn amount_string(&self) -> String {
        self.amount.normalize().to_string()
    }
}

/// How `clientRequestId` is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestIdMode {
    /// Same value as the request timestamp
    #[default]
    Timestamp,
    /// Random UUID v4
    Uuid,
}

impl std::str::FromStr for RequestIdMode {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(RequestIdMode::Timestamp),
            "uuid" => Ok(RequestIdMode::Uuid),
            other => Err(RelayError::Configuration(format!(
                "unknown client request id mode: {}",
                other
            ))),
        }
    }
}

/// Identifiers generated fresh for each request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub timestamp: String,
    pub client_request_id: String,
    pub user_token_id: String,
    pub client_unique_id: String,
}

impl RequestContext {
    /// Generate a context for the current instant
    pub fn generate(mode: RequestIdMode) -> Self {
        Self::at(Utc::now(), mode)
    }

    /// Generate a context for a given instant
    pub fn at(now: DateTime<Utc>, mode: RequestIdMode) -> Self {
        let timestamp = format_timestamp(now);
        let client_request_id = match mode {
            RequestIdMode::Timestamp => timestamp.clone(),
            RequestIdMode::Uuid => Uuid::new_v4().to_string(),
        };

        Self {
            timestamp,
            client_request_id,
            user_token_id: Uuid::new_v4().to_string(),
            client_unique_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Render a gateway timestamp
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Opaque single-use credential issued by the gateway
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Gateway payment status; only the literal `SUCCESS` counts as success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("SUCCESS") => PaymentStatus::Success,
            Some(other) => PaymentStatus::Other(other.to_string()),
            None => PaymentStatus::Other("MISSING".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Other(s) => s,
        }
    }
}

/// Parsed payment submission response
#[derive(Debug, Clone)]
pub struct PaymentResult {
    pub status: PaymentStatus,
    pub redirect_url: Option<String>,
    pub raw_response: Value,
}

impl PaymentResult {
    /// Build from the raw gateway JSON
    pub fn from_raw(raw_response: Value) -> Self {
        let status = PaymentStatus::parse(raw_response.get("status").and_then(|v| v.as_str()));
        let redirect_url = raw_response
            .get("paymentOption")
            .and_then(|po| po.get("redirectUrl"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from);

        Self {
            status,
            redirect_url,
            raw_response,
        }
    }

    /// Keep the result only if the gateway reported SUCCESS
    pub fn into_accepted(self) -> RelayResult<Self> {
        match self.status {
            PaymentStatus::Success => Ok(self),
            PaymentStatus::Other(status) => Err(RelayError::PaymentRejected {
                status,
                raw: self.raw_response,
            }),
        }
    }
}

/// Terminal value returned to the caller on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PaymentOutcome {
    /// Customer is sent to an external URL (PayPal-style)
    Redirect {
        #[serde(rename = "redirectUrl")]
        redirect_url: String,
    },
    /// Transaction id parsed out of the redirect URL (bank-transfer-style)
    BankTransaction {
        #[serde(rename = "transactionBankId")]
        transaction_bank_id: String,
    },
}
