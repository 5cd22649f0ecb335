//! # Customer Profile
//!
//! Billing and user details forwarded to the gateway with a payment.
//! The profile comes from the caller; nothing here is a literal default.

use crate::error::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};

/// Customer details supplied with an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub first_name: String,

    pub last_name: String,

    pub email: String,

    /// ISO 3166-1 alpha-2 country code (e.g., "US", "MX")
    pub country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    /// Customer device IP; falls back to the forwarding header when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl CustomerProfile {
    /// Create a profile with the required fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            country: country.into(),
            phone: None,
            city: None,
            address: None,
            zip: None,
            ip_address: None,
        }
    }

    /// Builder: set phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder: set device IP address
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Check required fields and basic formats.
    pub fn validate(&self) -> RelayResult<()> {
        if self.first_name.trim().is_empty() {
            return Err(RelayError::MalformedRequest(
                "customer.firstName is required".to_string(),
            ));
        }
        if self.last_name.trim().is_empty() {
            return Err(RelayError::MalformedRequest(
                "customer.lastName is required".to_string(),
            ));
        }

        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(RelayError::MalformedRequest(format!(
                    "customer.email is not a valid address: {:?}",
                    self.email
                )))
            }
        }

        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RelayError::MalformedRequest(format!(
                "customer.country must be a two-letter code, got {:?}",
                self.country
            )));
        }

        Ok(())
    }
}
