//! # Payment Submission
//!
//! Request shape for `payment`. Customer details are sent only when the
//! caller supplied them.

use crate::checksum::payment_checksum;
use crate::config::MerchantCredentials;
use relay_core::{ChecksumFields, CustomerProfile, PaymentOrder, RequestContext, SessionToken};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiPaymentRequest {
    pub merchant_id: String,
    pub merchant_site_id: String,
    pub client_request_id: String,
    pub amount: String,
    pub currency: String,
    pub session_token: String,
    pub user_token_id: String,
    pub client_unique_id: String,
    pub payment_option: NuveiPaymentOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_details: Option<NuveiDeviceDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<NuveiBillingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_details: Option<NuveiUserDetails>,
    pub time_stamp: String,
    pub checksum: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiPaymentOption {
    pub alternative_payment_method: NuveiAlternativePaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct NuveiAlternativePaymentMethod {
    pub method: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiDeviceDetails {
    pub ip_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiBillingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiUserDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&CustomerProfile> for NuveiBillingAddress {
    fn from(c: &CustomerProfile) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            email: c.email.clone(),
            country: c.country.to_uppercase(),
            phone: c.phone.clone(),
            city: c.city.clone(),
            address: c.address.clone(),
            zip: c.zip.clone(),
        }
    }
}

impl From<&CustomerProfile> for NuveiUserDetails {
    fn from(c: &CustomerProfile) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            email: c.email.clone(),
            country: c.country.to_uppercase(),
            phone: c.phone.clone(),
        }
    }
}

impl NuveiPaymentRequest {
    pub fn new(
        credentials: &MerchantCredentials,
        session: &SessionToken,
        order: &PaymentOrder,
        context: &RequestContext,
        fields: ChecksumFields,
        payment_method: &str,
    ) -> Self {
        let customer = order.customer.as_ref();

        Self {
            merchant_id: credentials.merchant_id.clone(),
            merchant_site_id: credentials.merchant_site_id.clone(),
            client_request_id: context.client_request_id.clone(),
            amount: order.amount_string(),
            currency: order.currency.clone(),
            session_token: session.as_str().to_string(),
            user_token_id: context.user_token_id.clone(),
            client_unique_id: context.client_unique_id.clone(),
            payment_option: NuveiPaymentOption {
                alternative_payment_method: NuveiAlternativePaymentMethod {
                    method: payment_method.to_string(),
                },
            },
            device_details: customer
                .and_then(|c| c.ip_address.clone())
                .map(|ip_address| NuveiDeviceDetails { ip_address }),
            billing_address: customer.map(NuveiBillingAddress::from),
            user_details: customer.map(NuveiUserDetails::from),
            time_stamp: context.timestamp.clone(),
            checksum: payment_checksum(credentials, context, order, fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{payment_signing_string, sha256_hex};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn context() -> RequestContext {
        RequestContext {
            timestamp: "20250101120000".into(),
            client_request_id: "20250101120000".into(),
            user_token_id: "user-1".into(),
            client_unique_id: "unique-1".into(),
        }
    }

    #[test]
    fn test_minimal_payment_body() {
        let creds = MerchantCredentials::new("111", "222", "secret");
        let order = PaymentOrder {
            amount: dec!(100),
            currency: "USD".into(),
            customer: None,
        };

        let req = NuveiPaymentRequest::new(
            &creds,
            &SessionToken::new("tok"),
            &order,
            &context(),
            ChecksumFields::Standard,
            "PayPal",
        );
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["amount"], "100");
        assert_eq!(body["sessionToken"], "tok");
        assert_eq!(body["timeStamp"], "20250101120000");
        assert_eq!(
            body["paymentOption"],
            json!({"alternativePaymentMethod": {"method": "PayPal"}})
        );
        assert!(body.get("billingAddress").is_none());
        assert!(body.get("deviceDetails").is_none());
        assert_eq!(
            body["checksum"],
            sha256_hex(&payment_signing_string(&creds, &context(), &order, ChecksumFields::Standard))
        );
    }

    #[test]
    fn test_customer_details_forwarded() {
        let creds = MerchantCredentials::new("111", "222", "secret");
        let customer = CustomerProfile::new("Ada", "Lovelace", "ada@example.com", "gb")
            .with_ip_address("203.0.113.9");
        let order = PaymentOrder {
            amount: dec!(42.00),
            currency: "EUR".into(),
            customer: Some(customer),
        };

        let body = serde_json::to_value(NuveiPaymentRequest::new(
            &creds,
            &SessionToken::new("tok"),
            &order,
            &context(),
            ChecksumFields::WithUserToken,
            "BankTransfer",
        ))
        .unwrap();

        assert_eq!(body["amount"], "42");
        assert_eq!(body["deviceDetails"], json!({"ipAddress": "203.0.113.9"}));
        assert_eq!(body["billingAddress"]["country"], "GB");
        assert_eq!(body["userDetails"]["email"], "ada@example.com");
        assert!(body["billingAddress"].get("zip").is_none());
        assert_eq!(body["userTokenId"], "user-1");
        assert_eq!(body["clientUniqueId"], "unique-1");
    }
}
