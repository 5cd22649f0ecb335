//! # Request Checksums
//!
//! Nuvei authenticates each call with a lowercase hex SHA-256 over the raw
//! concatenation of request fields followed by the merchant secret. There
//! are no delimiters and no normalization; field order is the contract.

use crate::config::MerchantCredentials;
use relay_core::{ChecksumFields, PaymentOrder, RequestContext};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a string
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Signed string for `getSessionToken`:
/// merchantId, merchantSiteId, clientRequestId, timeStamp, secret
pub fn session_signing_string(credentials: &MerchantCredentials, context: &RequestContext) -> String {
    [
        credentials.merchant_id.as_str(),
        credentials.merchant_site_id.as_str(),
        context.client_request_id.as_str(),
        context.timestamp.as_str(),
        credentials.secret_key(),
    ]
    .concat()
}

/// Signed string for `payment`.
///
/// merchantId, merchantSiteId, clientRequestId, amount, currency,
/// [userTokenId,] timeStamp, secret
pub fn payment_signing_string(
    credentials: &MerchantCredentials,
    context: &RequestContext,
    order: &PaymentOrder,
    fields: ChecksumFields,
) -> String {
    let amount = order.amount_string();
    let mut parts: Vec<&str> = vec![
        credentials.merchant_id.as_str(),
        credentials.merchant_site_id.as_str(),
        context.client_request_id.as_str(),
        amount.as_str(),
        order.currency.as_str(),
    ];
    if fields == ChecksumFields::WithUserToken {
        parts.push(context.user_token_id.as_str());
    }
    parts.push(context.timestamp.as_str());
    parts.push(credentials.secret_key());

    parts.concat()
}

/// Checksum for `getSessionToken`
pub fn session_checksum(credentials: &MerchantCredentials, context: &RequestContext) -> String {
    sha256_hex(&session_signing_string(credentials, context))
}

/// Checksum for `payment`
pub fn payment_checksum(
    credentials: &MerchantCredentials,
    context: &RequestContext,
    order: &PaymentOrder,
    fields: ChecksumFields,
) -> String {
    sha256_hex(&payment_signing_string(credentials, context, order, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn creds() -> MerchantCredentials {
        MerchantCredentials::new("111", "222", "secret")
    }

    fn context() -> RequestContext {
        RequestContext {
            timestamp: "20250101120000".into(),
            client_request_id: "20250101120000".into(),
            user_token_id: "user-1".into(),
            client_unique_id: "unique-1".into(),
        }
    }

    fn order() -> PaymentOrder {
        PaymentOrder {
            amount: dec!(10.50),
            currency: "USD".into(),
            customer: None,
        }
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_session_field_order() {
        assert_eq!(
            session_signing_string(&creds(), &context()),
            "1112222025010112000020250101120000secret"
        );
        assert_eq!(
            session_checksum(&creds(), &context()),
            sha256_hex("1112222025010112000020250101120000secret")
        );
    }

    #[test]
    fn test_payment_field_order() {
        assert_eq!(
            payment_signing_string(&creds(), &context(), &order(), ChecksumFields::Standard),
            "1112222025010112000010.5USD20250101120000secret"
        );
        assert_eq!(
            payment_signing_string(&creds(), &context(), &order(), ChecksumFields::WithUserToken),
            "1112222025010112000010.5USDuser-120250101120000secret"
        );
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let a = payment_checksum(&creds(), &context(), &order(), ChecksumFields::WithUserToken);
        let b = payment_checksum(&creds(), &context(), &order(), ChecksumFields::WithUserToken);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_any_payment_field_change_changes_digest() {
        let fields = ChecksumFields::WithUserToken;
        let base = payment_checksum(&creds(), &context(), &order(), fields);

        for other in [
            MerchantCredentials::new("112", "222", "secret"),
            MerchantCredentials::new("111", "223", "secret"),
            MerchantCredentials::new("111", "222", "secret2"),
        ] {
            assert_ne!(base, payment_checksum(&other, &context(), &order(), fields));
        }

        let contexts: [fn(&mut RequestContext); 3] = [
            |c| c.client_request_id = "20250101120001".into(),
            |c| c.user_token_id = "user-2".into(),
            |c| c.timestamp = "20250101120001".into(),
        ];
        for change in contexts {
            let mut ctx = context();
            change(&mut ctx);
            assert_ne!(base, payment_checksum(&creds(), &ctx, &order(), fields));
        }

        let orders: [fn(&mut PaymentOrder); 2] = [
            |o| o.amount = dec!(10.51),
            |o| o.currency = "EUR".into(),
        ];
        for change in orders {
            let mut o = order();
            change(&mut o);
            assert_ne!(base, payment_checksum(&creds(), &context(), &o, fields));
        }
    }

    #[test]
    fn test_standard_set_ignores_user_token() {
        let base = payment_checksum(&creds(), &context(), &order(), ChecksumFields::Standard);
        let mut ctx = context();
        ctx.user_token_id = "user-2".into();
        assert_eq!(base, payment_checksum(&creds(), &ctx, &order(), ChecksumFields::Standard));

        ctx.client_request_id = "20250101120001".into();
        assert_ne!(base, payment_checksum(&creds(), &ctx, &order(), ChecksumFields::Standard));
    }

    #[test]
    fn test_any_session_field_change_changes_digest() {
        let base = session_checksum(&creds(), &context());

        for other in [
            MerchantCredentials::new("112", "222", "secret"),
            MerchantCredentials::new("111", "223", "secret"),
            MerchantCredentials::new("111", "222", "secret2"),
        ] {
            assert_ne!(base, session_checksum(&other, &context()));
        }

        let mut ctx = context();
        ctx.client_request_id = "20250101120001".into();
        assert_ne!(base, session_checksum(&creds(), &ctx));

        let mut ctx = context();
        ctx.timestamp = "20250101120001".into();
        assert_ne!(base, session_checksum(&creds(), &ctx));

        // Payment-only fields are not signed here
        let mut ctx = context();
        ctx.user_token_id = "user-2".into();
        ctx.client_unique_id = "unique-2".into();
        assert_eq!(base, session_checksum(&creds(), &ctx));
    }
}
