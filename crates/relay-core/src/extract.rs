//! # Redirect Extraction
//!
//! Turns an accepted payment result into the value returned to the caller:
//! either the redirect URL itself or a bank transaction id embedded in it
//! as `orderId=<value>` (terminated by `;` or the end of the URL).

use crate::error::{RelayError, RelayResult};
use crate::order::{PaymentOutcome, PaymentResult};
use crate::strategy::ExtractionMode;
use regex::Regex;
use std::sync::OnceLock;

fn order_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"orderId=([^;]+)").expect("valid orderId pattern"))
}

/// Pull the bank transaction id out of a redirect URL
pub fn transaction_bank_id(redirect_url: &str) -> Option<&str> {
    order_id_pattern()
        .captures(redirect_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract the caller-facing outcome from an accepted payment result
pub fn extract_outcome(result: &PaymentResult, mode: ExtractionMode) -> RelayResult<PaymentOutcome> {
    let redirect_url = result.redirect_url.as_deref().ok_or_else(|| {
        RelayError::Unexpected("payment response has no paymentOption.redirectUrl".to_string())
    })?;

    match mode {
        ExtractionMode::RedirectUrl => Ok(redirect(redirect_url)),
        ExtractionMode::BankTransactionId => transaction_bank_id(redirect_url)
            .map(bank_transaction)
            .ok_or_else(|| {
                RelayError::Unexpected(format!(
                    "redirectUrl carries no orderId: {}",
                    redirect_url
                ))
            }),
        ExtractionMode::Auto => Ok(transaction_bank_id(redirect_url)
            .map(bank_transaction)
            .unwrap_or_else(|| redirect(redirect_url))),
    }
}

fn redirect(url: &str) -> PaymentOutcome {
    PaymentOutcome::Redirect {
        redirect_url: url.to_string(),
    }
}

fn bank_transaction(id: &str) -> PaymentOutcome {
    PaymentOutcome::BankTransaction {
        transaction_bank_id: id.to_string(),
    }
}
