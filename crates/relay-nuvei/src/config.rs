//! # Nuvei Configuration
//!
//! Configuration management for the Nuvei integration.
//! Merchant credentials are loaded from environment variables and must all
//! be present; the relay refuses to start rather than sign with blanks.

use relay_core::RelayError;
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Default sandbox endpoint for `getSessionToken`
pub const DEFAULT_SESSION_URL: &str = "https://ppp-test.nuvei.com/ppp/api/v1/getSessionToken.do";

/// Default sandbox endpoint for `payment`
pub const DEFAULT_PAYMENT_URL: &str = "https://ppp-test.safecharge.com/ppp/api/payment.do";

const SESSION_PATH: &str = "/ppp/api/v1/getSessionToken.do";
const PAYMENT_PATH: &str = "/ppp/api/payment.do";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_RETRIES: u32 = 1;
const MAX_SESSION_RETRIES: u32 = 3;

/// Merchant identity and shared secret
#[derive(Clone)]
pub struct MerchantCredentials {
    pub merchant_id: String,
    pub merchant_site_id: String,
    merchant_secret_key: String,
}

impl MerchantCredentials {
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_site_id: impl Into<String>,
        merchant_secret_key: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_site_id: merchant_site_id.into(),
            merchant_secret_key: merchant_secret_key.into(),
        }
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.merchant_secret_key
    }
}

impl std::fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_site_id", &self.merchant_site_id)
            .field("merchant_secret_key", &"***")
            .finish()
    }
}

/// Nuvei API configuration
#[derive(Debug, Clone)]
pub struct NuveiConfig {
    pub credentials: MerchantCredentials,

    /// Full URL of the session token endpoint
    pub session_url: String,

    /// Full URL of the payment endpoint
    pub payment_url: String,

    /// Per-call timeout for outbound requests
    pub timeout: Duration,

    /// Extra attempts for session acquisition on transport failures
    pub session_retries: u32,
}

impl NuveiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `NUVEI_MERCHANT_ID`
    /// - `NUVEI_MERCHANT_SITE_ID`
    /// - `NUVEI_MERCHANT_SECRET_KEY`
    ///
    /// Optional: `NUVEI_SESSION_URL`, `NUVEI_PAYMENT_URL`,
    /// `NUVEI_TIMEOUT_SECS`, `NUVEI_SESSION_RETRIES`.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, RelayError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RelayError::Configuration(format!("{} not set", key)))
        };

        // Blank overrides fall back to the sandbox default
        let endpoint = |key: &str, default: &str| -> Result<String, RelayError> {
            let raw = match lookup(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => return Ok(default.to_string()),
            };

            let url = Url::parse(&raw).map_err(|e| {
                RelayError::Configuration(format!("{} is not a valid URL ({}): {:?}", key, e, raw))
            })?;
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(RelayError::Configuration(format!(
                    "{} must be an http(s) URL, got {:?}",
                    key, raw
                )));
            }
            Ok(raw)
        };

        let credentials = MerchantCredentials::new(
            required("NUVEI_MERCHANT_ID")?,
            required("NUVEI_MERCHANT_SITE_ID")?,
            required("NUVEI_MERCHANT_SECRET_KEY")?,
        );

        let timeout = match lookup("NUVEI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(RelayError::Configuration(format!(
                        "NUVEI_TIMEOUT_SECS must be a positive integer, got {:?}",
                        raw
                    )))
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let session_retries = match lookup("NUVEI_SESSION_RETRIES") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                RelayError::Configuration(format!(
                    "NUVEI_SESSION_RETRIES must be a non-negative integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_SESSION_RETRIES,
        };

        Ok(Self {
            credentials,
            session_url: endpoint("NUVEI_SESSION_URL", DEFAULT_SESSION_URL)?,
            payment_url: endpoint("NUVEI_PAYMENT_URL", DEFAULT_PAYMENT_URL)?,
            timeout,
            session_retries: session_retries.min(MAX_SESSION_RETRIES),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_site_id: impl Into<String>,
        merchant_secret_key: impl Into<String>,
    ) -> Self {
        Self {
            credentials: MerchantCredentials::new(merchant_id, merchant_site_id, merchant_secret_key),
            session_url: DEFAULT_SESSION_URL.to_string(),
            payment_url: DEFAULT_PAYMENT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_retries: DEFAULT_SESSION_RETRIES,
        }
    }

    /// Builder: point both endpoints at one host (for testing/mocking)
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        self.session_url = format!("{}{}", base, SESSION_PATH);
        self.payment_url = format!("{}{}", base, PAYMENT_PATH);
        self
    }

    /// Builder: set outbound timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set session acquisition retries (capped)
    pub fn with_session_retries(mut self, retries: u32) -> Self {
        self.session_retries = retries.min(MAX_SESSION_RETRIES);
        self
    }

    /// Check if pointed at the Nuvei sandbox
    pub fn is_sandbox(&self) -> bool {
        self.session_url.contains("ppp-test.") && self.payment_url.contains("ppp-test.")
    }
}
