//! # Nuvei Gateway
//!
//! `PaymentGateway` implementation over the Nuvei REST API:
//! `getSessionToken` followed by `payment`.

use crate::config::NuveiConfig;
use crate::payment::NuveiPaymentRequest;
use crate::session::{parse_session_token, NuveiSessionTokenRequest};
use async_trait::async_trait;
use relay_core::{
    ChecksumFields, PaymentGateway, PaymentOrder, PaymentResult, RelayError, RelayResult,
    RequestContext, SessionToken,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const SESSION_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Nuvei payment gateway client
pub struct NuveiGateway {
    config: NuveiConfig,
    client: Client,
}

impl NuveiGateway {
    /// Create a new gateway client
    pub fn new(config: NuveiConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> RelayResult<Self> {
        let config = NuveiConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &NuveiConfig {
        &self.config
    }

    /// POST a JSON body and read a JSON body back.
    ///
    /// HTTP status is not interpreted here; Nuvei reports refusals in the
    /// body and the callers decide from its fields.
    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> RelayResult<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            warn!("Nuvei returned HTTP {} from {}", status, url);
        }

        serde_json::from_str(&text).map_err(|e| {
            RelayError::Serialization(format!(
                "Failed to parse Nuvei response (HTTP {}): {}",
                status, e
            ))
        })
    }
}

#[async_trait]
impl PaymentGateway for NuveiGateway {
    #[instrument(skip(self, context), fields(client_request_id = %context.client_request_id))]
    async fn acquire_session_token(&self, context: &RequestContext) -> RelayResult<SessionToken> {
        let request = NuveiSessionTokenRequest::new(&self.config.credentials, context);
        let attempts = self.config.session_retries + 1;

        let mut attempt = 1;
        let raw = loop {
            match self.post_json(&self.config.session_url, &request).await {
                Ok(raw) => break raw,
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "getSessionToken attempt {}/{} failed: {}",
                        attempt, attempts, e
                    );
                    tokio::time::sleep(SESSION_RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let token = parse_session_token(raw).map_err(|e| {
            if let Some(raw) = e.raw_response() {
                warn!("Nuvei refused session token: {}", raw);
            }
            e
        })?;

        debug!("Acquired Nuvei session token");
        Ok(token)
    }

    #[instrument(skip_all, fields(client_request_id = %context.client_request_id))]
    async fn submit_payment(
        &self,
        session: &SessionToken,
        order: &PaymentOrder,
        context: &RequestContext,
        checksum_fields: ChecksumFields,
        payment_method: &str,
    ) -> RelayResult<PaymentResult> {
        let request = NuveiPaymentRequest::new(
            &self.config.credentials,
            session,
            order,
            context,
            checksum_fields,
            payment_method,
        );

        let raw = self.post_json(&self.config.payment_url, &request).await?;
        let result = PaymentResult::from_raw(raw);

        info!(
            "Nuvei payment status={}, transactionStatus={}",
            result.status.as_str(),
            result
                .raw_response
                .get("transactionStatus")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
        );

        result.into_accepted()
    }

    fn provider_name(&self) -> &'static str {
        "nuvei"
    }
}
