//! # Order Flow
//!
//! The single sequential pipeline behind the order endpoint:
//! validate, build context, acquire session token, submit payment,
//! extract outcome. The first failure short-circuits the run.

use crate::error::{RelayError, RelayResult};
use crate::extract::extract_outcome;
use crate::order::{PaymentOutcome, PaymentRequest, RequestContext, RequestIdMode};
use crate::strategy::{BoxedGateway, FlowProfile};
use tracing::{info, instrument};

/// One configured order flow (gateway + profile)
#[derive(Clone)]
pub struct OrderFlow {
    gateway: BoxedGateway,
    profile: FlowProfile,
    request_ids: RequestIdMode,
}

impl OrderFlow {
    pub fn new(gateway: BoxedGateway, profile: FlowProfile) -> Self {
        Self {
            gateway,
            profile,
            request_ids: RequestIdMode::default(),
        }
    }

    /// Builder: choose how `clientRequestId` is derived
    pub fn with_request_ids(mut self, mode: RequestIdMode) -> Self {
        self.request_ids = mode;
        self
    }

    pub fn profile(&self) -> &FlowProfile {
        &self.profile
    }

    pub fn provider_name(&self) -> &'static str {
        self.gateway.provider_name()
    }

    /// Run the flow for one inbound request.
    ///
    /// `forwarded_ip` is the caller address taken from the transport, used
    /// when the customer profile carries none.
    #[instrument(skip_all, fields(flow = %self.profile.name, provider = self.gateway.provider_name()))]
    pub async fn initiate(
        &self,
        request: PaymentRequest,
        forwarded_ip: Option<String>,
    ) -> RelayResult<PaymentOutcome> {
        let mut order = request.into_order(&self.profile)?;

        if let Some(customer) = order.customer.as_mut() {
            if customer.ip_address.is_none() {
                customer.ip_address = forwarded_ip;
            }
            if self.profile.require_customer && customer.ip_address.is_none() {
                return Err(RelayError::MalformedRequest(
                    "customer.ipAddress is required (or an X-Forwarded-For header)".to_string(),
                ));
            }
        }

        let context = RequestContext::generate(self.request_ids);
        info!(
            client_request_id = %context.client_request_id,
            amount = %order.amount_string(),
            currency = %order.currency,
            "Initiating order"
        );

        let session = self.gateway.acquire_session_token(&context).await?;

        let result = self
            .gateway
            .submit_payment(
                &session,
                &order,
                &context,
                self.profile.checksum_fields,
                &self.profile.payment_method,
            )
            .await?;

        let outcome = extract_outcome(&result, self.profile.extraction)?;
        info!(client_request_id = %context.client_request_id, outcome = ?outcome, "Order initiated");

        Ok(outcome)
    }
}
