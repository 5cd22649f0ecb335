//! # Session Token
//!
//! Request/response shapes for `getSessionToken`.

use crate::checksum::session_checksum;
use crate::config::MerchantCredentials;
use relay_core::{RelayError, RelayResult, RequestContext, SessionToken};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuveiSessionTokenRequest {
    pub merchant_id: String,
    pub merchant_site_id: String,
    pub client_request_id: String,
    pub time_stamp: String,
    pub checksum: String,
}

impl NuveiSessionTokenRequest {
    pub fn new(credentials: &MerchantCredentials, context: &RequestContext) -> Self {
        Self {
            merchant_id: credentials.merchant_id.clone(),
            merchant_site_id: credentials.merchant_site_id.clone(),
            client_request_id: context.client_request_id.clone(),
            time_stamp: context.timestamp.clone(),
            checksum: session_checksum(credentials, context),
        }
    }
}

/// Read `sessionToken` out of the raw response; anything unusable is a failure
pub fn parse_session_token(raw: Value) -> RelayResult<SessionToken> {
    let token = raw
        .get("sessionToken")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(SessionToken::new);

    token.ok_or(RelayError::SessionAcquisitionFailed { raw })
}
