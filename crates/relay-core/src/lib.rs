//! # relay-core
//!
//! Core types and the order flow for the nuvei-relay payment bridge.
//!
//! This crate provides:
//! - `PaymentGateway` trait for session-token payment gateways
//! - `FlowProfile` selecting checksum field set, extraction mode and defaults
//! - `PaymentRequest`, `PaymentOrder`, `RequestContext` for one request
//! - `OrderFlow`, the sequential pipeline behind the order endpoint
//! - `RelayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use relay_core::{FlowProfile, OrderFlow, PaymentRequest};
//!
//! let flow = OrderFlow::new(gateway, FlowProfile::paypal());
//! let outcome = flow.initiate(PaymentRequest::from_slice(body)?, None).await?;
//!
//! // Send outcome back to the caller as JSON
//! ```

pub mod customer;
pub mod error;
pub mod extract;
pub mod flow;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use customer::CustomerProfile;
pub use error::{RelayError, RelayResult};
pub use extract::{extract_outcome, transaction_bank_id};
pub use flow::OrderFlow;
pub use order::{
    format_timestamp, OrderDefaults, PaymentOrder, PaymentOutcome, PaymentRequest, PaymentResult,
    PaymentStatus, RequestContext, RequestIdMode, SessionToken, TIMESTAMP_FORMAT,
};
pub use strategy::{BoxedGateway, ChecksumFields, ExtractionMode, FlowProfile, PaymentGateway};
