//! # relay-nuvei
//!
//! Nuvei gateway client for nuvei-relay.
//!
//! Every order runs two signed calls against the Nuvei REST API:
//!
//! 1. **getSessionToken** - authenticates the merchant and returns a
//!    single-use session token (retried on transport failures only)
//! 2. **payment** - submits the alternative payment method with the token
//!    (never retried)
//!
//! Both calls carry a SHA-256 checksum over the raw concatenation of
//! request fields and the merchant secret (see [`checksum`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_core::{FlowProfile, OrderFlow};
//! use relay_nuvei::NuveiGateway;
//! use std::sync::Arc;
//!
//! // Fails fast if NUVEI_MERCHANT_* variables are missing
//! let gateway = NuveiGateway::from_env()?;
//!
//! let flow = OrderFlow::new(Arc::new(gateway), FlowProfile::paypal());
//! ```

pub mod checksum;
pub mod config;
pub mod gateway;
pub mod payment;
pub mod session;

// Re-exports
pub use checksum::{payment_checksum, session_checksum, sha256_hex};
pub use config::{MerchantCredentials, NuveiConfig, DEFAULT_PAYMENT_URL, DEFAULT_SESSION_URL};
pub use gateway::NuveiGateway;
pub use payment::NuveiPaymentRequest;
pub use session::NuveiSessionTokenRequest;
