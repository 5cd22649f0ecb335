//! # relay-api
//!
//! HTTP surface for nuvei-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The order-initiation endpoint (session token, payment, redirect target)
//! - Response envelopes for every failure of the flow
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/orders` | Create a gateway order |
//! | POST | `/.netlify/functions/create-nuvei-order` | Same, legacy path |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
