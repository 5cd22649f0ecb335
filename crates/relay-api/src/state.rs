//! # Application State
//!
//! Shared state for the Axum application: the configured order flow and
//! server settings. Everything here is read-only after startup.

use anyhow::Context;
use relay_core::{ChecksumFields, FlowProfile, OrderFlow, RequestIdMode};
use relay_nuvei::NuveiGateway;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order flow (gateway + profile)
    pub flow: Arc<OrderFlow>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the state from environment, failing fast on missing credentials
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let gateway = NuveiGateway::from_env().context("Failed to initialize Nuvei")?;
        if gateway.config().is_sandbox() && config.is_production() {
            tracing::warn!("ENVIRONMENT=production but Nuvei endpoints point at the sandbox");
        }

        let profile = load_flow_profile()?;
        let request_ids = match std::env::var("CLIENT_REQUEST_ID") {
            Ok(mode) => mode.parse::<RequestIdMode>()?,
            Err(_) => RequestIdMode::default(),
        };

        let flow = OrderFlow::new(Arc::new(gateway), profile).with_request_ids(request_ids);

        Ok(Self::with_flow(flow, config))
    }

    /// Build state around an existing flow
    pub fn with_flow(flow: OrderFlow, config: AppConfig) -> Self {
        Self {
            flow: Arc::new(flow),
            config,
        }
    }
}

/// Resolve the flow profile from `ORDER_FLOW`, `NUVEI_PAYMENT_METHOD`
/// and `NUVEI_CHECKSUM_FIELDS`
fn load_flow_profile() -> anyhow::Result<FlowProfile> {
    let profile = flow_profile_from(|key| std::env::var(key).ok())?;

    tracing::info!(
        "Order flow: {} (method={}, checksum={:?}, defaults={})",
        profile.name,
        profile.payment_method,
        profile.checksum_fields,
        profile.defaults.is_some()
    );
    Ok(profile)
}

fn flow_profile_from<F>(lookup: F) -> anyhow::Result<FlowProfile>
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let name = set("ORDER_FLOW").unwrap_or_else(|| "paypal".to_string());
    let mut profile = FlowProfile::from_name(&name)?;

    if let Some(method) = set("NUVEI_PAYMENT_METHOD") {
        profile = profile.with_payment_method(method);
    }
    if let Some(fields) = set("NUVEI_CHECKSUM_FIELDS") {
        profile = profile.with_checksum_fields(fields.parse::<ChecksumFields>()?);
    }

    Ok(profile)
}
