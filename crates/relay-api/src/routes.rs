//! # Routes
//!
//! Axum router configuration for the relay API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Path kept from the serverless deployment so existing callers keep working
pub const LEGACY_ORDER_PATH: &str = "/.netlify/functions/create-nuvei-order";

/// Create the main application router
///
/// Routes:
/// - POST /api/v1/orders - Create a gateway order (any other verb gets 405)
/// - POST /.netlify/functions/create-nuvei-order - Same handler, legacy path
/// - GET  /health, GET / - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route("/orders", any(handlers::create_order));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        .route(LEGACY_ORDER_PATH, any(handlers::create_order))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum_test::TestServer;
    use relay_core::{FlowProfile, OrderFlow};
    use relay_nuvei::checksum::{payment_signing_string, session_signing_string};
    use relay_nuvei::{sha256_hex, MerchantCredentials, NuveiConfig, NuveiGateway};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SESSION: &str = "/ppp/api/v1/getSessionToken.do";
    const PAYMENT: &str = "/ppp/api/payment.do";

    fn app(gateway_uri: &str, profile: FlowProfile) -> Router {
        let config = NuveiConfig::new("427583496191624621", "142033", "secret").with_base_url(gateway_uri);
        let gateway = NuveiGateway::new(config).unwrap();
        let flow = OrderFlow::new(Arc::new(gateway), profile);
        create_router(AppState::with_flow(flow, AppConfig::default()))
    }

    async fn mount(server: &MockServer, at: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn sent(server: &MockServer, at: &str) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == at)
            .map(|r| r.body_json::<Value>().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_non_post_never_reaches_gateway() {
        let gateway = MockServer::start().await;
        let router = app(&gateway.uri(), FlowProfile::paypal());

        for verb in ["GET", "PUT", "DELETE"] {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method(verb)
                        .uri(LEGACY_ORDER_PATH)
                        .body(Body::from("not json"))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers()[header::ALLOW], "POST");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"Method not allowed");
        }

        assert!(sent(&gateway, SESSION).await.is_empty());
    }

    #[tokio::test]
    async fn test_large_bodies_keep_the_envelope() {
        let gateway = MockServer::start().await;
        let router = app(&gateway.uri(), FlowProfile::paypal());
        let big = vec![b'x'; 3 * 1024 * 1024];

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/orders")
                    .body(Body::from(big.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/orders")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(big))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Request body exceeds"));

        assert!(sent(&gateway, SESSION).await.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_bank_id() {
        let gateway = MockServer::start().await;
        mount(&gateway, SESSION, json!({"sessionToken": "tok-e2e", "status": "SUCCESS"})).await;
        mount(
            &gateway,
            PAYMENT,
            json!({
                "status": "SUCCESS",
                "paymentOption": {"redirectUrl": "https://pay/redir?orderId=ABC123;foo=bar"}
            }),
        )
        .await;

        let server = TestServer::new(app(&gateway.uri(), FlowProfile::paypal())).unwrap();
        let response = server
            .post(LEGACY_ORDER_PATH)
            .json(&json!({"amount": 100, "currency": "USD"}))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"transactionBankId": "ABC123"}));

        // Checksums on the wire equal SHA-256 of the plain concatenation
        let creds = MerchantCredentials::new("427583496191624621", "142033", "secret");
        let sessions = sent(&gateway, SESSION).await;
        let payments = sent(&gateway, PAYMENT).await;
        let (session, payment) = (&sessions[0], &payments[0]);

        let timestamp = session["timeStamp"].as_str().unwrap();
        assert_eq!(timestamp.len(), 14);
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(session["clientRequestId"], timestamp);

        let context = relay_core::RequestContext {
            timestamp: timestamp.to_string(),
            client_request_id: timestamp.to_string(),
            user_token_id: payment["userTokenId"].as_str().unwrap().to_string(),
            client_unique_id: payment["clientUniqueId"].as_str().unwrap().to_string(),
        };
        assert_eq!(
            session["checksum"],
            sha256_hex(&session_signing_string(&creds, &context))
        );

        let order = relay_core::PaymentOrder {
            amount: "100".parse().unwrap(),
            currency: "USD".into(),
            customer: None,
        };
        assert_eq!(
            payment["checksum"],
            sha256_hex(&payment_signing_string(
                &creds,
                &context,
                &order,
                relay_core::ChecksumFields::WithUserToken
            ))
        );
        assert_eq!(payment["sessionToken"], "tok-e2e");
        assert_eq!(
            payment["paymentOption"],
            json!({"alternativePaymentMethod": {"method": "PayPal"}})
        );
        assert_eq!(payment["amount"], "100");
    }

    #[tokio::test]
    async fn test_end_to_end_session_refused() {
        let gateway = MockServer::start().await;
        let refusal = json!({"status": "ERROR", "errCode": 1001, "reason": "Invalid checksum"});
        mount(&gateway, SESSION, refusal.clone()).await;

        let server = TestServer::new(app(&gateway.uri(), FlowProfile::paypal())).unwrap();
        let response = server.post("/api/v1/orders").json(&json!({})).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to obtain sessionToken");
        assert_eq!(body["data"], refusal);
        assert!(sent(&gateway, PAYMENT).await.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_pending_payment() {
        let gateway = MockServer::start().await;
        mount(&gateway, SESSION, json!({"sessionToken": "tok"})).await;
        let pending = json!({"status": "PENDING", "transactionStatus": "PENDING"});
        mount(&gateway, PAYMENT, pending.clone()).await;

        let server = TestServer::new(app(&gateway.uri(), FlowProfile::paypal())).unwrap();
        let response = server.post("/api/v1/orders").json(&json!({"amount": 9.99})).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
        assert_eq!(body["data"], pending);
    }

    #[tokio::test]
    async fn test_end_to_end_gateway_unreachable() {
        let router = app("http://127.0.0.1:9", FlowProfile::paypal());
        let server = TestServer::new(router).unwrap();

        let response = server.post("/api/v1/orders").json(&json!({})).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("Network error"));
    }
}
