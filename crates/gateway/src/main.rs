//! OncoAssist API Gateway
//!
//! The HTTP front of the advisory engine.
//! Handles:
//! - Request parsing and validation
//! - Routing to the advisory core and recognizer
//! - Rate limiting
//! - Observability (logging, metrics, tracing)

mod extract;
mod handlers;
mod middleware;

use anyhow::Context;
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use oncoassist_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics::{self, LATENCY_BUCKETS},
    multimodal::StubRecognizer,
    Advisor, KnowledgeBase, Recognizer, VERSION,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{signal, sync::Notify};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::middleware::rate_limit::{rate_limit_middleware, RateLimit};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub advisor: Arc<Advisor>,
    pub recognizer: Arc<dyn Recognizer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;
    let config = Arc::new(config);

    // Initialize tracing
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting OncoAssist API Gateway v{}",
        VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)?
            .add_global_label("service", config.observability.service_name.clone())
            .with_http_listener(metrics_addr)
            .install()
            .context("failed to install Prometheus exporter")?;
        info!("Metrics exposed on {}", metrics_addr);
    }
    metrics::register_metrics();

    // Load the knowledge base once; it is read-only from here on
    let knowledge = match config.knowledge.path.as_deref() {
        Some(path) => KnowledgeBase::from_file(path)?,
        None => {
            info!("Using built-in knowledge base");
            KnowledgeBase::seeded()
        }
    };

    let state = AppState {
        config: config.clone(),
        advisor: Arc::new(Advisor::new(Arc::new(knowledge))),
        recognizer: Arc::new(StubRecognizer),
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    // In-flight requests get `shutdown_timeout` to drain once a signal arrives
    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let signalled = signalled.clone();
            async move {
                shutdown_signal().await;
                signalled.notify_one();
            }
        })
        .into_future();

    let shutdown_timeout = config.shutdown_timeout();
    let drain_deadline = async {
        signalled.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => {
            warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed, dropping open connections"
            );
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let mut api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/process-navigation", post(handlers::navigation::process_navigation))
        .route("/timeline", get(handlers::navigation::timeline))
        .route("/risk-alert", post(handlers::risk::risk_alert))
        .route("/multimodal/voice", post(handlers::multimodal::voice))
        .route("/multimodal/image", post(handlers::multimodal::image));

    if state.config.rate_limit.enabled {
        let limit = RateLimit::new(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        api_routes = api_routes.layer(from_fn_with_state(limit, rate_limit_middleware));
    }

    // Compose the app
    Router::new()
        // Health endpoints (not rate limited)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        .layer(from_fn(middleware::track_metrics))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use oncoassist_common::advisory::{BASELINE_RESPONSE, MULTIMODAL_NOTICE};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state(config: AppConfig) -> AppState {
        AppState {
            config: Arc::new(config),
            advisor: Arc::new(Advisor::default()),
            recognizer: Arc::new(StubRecognizer),
        }
    }

    fn app() -> Router {
        create_router(test_state(AppConfig::default()))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(b) => builder.body(Body::from(b.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (_, body) = send(app(), "GET", "/ready", None).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"]["recognizer"]["detail"], "stub");
    }

    #[tokio::test]
    async fn test_chat_ai_with_context() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/chat",
            Some(json!({
                "query": "lung cancer treatment",
                "system_type": "ai",
                "context": {"age": 65, "gender": "male"}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["system_type"], "ai");
        let response = body["response"].as_str().unwrap();
        assert!(response.starts_with("Treatment options: Surgery"));
        assert!(response.contains("【Risk Alert】37% recurrence risk"));
        assert!(response.ends_with(MULTIMODAL_NOTICE));
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_chat_baseline_and_defaults() {
        let (_, body) = send(
            app(),
            "POST",
            "/api/chat",
            Some(json!({"query": "breast cancer", "system_type": "traditional"})),
        )
        .await;
        assert_eq!(body["response"], BASELINE_RESPONSE);

        let (status, body) = send(app(), "POST", "/api/chat", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["system_type"], "ai");
        assert!(body["response"].as_str().unwrap().contains("【Local Healthcare Resources】"));
    }

    #[tokio::test]
    async fn test_chat_rejects_oversized_query() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/chat",
            Some(json!({"query": "a".repeat(2001)})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "query");
    }

    async fn send_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, content_type, value)
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_body() {
        for uri in ["/api/chat", "/api/risk-alert", "/api/process-navigation", "/api/multimodal/voice"] {
            let (status, content_type, body) = send_raw(app(), uri, "{not json").await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            assert_eq!(body["error"]["code"], "INVALID_FORMAT");
            assert!(body["error"]["message"].as_str().is_some());
        }
    }

    #[tokio::test]
    async fn test_null_fields_fall_back_to_defaults() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/risk-alert",
            Some(json!({"age": 65, "gender": null, "cancer_type": "lung_cancer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let alerts = body["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0], "High-mortality cancer type, increased surveillance recommended");

        let (status, body) = send(
            app(),
            "POST",
            "/api/chat",
            Some(json!({"query": null, "system_type": null, "context": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["system_type"], "ai");

        let (_, body) = send(app(), "POST", "/api/process-navigation", Some(json!({"stage": null}))).await;
        assert_eq!(body["stage"], "diagnosis");

        let (_, body) = send(
            app(),
            "POST",
            "/api/multimodal/voice",
            Some(json!({"audio": null, "language": null})),
        )
        .await;
        assert_eq!(body["language"], "en");
    }

    #[tokio::test]
    async fn test_fractional_age_is_accepted() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/risk-alert",
            Some(json!({"age": 70.0, "gender": "female", "cancer_type": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alerts"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            app(),
            "POST",
            "/api/chat",
            Some(json!({"query": "lung cancer", "context": {"age": 65.0, "gender": "male"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["response"].as_str().unwrap().contains("37% recurrence risk"));
    }

    #[tokio::test]
    async fn test_risk_alert_lists_all() {
        let (_, body) = send(
            app(),
            "POST",
            "/api/risk-alert",
            Some(json!({"age": 65, "gender": "male", "cancer_type": "lung_cancer"})),
        )
        .await;

        assert_eq!(body["risk_level"], "high");
        assert_eq!(body["alerts"].as_array().unwrap().len(), 2);

        let (_, body) = send(app(), "POST", "/api/risk-alert", Some(json!({}))).await;
        assert_eq!(body["risk_level"], "normal");
        assert!(body["alerts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_navigation() {
        let (_, body) = send(
            app(),
            "POST",
            "/api/process-navigation",
            Some(json!({"stage": "followup"})),
        )
        .await;

        assert_eq!(body["stage"], "followup");
        assert_eq!(body["steps"].as_array().unwrap().len(), 5);
        assert_eq!(body["current_step"], 1);
        assert_eq!(
            body["resources"]["hospitals"]["conde_s_januario"]["name"],
            "Conde S. Januário Hospital"
        );
        assert_eq!(
            body["resources"]["cancer_associations"]["macau_cancer_society"]["hotline"],
            "+853-2825-3381"
        );

        let (_, body) = send(app(), "POST", "/api/process-navigation", Some(json!({}))).await;
        assert_eq!(body["stage"], "diagnosis");
        assert_eq!(body["steps"][0], "Initial diagnosis confirmation and documentation");
    }

    #[tokio::test]
    async fn test_timeline() {
        let (status, body) = send(app(), "GET", "/api/timeline", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_stage"], "Treatment");
        assert_eq!(body["current_step"], 2);
        let stages = body["stages"].as_array().unwrap();
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[2]["name"], "Follow-up");
        assert_eq!(stages[2]["color"], "#FF9800");
    }

    #[tokio::test]
    async fn test_multimodal_routes() {
        let (_, body) = send(
            app(),
            "POST",
            "/api/multimodal/voice",
            Some(json!({"audio": "UklGRg==", "language": "zh"})),
        )
        .await;
        assert_eq!(body["recognized_text"], "How to manage chemotherapy side effects?");
        assert_eq!(body["language"], "zh");
        assert!(body["response"].as_str().unwrap().contains("【Multimodal Support】"));

        let (_, body) = send(app(), "POST", "/api/multimodal/image", Some(json!({}))).await;
        assert_eq!(body["extracted_text"], "WBC: 4.2, Platelets: 180, Hemoglobin: 12.5");
        assert_eq!(body["values"][1]["name"], "Platelets");
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_excess() {
        let mut config = AppConfig::default();
        config.rate_limit.requests_per_second = 1;
        config.rate_limit.burst = 1;
        let app = create_router(test_state(config));

        let (first, _) = send(app.clone(), "GET", "/api/timeline", None).await;
        assert_eq!(first, StatusCode::OK);

        let (second, body) = send(app.clone(), "GET", "/api/timeline", None).await;
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");

        // Health is outside the limiter
        let (health, _) = send(app, "GET", "/health", None).await;
        assert_eq!(health, StatusCode::OK);
    }
}
