//! Banking Risk Audit Server
//!
//! Register banking information assets, derive a risk profile for each one,
//! edit the register cell by cell, and generate ISO 27001 treatments for the
//! whole table.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    BANKING RISK AUDIT                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌──────────────────────────┐ │
//! │  │  API      │  │  Session  │  │  Workflow Controller     │ │
//! │  │  (Axum)   │  │  (JWT)    │  │  evaluate / recommend    │ │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬──────────────┬─────┘ │
//! │        └──────────────┴──────────────┤              │       │
//! │                                      ▼              ▼       │
//! │        ┌──────────────┐     ┌──────────────┐ ┌───────────┐  │
//! │        │ EditableGrid │ ──▶ │ RiskRegistry │ │  Engines  │  │
//! │        └──────────────┘     └──────────────┘ └───────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod logic;
mod handlers;
mod middleware;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::logic::inference::RuleTableInference;
use crate::logic::recommendation::RuleTableRecommender;
use crate::logic::session::SessionService;
use crate::logic::workflow::WorkflowRunner;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "banking_risk_audit=debug,tower_http=debug".into());
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Banking Risk Audit server starting...");
    tracing::info!(
        environment = %config.environment,
        analysis_ms = config.analysis_latency.as_millis() as u64,
        recommendation_ms = config.recommendation_latency.as_millis() as u64,
        "Rule-table engines configured"
    );
    if !config.is_production() {
        tracing::warn!("Running with development defaults, do not expose this instance");
    }

    let state = AppState::from_config(config.clone());
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub sessions: Arc<SessionService>,
    pub workflow: WorkflowRunner,
}

impl AppState {
    pub fn from_config(config: config::Config) -> Self {
        let sessions = SessionService::new(
            config.analyst_username.clone(),
            config.analyst_password_hash.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );
        let workflow = WorkflowRunner::new(
            Arc::new(RuleTableInference::new(config.analysis_latency)),
            Arc::new(RuleTableRecommender::new(config.recommendation_latency)),
        );

        Self {
            config,
            sessions: Arc::new(sessions),
            workflow,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/session/login", post(handlers::session::login));

    // Analyst routes (session token required)
    let analyst_routes = Router::new()
        // Session
        .route("/api/v1/session", get(handlers::session::current))
        .route("/api/v1/session/logout", post(handlers::session::logout))

        // Engine
        .route("/api/v1/status", get(handlers::status::engine_status))
        .route("/api/v1/assets/catalog", get(handlers::catalog::list))
        .route("/api/v1/analysis/risk-profile", post(handlers::analysis::risk_profile))
        .route("/api/v1/analysis/treatment", post(handlers::analysis::treatment))

        // Workspace
        .route("/api/v1/workspace", get(handlers::workspace::snapshot))

        // Evaluate-asset workflow
        .route("/api/v1/evaluation/open", post(handlers::evaluation::open))
        .route("/api/v1/evaluation/draft", put(handlers::evaluation::draft))
        .route("/api/v1/evaluation/dismiss", post(handlers::evaluation::dismiss))
        .route("/api/v1/evaluation/submit", post(handlers::evaluation::submit))

        // Register + grid
        .route("/api/v1/risks", get(handlers::risks::list))
        .route("/api/v1/risks/:key", axum::routing::delete(handlers::risks::delete))
        .route("/api/v1/risks/:key/cells/:column", get(handlers::risks::cell))
        .route("/api/v1/risks/:key/cells/:column/edit", post(handlers::risks::edit_cell))
        .route("/api/v1/risks/:key/cells/:column/draft", put(handlers::risks::input_cell))
        .route("/api/v1/risks/:key/cells/:column/commit", post(handlers::risks::commit_cell))

        // Recommend-all workflow
        .route("/api/v1/recommendations", post(handlers::recommendations::generate))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(analyst_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::logic::recommendation::controls::FALLBACK_TREATMENT;
    use crate::logic::session::hash_password;

    fn test_config() -> config::Config {
        config::Config {
            port: 0,
            environment: "test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            analyst_username: "auditor".to_string(),
            analyst_password_hash: hash_password("s3cret").unwrap(),
            analysis_latency: Duration::ZERO,
            recommendation_latency: Duration::ZERO,
            log_format: "text".to_string(),
        }
    }

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(app: &Router) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/session/login",
            None,
            Some(json!({ "username": "auditor", "password": "s3cret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notification"]["event"], "logged_in");
        body["token"].as_str().unwrap().to_string()
    }

    async fn evaluate(app: &Router, token: &str, name: &str) -> (StatusCode, Value) {
        call(app, Method::POST, "/api/v1/evaluation/open", Some(token), None).await;
        call(
            app,
            Method::POST,
            "/api/v1/evaluation/submit",
            Some(token),
            Some(json!({ "activo": name })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = create_router(AppState::from_config(test_config()));
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_routes_require_session() {
        let app = create_router(AppState::from_config(test_config()));
        let (status, _) = call(&app, Method::GET, "/api/v1/risks", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, Method::GET, "/api/v1/risks", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let app = create_router(AppState::from_config(test_config()));
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/session/login",
            None,
            Some(json!({ "username": "auditor", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_logout_closes_session() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = call(&app, Method::GET, "/api/v1/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"], "auditor");
        assert_eq!(body["authenticated"], true);

        let (status, body) = call(&app, Method::POST, "/api/v1/session/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notification"]["event"], "logged_out");

        let (status, _) = call(&app, Method::GET, "/api/v1/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_evaluate_and_recommend_flow() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = evaluate(&app, &token, "Servidor de base de datos").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "evaluated");
        assert_eq!(body["row"]["key"], "1");
        assert_eq!(body["row"]["categoria"], "Crítico");
        assert_eq!(body["row"]["tratamiento"], "-");
        assert_eq!(body["notification"]["event"], "asset_evaluated");

        let (status, body) = call(&app, Method::POST, "/api/v1/recommendations", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "applied");
        assert_eq!(
            body["rows"][0]["tratamiento"],
            "A.12.6.1 - Implementar cifrado AES-256, A.12.3.1 - Backup diario automatizado, A.9.1.1 - Control de acceso basado en roles"
        );
    }

    #[tokio::test]
    async fn test_unknown_asset_flow() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (_, body) = evaluate(&app, &token, "Cámara IP Lobby").await;
        assert_eq!(body["row"]["categoria"], "Medio");
        assert_eq!(body["row"]["probabilidad"], "Media");

        call(&app, Method::POST, "/api/v1/recommendations", Some(&token), None).await;
        let (_, rows) = call(&app, Method::GET, "/api/v1/risks", Some(&token), None).await;
        assert_eq!(rows[0]["tratamiento"], FALLBACK_TREATMENT);
    }

    #[tokio::test]
    async fn test_empty_name_keeps_dialog_open() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = evaluate(&app, &token, "  ").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["outcome"], "rejected");
        assert_eq!(body["notification"]["event"], "asset_name_required");
        assert_eq!(body["notification"]["level"], "error");

        let (_, snapshot) = call(&app, Method::GET, "/api/v1/workspace", Some(&token), None).await;
        assert_eq!(snapshot["rows"].as_array().unwrap().len(), 0);
        assert_eq!(snapshot["evaluation"]["state"], "modal_open");
        assert_eq!(snapshot["evaluation"]["name_required"], true);
    }

    #[tokio::test]
    async fn test_recommend_with_empty_register_warns() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = call(&app, Method::POST, "/api/v1/recommendations", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "rejected");
        assert_eq!(body["notification"]["level"], "warning");

        let (_, snapshot) = call(&app, Method::GET, "/api/v1/workspace", Some(&token), None).await;
        assert_eq!(snapshot["recommendations"], "disabled");
    }

    #[tokio::test]
    async fn test_cell_edit_flow() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;
        evaluate(&app, &token, "Servidor de Correo").await;

        let (status, body) = call(&app, Method::POST, "/api/v1/risks/1/cells/impacto/edit", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cell"]["state"], "editing");
        assert_eq!(
            body["cell"]["draft"],
            "Filtración de información sensible, ataques de ingeniería social"
        );

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/risks/1/cells/impacto/commit",
            Some(&token),
            Some(json!({ "value": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["cell"]["state"], "editing");
        assert_eq!(body["cell"]["error"]["kind"], "required");
        assert_eq!(body["notification"]["event"], "cell_value_required");

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/risks/1/cells/impacto/commit",
            Some(&token),
            Some(json!({ "value": "Fuga de correo interno" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cell"]["state"], "viewing");
        assert_eq!(body["row"]["impacto"], "Fuga de correo interno");
    }

    #[tokio::test]
    async fn test_malformed_commit_body_keeps_row() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;
        evaluate(&app, &token, "Servidor de Correo").await;
        call(&app, Method::POST, "/api/v1/risks/1/cells/activo/edit", Some(&token), None).await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/risks/1/cells/activo/commit",
            Some(&token),
            Some(json!({ "valor": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = call(&app, Method::GET, "/api/v1/risks/1/cells/activo", Some(&token), None).await;
        assert_eq!(body["cell"]["state"], "editing");
        assert_eq!(body["row"]["activo"], "Servidor de Correo");

        // Bodiless commit still goes through with the pre-filled draft
        let (status, body) = call(&app, Method::POST, "/api/v1/risks/1/cells/activo/commit", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cell"]["state"], "viewing");
    }

    #[tokio::test]
    async fn test_malformed_submit_body_keeps_dialog() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;
        call(&app, Method::POST, "/api/v1/evaluation/open", Some(&token), None).await;
        call(
            &app,
            Method::PUT,
            "/api/v1/evaluation/draft",
            Some(&token),
            Some(json!({ "activo": "Firewall Perimetral" })),
        )
        .await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/evaluation/submit",
            Some(&token),
            Some(json!({ "nombre": "API Transacciones" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, snapshot) = call(&app, Method::GET, "/api/v1/workspace", Some(&token), None).await;
        assert_eq!(snapshot["rows"].as_array().unwrap().len(), 0);
        assert_eq!(snapshot["evaluation"]["state"], "modal_open");
        assert_eq!(snapshot["evaluation"]["draft"], "Firewall Perimetral");
    }

    #[tokio::test]
    async fn test_operation_column_not_editable() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;
        evaluate(&app, &token, "Servidor de Correo").await;

        let (status, _) = call(&app, Method::POST, "/api/v1/risks/1/cells/operation/edit", Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&app, Method::POST, "/api/v1/risks/9/cells/activo/edit", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_row() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;
        evaluate(&app, &token, "Servidor de Correo").await;
        evaluate(&app, &token, "Firewall Perimetral").await;

        let (status, body) = call(&app, Method::DELETE, "/api/v1/risks/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (_, body) = call(&app, Method::DELETE, "/api/v1/risks/1", Some(&token), None).await;
        assert_eq!(body["deleted"], false);

        let (_, rows) = call(&app, Method::GET, "/api/v1/risks", Some(&token), None).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["key"], "2");
    }

    #[tokio::test]
    async fn test_stateless_analysis() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/analysis/risk-profile",
            Some(&token),
            Some(json!({ "activo": "API Transacciones" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["probabilidad"], "Alta");

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/v1/analysis/risk-profile",
            Some(&token),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/analysis/treatment",
            Some(&token),
            Some(json!({ "activo": "Servidor de Correo", "riesgo": "r", "impacto": "i" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categoria"], "Medio");
        assert_eq!(body["tratamiento"], "A.13.1.1 - TLS obligatorio, A.9.1.1 - Autenticación de usuarios");

        let (_, rows) = call(&app, Method::GET, "/api/v1/risks", Some(&token), None).await;
        assert_eq!(rows.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_status_and_catalog() {
        let app = create_router(AppState::from_config(test_config()));
        let token = login(&app).await;

        let (status, body) = call(&app, Method::GET, "/api/v1/status", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "operational");
        assert_eq!(body["environment"], "test");
        assert_eq!(body["engine"]["inference"]["kind"], "rule-table");
        assert_eq!(body["evaluation"]["state"], "idle");
        assert_eq!(body["palette"]["categoria"][3]["label"], "Crítico");
        assert_eq!(body["palette"]["categoria"][3]["color"], "#ff4d4f");

        let (_, body) = call(&app, Method::GET, "/api/v1/assets/catalog", Some(&token), None).await;
        assert_eq!(body["activos"].as_array().unwrap().len(), 10);
        assert_eq!(body["activos"][0]["nombre"], "Servidor de base de datos");
    }
}
