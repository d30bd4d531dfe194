// --- File: crates/services/bookify_backend/src/app.rs ---
use axum::{extract::State, routing::get, Json, Router};
use bookify_config::AppConfig;
use bookify_db::{DbClient, DbError};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// State of the backend's own routes.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<DbClient>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db {
        Some(db) if db.is_healthy().await => "ok",
        Some(_) => "unavailable",
        None => "disabled",
    };
    Json(HealthResponse {
        status: "ok",
        database,
    })
}

/// Opens the booking store when availability is switched on and configured.
async fn connect_database(config: &AppConfig) -> Result<Option<DbClient>, DbError> {
    if !config.use_availability {
        info!("Availability disabled; not connecting to the booking store");
        return Ok(None);
    }
    if config.database.is_none() {
        warn!("Availability enabled but no [database] section configured");
        return Ok(None);
    }
    let client = DbClient::new(config).await?;
    info!("Booking store connected");
    Ok(Some(client))
}

/// Assembles the full application: feature routers nested under `/api`, plus
/// tracing and CORS layers.
pub async fn build_app(config: Arc<AppConfig>) -> Result<Router, DbError> {
    let db = connect_database(&config).await?;

    #[allow(unused_mut)] // only mutated when feature routers are compiled in
    let mut api_router = Router::new()
        .route("/health", get(health_handler))
        .with_state(AppState { db: db.clone() });

    #[cfg(feature = "planner")]
    {
        api_router = api_router.merge(bookify_planner::routes::routes(config.clone()));
    }

    #[cfg(feature = "availability")]
    if let Some(client) = db {
        use bookify_db::{BookingRepository, SqlBookingRepository};

        let repo = SqlBookingRepository::new(client);
        repo.init_schema().await?;
        api_router = api_router.merge(bookify_availability::routes::routes(
            config.clone(),
            Arc::new(repo),
        ));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(crate::doc::swagger_ui());
    }

    Ok(app.layer(TraceLayer::new_for_http()).layer(cors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use bookify_config::DatabaseConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config(with_database: bool) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            use_planner: true,
            use_availability: with_database,
            database: with_database.then(|| DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: Some(1),
            }),
            ..AppConfig::default()
        })
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_without_database() {
        let app = build_app(test_config(false)).await.unwrap();
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "database": "disabled" }));
    }

    #[tokio::test]
    async fn health_with_database() {
        let app = build_app(test_config(true)).await.unwrap();
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (_, body) = call(&app, request).await;
        assert_eq!(body["database"], json!("ok"));
    }

    #[cfg(feature = "planner")]
    #[tokio::test]
    async fn planner_is_mounted_under_api() {
        let app = build_app(test_config(false)).await.unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/booking/steps")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "productType": "SERVICE" }).to_string()))
            .unwrap();

        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["steps"],
            json!(["SERVICE", "SCHEDULE", "DETAILS", "CONFIRMATION"])
        );
    }

    #[cfg(feature = "availability")]
    #[tokio::test]
    async fn availability_is_mounted_with_database() {
        let app = build_app(test_config(true)).await.unwrap();
        let request = Request::builder()
            .uri("/api/availability/conflicts?business_id=biz-1&resource_id=2-1&scheduled_at=2025-12-29T15:00:00Z")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], json!(true));
    }

    #[cfg(feature = "availability")]
    #[tokio::test]
    async fn availability_is_absent_without_database() {
        let app = build_app(test_config(false)).await.unwrap();
        let request = Request::builder()
            .uri("/api/availability/conflicts?business_id=biz-1&resource_id=2-1&scheduled_at=2025-12-29T15:00:00Z")
            .body(Body::empty())
            .unwrap();

        let (status, _) = call(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
