use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::database::connection::DatabaseManager;
use crate::services::calendar_sync::{CalendarSync, SyncState};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    /// `None` when calendar sync is not configured.
    pub calendar_sync: Option<SyncState>,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub calendar_sync: Option<Arc<CalendarSync>>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>, calendar_sync: Option<Arc<CalendarSync>>) -> Self {
        let state = AppState {
            db,
            calendar_sync,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_healthy = state.db.ping().await.is_ok();
    let response_time_ms = start.elapsed().as_millis() as u64;

    if !db_healthy {
        tracing::warn!("Health check failed: database unreachable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        calendar_sync: state.calendar_sync.as_ref().map(|sync| sync.state()),
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match state.db.ping().await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::calendar::MockCalendarSource;
    use axum_test::TestServer;
    use tempfile::TempDir;

    async fn create_test_db() -> (Arc<DatabaseManager>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = DatabaseManager::new(&db_url)
            .await
            .expect("Failed to create test database");
        db.run_migrations().await.expect("Failed to run migrations");
        (Arc::new(db), temp_dir)
    }

    #[tokio::test]
    async fn test_health_endpoint_without_sync() {
        let (db, _temp_dir) = create_test_db().await;
        let server = TestServer::new(HealthService::new(db, None).router)
            .expect("Failed to create test server");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let health: HealthResponse = response.json();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database.status, "healthy");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.calendar_sync, None);
    }

    #[tokio::test]
    async fn test_health_endpoint_reports_sync_state() {
        let (db, _temp_dir) = create_test_db().await;
        let sync = Arc::new(CalendarSync::new(db.clone(), Arc::new(MockCalendarSource::new()), 30));
        let server = TestServer::new(HealthService::new(db, Some(sync)).router)
            .expect("Failed to create test server");

        let health: HealthResponse = server.get("/health").await.json();
        assert_eq!(health.calendar_sync, Some(SyncState::Idle));
    }

    #[tokio::test]
    async fn test_readiness_and_liveness() {
        let (db, _temp_dir) = create_test_db().await;
        let server = TestServer::new(HealthService::new(db, None).router)
            .expect("Failed to create test server");

        let ready: String = server.get("/health/ready").await.json();
        assert_eq!(ready, "ready");
        let alive: String = server.get("/health/live").await.json();
        assert_eq!(alive, "alive");
    }

    #[tokio::test]
    async fn test_health_fails_after_pool_closed() {
        let (db, _temp_dir) = create_test_db().await;
        db.close().await;
        let server = TestServer::new(HealthService::new(db, None).router)
            .expect("Failed to create test server");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
