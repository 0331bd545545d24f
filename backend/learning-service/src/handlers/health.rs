/// Health endpoints for probes and dashboards
use crate::services::QaService;
use crate::SERVICE_NAME;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

/// Facts about the process that readiness reports without probing
#[derive(Debug, Clone)]
pub struct HealthState {
    pub llm_configured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub ready: bool,
    pub database: &'static str,
    /// `disabled`, `ok` or `degraded`; never blocks readiness
    pub vector_store: &'static str,
    pub llm_configured: bool,
}

pub async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Ready when PostgreSQL hands out a connection and answers a query
pub async fn readiness_check(
    pool: web::Data<PgPool>,
    qa: web::Data<QaService>,
    state: web::Data<HealthState>,
) -> HttpResponse {
    let database = match db_pool::acquire_with_metrics(pool.get_ref(), SERVICE_NAME).await {
        Ok(mut conn) => match sqlx::query("SELECT 1").execute(&mut *conn).await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, "readiness query failed");
                "error"
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "readiness could not acquire a connection");
            "error"
        }
    };

    let vector_store = match qa.vector_store_reachable().await {
        None => "disabled",
        Some(true) => "ok",
        Some(false) => "degraded",
    };

    let report = ReadinessReport {
        ready: database == "ok",
        database,
        vector_store,
        llm_configured: state.llm_configured,
    };

    if report.ready {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
