use crate::error::Result;
use crate::middleware::{require_admin, AdminPolicy, CurrentUser};
use crate::models::ApiResponse;
use crate::services::AnalyticsService;
use actix_web::{web, HttpResponse};

/// Progress of every student, most watch time first
pub async fn get_student_progress(
    user: CurrentUser,
    policy: web::Data<AdminPolicy>,
    analytics: web::Data<AnalyticsService>,
) -> Result<HttpResponse> {
    require_admin(&user, &policy)?;

    let report = analytics.student_progress().await?;
    tracing::info!(admin = %user.username, students = report.len(), "student progress requested");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}
