/// Student data handlers - progress reported by the player
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{ApiResponse, TrackQuestionRequest, TrackWatchTimeRequest};
use crate::services::ProgressService;
use actix_web::{web, HttpResponse};

/// Add seconds watched since the previous report
pub async fn track_watch_time(
    user: CurrentUser,
    progress: web::Data<ProgressService>,
    req: web::Json<TrackWatchTimeRequest>,
) -> Result<HttpResponse> {
    let update = progress.track_watch_time(&user, &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(update)))
}

pub async fn track_question(
    user: CurrentUser,
    progress: web::Data<ProgressService>,
    req: web::Json<TrackQuestionRequest>,
) -> Result<HttpResponse> {
    let count = progress.track_question(&user, &req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(count)))
}

/// The caller's own records and totals
pub async fn get_my_data(
    user: CurrentUser,
    progress: web::Data<ProgressService>,
) -> Result<HttpResponse> {
    let summary = progress.student_summary(&user).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}
