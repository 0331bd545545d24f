/// HTTP handlers for learning-service
///
/// - QA: answer a question about a lecture video
/// - Student data: watch time and question tracking, own summary
/// - Admin: progress report over all students
/// - Videos: lecture video records
/// - Health: liveness and readiness probes
pub mod admin;
pub mod health;
pub mod qa;
pub mod student_data;
pub mod videos;

pub use admin::get_student_progress;
pub use health::{health_summary, liveness_check, readiness_check, HealthState};
pub use qa::ask_question;
pub use student_data::{get_my_data, track_question, track_watch_time};
pub use videos::{create_video, delete_video, get_video, list_videos};

use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;
use actix_web::{web, HttpResponse};

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/metrics", web::get().to(crate::metrics::serve_metrics))
        .route("/api/health", web::get().to(health_summary))
        .route("/api/health/ready", web::get().to(readiness_check))
        .route("/api/health/live", web::get().to(liveness_check))
        .service(
            web::scope("/api/qa")
                .wrap(JwtAuthMiddleware)
                .route("", web::post().to(ask_question)),
        )
        .service(
            web::scope("/api/student-data")
                .wrap(JwtAuthMiddleware)
                .route("/track-watch-time", web::post().to(track_watch_time))
                .route("/track-question", web::post().to(track_question))
                .route("/me", web::get().to(get_my_data)),
        )
        .service(
            web::scope("/api/admin")
                .wrap(JwtAuthMiddleware)
                .route("/student-progress", web::get().to(get_student_progress)),
        )
        .service(
            web::scope("/api/videos")
                .wrap(JwtAuthMiddleware)
                .service(
                    web::resource("")
                        .route(web::get().to(list_videos))
                        .route(web::post().to(create_video)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(get_video))
                        .route(web::delete().to(delete_video)),
                ),
        )
        .default_service(web::to(route_not_found));
}

/// Malformed bodies, paths and query strings answer with the usual error envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "Route not found",
        "message": "Route not found",
    }))
}
