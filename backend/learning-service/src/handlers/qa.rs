/// QA handler - transcript-grounded answers for students
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{ApiResponse, AskQuestionRequest};
use crate::services::{ProgressService, QaService, VideoService};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Answer a question about a video
///
/// The question also counts toward the asker's progress record. Counting
/// is best effort and never fails the answer.
pub async fn ask_question(
    user: CurrentUser,
    qa: web::Data<QaService>,
    videos: web::Data<VideoService>,
    progress: web::Data<ProgressService>,
    req: web::Json<AskQuestionRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    if req.question.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Question and video ID are required".to_string(),
        ));
    }
    req.validate()?;

    let video = videos.get_video(req.video_id).await?;
    tracing::info!(user_id = %user.id, video_id = %video.id, "question received");

    let answer = qa.answer(&video, &req.question).await?;

    if let Err(e) = progress.record_question(user.id, &video).await {
        tracing::warn!(
            user_id = %user.id,
            video_id = %video.id,
            error = %e,
            "failed to count question"
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(answer)))
}
