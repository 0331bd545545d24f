/// Video handlers - HTTP endpoints for lecture video records
use crate::error::Result;
use crate::middleware::{require_teacher, CurrentUser, UserId};
use crate::models::{ApiResponse, CreateVideoRequest, ListVideosQuery};
use crate::services::VideoService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn list_videos(
    _user: UserId,
    videos: web::Data<VideoService>,
    query: web::Query<ListVideosQuery>,
) -> Result<HttpResponse> {
    let list = videos.list_videos(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(list)))
}

pub async fn get_video(
    _user: UserId,
    videos: web::Data<VideoService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video = videos.get_video(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(video)))
}

/// Register a video (teachers only)
pub async fn create_video(
    user: CurrentUser,
    videos: web::Data<VideoService>,
    req: web::Json<CreateVideoRequest>,
) -> Result<HttpResponse> {
    require_teacher(&user)?;

    let video = videos.create_video(&user, &req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(video)))
}

/// Delete one of the caller's own videos (teachers only)
pub async fn delete_video(
    user: CurrentUser,
    videos: web::Data<VideoService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    require_teacher(&user)?;

    let video_id = path.into_inner();
    videos.delete_video(&user, video_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "id": video_id }))))
}
